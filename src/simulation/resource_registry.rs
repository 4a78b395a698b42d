//! Harvestable resource nodes (trees, rocks, bushes)
//!
//! The registry owns every node. Villagers hold only `ResourceId`s and must
//! resolve them here each tick, since a node can be depleted (and purged)
//! between any two ticks. Depleting a node immediately spawns a replacement
//! of the same type elsewhere, keeping the harvestable density constant.

use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::city::economy::Commodity;
use crate::core::types::{IdCounter, ResourceId, Vec2};

/// Rejection-sampling attempts before accepting a position inside the
/// home clearing
const MAX_PLACEMENT_ATTEMPTS: usize = 32;

/// Type of harvestable node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Tree,
    Rock,
    Bush,
}

impl ResourceType {
    pub fn max_hp(&self) -> f32 {
        match self {
            ResourceType::Tree => 100.0,
            ResourceType::Rock => 200.0,
            ResourceType::Bush => 40.0,
        }
    }

    /// Economy counter credited when this node's load is delivered
    pub fn commodity(&self) -> Commodity {
        match self {
            ResourceType::Tree => Commodity::Wood,
            ResourceType::Rock => Commodity::Stone,
            ResourceType::Bush => Commodity::Food,
        }
    }

    /// Units delivered per load at level multiplier 1.0
    pub fn base_yield(&self) -> f32 {
        match self {
            ResourceType::Tree => 10.0,
            ResourceType::Rock => 5.0,
            ResourceType::Bush => 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: ResourceId,
    pub resource_type: ResourceType,
    pub position: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub alive: bool,
}

/// Result of hitting a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HarvestOutcome {
    /// Node took damage and is still standing
    Damaged { remaining: f32 },
    /// This hit brought the node to zero; a replacement was spawned
    Depleted { replacement: ResourceId },
    /// Node was already depleted or purged; nothing happened
    Gone,
}

#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    nodes: Vec<ResourceNode>,
    ids: IdCounter,
    width: f32,
    height: f32,
    home: Vec2,
    clearing_radius: f32,
}

impl ResourceRegistry {
    pub fn new(width: f32, height: f32, home: Vec2, clearing_radius: f32) -> Self {
        Self {
            nodes: Vec::new(),
            ids: IdCounter::new(),
            width,
            height,
            home,
            clearing_radius,
        }
    }

    /// Place `count` nodes at random positions with the given type mix.
    /// Bushes make up whatever share trees and rocks leave.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        tree_share: f32,
        rock_share: f32,
        rng: &mut R,
    ) {
        for _ in 0..count {
            let roll: f32 = rng.gen();
            let resource_type = if roll < tree_share {
                ResourceType::Tree
            } else if roll < tree_share + rock_share {
                ResourceType::Rock
            } else {
                ResourceType::Bush
            };
            let position = self.random_position(rng);
            self.spawn(resource_type, position);
        }
    }

    pub fn spawn(&mut self, resource_type: ResourceType, position: Vec2) -> ResourceId {
        let id = ResourceId(self.ids.next());
        let max_hp = resource_type.max_hp();
        self.nodes.push(ResourceNode {
            id,
            resource_type,
            position,
            hp: max_hp,
            max_hp,
            alive: true,
        });
        id
    }

    pub fn get(&self, id: ResourceId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut ResourceNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Live node with the given id, if any
    pub fn get_alive(&self, id: ResourceId) -> Option<&ResourceNode> {
        self.get(id).filter(|n| n.alive)
    }

    /// Nearest live node of `resource_type`. Ties go to the node created
    /// first, since `min_by_key` keeps the earliest minimum.
    pub fn find_nearest(&self, resource_type: ResourceType, from: Vec2) -> Option<ResourceId> {
        self.nodes
            .iter()
            .filter(|n| n.alive && n.hp > 0.0 && n.resource_type == resource_type)
            .min_by_key(|n| OrderedFloat(n.position.distance(&from)))
            .map(|n| n.id)
    }

    /// Damage a node. The caller whose hit reaches zero gets `Depleted`;
    /// anyone hitting it afterwards gets `Gone`.
    pub fn apply_damage<R: Rng + ?Sized>(
        &mut self,
        id: ResourceId,
        amount: f32,
        rng: &mut R,
    ) -> HarvestOutcome {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return HarvestOutcome::Gone;
        };
        if !node.alive {
            return HarvestOutcome::Gone;
        }

        node.hp = (node.hp - amount.max(0.0)).max(0.0);
        if node.hp > 0.0 {
            return HarvestOutcome::Damaged { remaining: node.hp };
        }

        node.alive = false;
        let resource_type = node.resource_type;
        let position = self.random_position(rng);
        let replacement = self.spawn(resource_type, position);
        tracing::debug!(
            "{} ({:?}) depleted, respawned as {} at ({:.0}, {:.0})",
            id,
            resource_type,
            replacement,
            position.x,
            position.y
        );
        HarvestOutcome::Depleted { replacement }
    }

    /// Drop depleted nodes. Returns how many were removed.
    pub fn sweep_depleted(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.alive);
        before - self.nodes.len()
    }

    /// Uniform position on the map outside the home clearing
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let mut candidate = self.home;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            candidate = Vec2::new(
                rng.gen::<f32>() * self.width,
                rng.gen::<f32>() * self.height,
            );
            if candidate.distance(&self.home) >= self.clearing_radius {
                return candidate;
            }
        }
        candidate
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(|n| n.alive)
    }

    pub fn count_alive(&self, resource_type: ResourceType) -> usize {
        self.iter_alive()
            .filter(|n| n.resource_type == resource_type)
            .count()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
