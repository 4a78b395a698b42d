//! Villager data: job, behavior state and target reference
//!
//! Behavior lives in `simulation::villager_fsm`; this module only holds
//! the per-villager record the world owns.

use serde::{Deserialize, Serialize};

use crate::core::types::{EnemyId, ResourceId, Vec2, VillagerId};
use crate::entity::needs::Hunger;
use crate::simulation::resource_registry::ResourceType;

/// A villager's profession
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Job {
    #[default]
    Idle,
    Lumber,
    Miner,
    Forager,
    Soldier,
}

impl Job {
    /// Resource node type this job harvests, if any
    pub fn resource_type(&self) -> Option<ResourceType> {
        match self {
            Job::Lumber => Some(ResourceType::Tree),
            Job::Miner => Some(ResourceType::Rock),
            Job::Forager => Some(ResourceType::Bush),
            Job::Idle | Job::Soldier => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VillagerState {
    #[default]
    Idle,
    Move,
    Work,
    Return,
    Combat,
}

/// What a villager is heading for. Entity targets are ids, resolved
/// through their owning registry every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Resource(ResourceId),
    Point(Vec2),
    Enemy(EnemyId),
    Home,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Villager {
    pub id: VillagerId,
    pub position: Vec2,
    pub job: Job,
    pub state: VillagerState,
    pub target: Option<Target>,
    pub hp: f32,
    pub hunger: Hunger,
    pub xp: u32,
    pub level: u32,
    /// World units per second before the level multiplier
    pub base_speed: f32,
    /// Node type of the load being carried home
    pub carrying: Option<ResourceType>,
}

impl Villager {
    pub fn new(id: VillagerId, job: Job, position: Vec2, base_speed: f32, hp: f32) -> Self {
        Self {
            id,
            position,
            job,
            state: VillagerState::Idle,
            target: None,
            hp,
            hunger: Hunger::default(),
            xp: 0,
            level: 1,
            base_speed,
            carrying: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn has_item(&self) -> bool {
        self.carrying.is_some()
    }

    /// Drop the current goal and fall back to IDLE
    pub fn reset_to_idle(&mut self) {
        self.state = VillagerState::Idle;
        self.target = None;
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_resource_mapping() {
        assert_eq!(Job::Lumber.resource_type(), Some(ResourceType::Tree));
        assert_eq!(Job::Miner.resource_type(), Some(ResourceType::Rock));
        assert_eq!(Job::Forager.resource_type(), Some(ResourceType::Bush));
        assert_eq!(Job::Idle.resource_type(), None);
        assert_eq!(Job::Soldier.resource_type(), None);
    }

    #[test]
    fn test_new_villager_is_idle_level_one() {
        let v = Villager::new(VillagerId(1), Job::Miner, Vec2::new(5.0, 5.0), 130.0, 100.0);
        assert_eq!(v.state, VillagerState::Idle);
        assert_eq!(v.level, 1);
        assert!(!v.has_item());
        assert!(v.is_alive());
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut v = Villager::new(VillagerId(1), Job::Idle, Vec2::default(), 130.0, 10.0);
        v.take_damage(25.0);
        assert_eq!(v.hp, 0.0);
        assert!(!v.is_alive());
    }
}
