//! Player-built structures and their cost table

use serde::{Deserialize, Serialize};

use crate::core::types::{IdCounter, StructureId, Vec2};

/// Type of structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    /// Campfire; the village's first fire marks home
    Fire,
    /// Shelter that raises the population cap
    Tent,
}

/// Materials debited from the economy to build something
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub wood: u32,
    pub stone: u32,
    pub food: u32,
}

impl StructureKind {
    pub fn cost(&self) -> Cost {
        match self {
            StructureKind::Fire => Cost {
                wood: 10,
                ..Cost::default()
            },
            StructureKind::Tent => Cost {
                wood: 40,
                stone: 10,
                ..Cost::default()
            },
        }
    }

    /// Extra population capacity once built
    pub fn housing_capacity(&self) -> u32 {
        match self {
            StructureKind::Tent => 2,
            StructureKind::Fire => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub kind: StructureKind,
    pub position: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    structures: Vec<Structure>,
    ids: IdCounter,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self {
            structures: Vec::new(),
            ids: IdCounter::new(),
        }
    }

    /// Record a structure. Costs are checked by the caller.
    pub fn place(&mut self, kind: StructureKind, position: Vec2) -> StructureId {
        let id = StructureId(self.ids.next());
        self.structures.push(Structure { id, kind, position });
        id
    }

    pub fn get(&self, id: StructureId) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter()
    }

    pub fn count(&self, kind: StructureKind) -> usize {
        self.structures.iter().filter(|s| s.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_costs_ten_wood() {
        assert_eq!(
            StructureKind::Fire.cost(),
            Cost {
                wood: 10,
                stone: 0,
                food: 0
            }
        );
    }

    #[test]
    fn test_only_tents_house_villagers() {
        assert_eq!(StructureKind::Tent.housing_capacity(), 2);
        assert_eq!(StructureKind::Fire.housing_capacity(), 0);
    }

    #[test]
    fn test_place_assigns_fresh_ids() {
        let mut registry = StructureRegistry::new();
        let a = registry.place(StructureKind::Fire, Vec2::new(0.0, 0.0));
        let b = registry.place(StructureKind::Tent, Vec2::new(5.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(registry.count(StructureKind::Tent), 1);
        assert_eq!(registry.get(b).unwrap().kind, StructureKind::Tent);
    }
}
