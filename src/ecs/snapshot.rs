//! Read-only world view for presentation and serialization

use serde::Serialize;

use crate::city::economy::Economy;
use crate::city::structure::Structure;
use crate::core::types::Vec2;
use crate::ecs::world::SimulationWorld;
use crate::entity::enemy::Enemy;
use crate::entity::villager::Villager;
use crate::simulation::resource_registry::ResourceNode;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockView {
    pub time_fraction: f32,
    pub day: u32,
    pub wave: u32,
    pub is_night: bool,
    pub hour: u32,
    pub minute: u32,
}

/// Everything a renderer needs for one frame. Capturing never mutates the
/// world, so two captures without a tick in between compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub clock: ClockView,
    pub economy: Economy,
    pub home: Vec2,
    pub villagers: Vec<Villager>,
    pub resources: Vec<ResourceNode>,
    pub enemies: Vec<Enemy>,
    pub structures: Vec<Structure>,
}

impl WorldSnapshot {
    pub fn capture(world: &SimulationWorld) -> Self {
        let clock = &world.clock;
        Self {
            tick: world.current_tick,
            clock: ClockView {
                time_fraction: clock.time_fraction(),
                day: clock.day(),
                wave: clock.wave(),
                is_night: clock.is_night(),
                hour: clock.hour(),
                minute: clock.minute(),
            },
            economy: world.economy.clone(),
            home: world.home,
            villagers: world.villagers().to_vec(),
            resources: world.resources.iter_alive().cloned().collect(),
            enemies: world.threats.iter().cloned().collect(),
            structures: world.structures.iter().cloned().collect(),
        }
    }
}
