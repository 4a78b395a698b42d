//! Simulation systems - resources, progression, raids, villager behavior and the tick

pub mod progression;
pub mod resource_registry;
pub mod threat;
pub mod tick;
pub mod villager_fsm;

pub use progression::{grant_xp, required_xp, speed_multiplier, yield_multiplier, XP_PER_LEVEL};
pub use resource_registry::{HarvestOutcome, ResourceNode, ResourceRegistry, ResourceType};
pub use threat::{enemy_hp_for_wave, spawn_chance, ThreatSystem};
pub use tick::{run_simulation_tick, SimulationEvent};
pub use villager_fsm::{apply_hunger, update_villager, VillagerContext};
