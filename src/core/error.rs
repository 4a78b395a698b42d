use thiserror::Error;

use crate::city::structure::StructureKind;
use crate::core::types::{EnemyId, ResourceId, VillagerId};
use crate::entity::villager::Job;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VillageError {
    #[error("Villager not found: {0}")]
    UnknownVillager(VillagerId),

    #[error("Resource node not found: {0}")]
    UnknownResource(ResourceId),

    #[error("Enemy not found: {0}")]
    UnknownEnemy(EnemyId),

    #[error("Cannot afford {kind:?}: need {wood} wood, {stone} stone, {food} food")]
    InsufficientResources {
        kind: StructureKind,
        wood: u32,
        stone: u32,
        food: u32,
    },

    #[error("Not enough food: requested {requested}, have {available}")]
    InsufficientFood { requested: u32, available: u32 },

    #[error("Population cap reached ({population}/{max_population})")]
    PopulationCap { population: u32, max_population: u32 },

    #[error("{villager} has job {job:?}; only idle villagers take move orders")]
    MoveRequiresIdleJob { villager: VillagerId, job: Job },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config IO error: {0}")]
    ConfigIo(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

pub type Result<T> = std::result::Result<T, VillageError>;
