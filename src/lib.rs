//! Village Sim - headless village survival simulation core
//!
//! Villagers gather wood, stone and food for a shared economy, level up
//! through deliveries and defend home from night raids that grow with
//! each passing day. Everything advances through `SimulationWorld::tick`.

pub mod city;
pub mod command;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod simulation;

pub use crate::command::{Command, CommandQueue};
pub use crate::core::{Result, SimulationConfig, VillageError};
pub use crate::ecs::{SimulationWorld, WorldSnapshot};
pub use crate::simulation::SimulationEvent;
