//! World container and its read-only snapshot

pub mod snapshot;
pub mod world;

pub use snapshot::{ClockView, WorldSnapshot};
pub use world::SimulationWorld;
