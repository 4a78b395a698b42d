pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{ClockTransition, SimulationClock};
pub use config::SimulationConfig;
pub use error::{Result, VillageError};
