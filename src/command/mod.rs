//! Player command pipeline
//!
//! Presentation code submits `Command`s between ticks. The world drains
//! the queue at the start of the next tick and `CommandExecutor` applies
//! each one, turning failures into `CommandRejected` events.

pub mod executor;
pub mod queue;

pub use executor::CommandExecutor;
pub use queue::{Command, CommandQueue};
