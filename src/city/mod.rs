//! City layer - shared economy and structures

pub mod economy;
pub mod structure;

pub use economy::{Commodity, Economy};
pub use structure::{Cost, Structure, StructureKind, StructureRegistry};
