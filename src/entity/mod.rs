pub mod enemy;
pub mod needs;
pub mod villager;

pub use enemy::Enemy;
pub use needs::Hunger;
pub use villager::{Job, Target, Villager, VillagerState};
