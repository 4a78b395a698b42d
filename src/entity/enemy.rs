//! Hostile raiders spawned at night

use serde::{Deserialize, Serialize};

use crate::core::types::{EnemyId, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub position: Vec2,
    pub hp: f32,
    /// Wave the enemy was spawned in
    pub born_wave: u32,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
    }
}
