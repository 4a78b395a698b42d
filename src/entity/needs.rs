//! Hunger, the one need that drives villager survival

use serde::{Deserialize, Serialize};

/// Accumulating hunger. 0.0 = just ate; reaching the configured threshold
/// means the villager must eat or start starving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hunger {
    pub value: f32,
}

impl Hunger {
    /// Accumulate hunger over `dt` seconds, saturating at `threshold`.
    /// Returns true once the villager needs to eat.
    pub fn accumulate(&mut self, rate: f32, dt: f32, threshold: f32) -> bool {
        self.value = (self.value + rate * dt).min(threshold);
        self.value >= threshold
    }

    pub fn satisfy(&mut self) {
        self.value = 0.0;
    }
}
