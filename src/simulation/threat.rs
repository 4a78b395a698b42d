//! Night raids
//!
//! While the clock reports night, raiders appear on a ring around home at a
//! rate that grows with the wave counter. Each raider chases the nearest
//! living villager (or home, if nobody is left) and hurts whatever it is in
//! contact with. Raiders never hold references to villagers; the nearest
//! target is recomputed every tick.

use ordered_float::OrderedFloat;
use rand::Rng;
use std::f32::consts::TAU;

use crate::core::clock::SimulationClock;
use crate::core::config::SimulationConfig;
use crate::core::types::{EnemyId, IdCounter, Seconds, Vec2};
use crate::entity::enemy::Enemy;
use crate::entity::villager::Villager;

/// Hit points of a raider spawned during `wave`
pub fn enemy_hp_for_wave(wave: u32, config: &SimulationConfig) -> f32 {
    config.base_enemy_hp + wave as f32 * config.hp_per_wave
}

/// Probability of a spawn during a step of `dt` seconds at `wave`
pub fn spawn_chance(wave: u32, dt: Seconds, config: &SimulationConfig) -> f32 {
    (config.base_spawn_rate * wave as f32 * dt.max(0.0)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Default)]
pub struct ThreatSystem {
    enemies: Vec<Enemy>,
    ids: IdCounter,
}

impl ThreatSystem {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            ids: IdCounter::new(),
        }
    }

    /// Roll for a night spawn. During the day no roll is drawn at all.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        clock: &SimulationClock,
        home: Vec2,
        config: &SimulationConfig,
        dt: Seconds,
        rng: &mut R,
    ) -> Option<EnemyId> {
        if !clock.is_night() || self.enemies.len() >= config.max_enemies {
            return None;
        }

        let chance = spawn_chance(clock.wave(), dt, config);
        if chance <= 0.0 || rng.gen::<f32>() >= chance {
            return None;
        }

        let angle = rng.gen::<f32>() * TAU;
        let position = home.on_ring(angle, config.spawn_ring_radius);
        Some(self.spawn_at(position, clock.wave(), config))
    }

    pub fn spawn_at(&mut self, position: Vec2, wave: u32, config: &SimulationConfig) -> EnemyId {
        let id = EnemyId(self.ids.next());
        let hp = enemy_hp_for_wave(wave, config);
        self.enemies.push(Enemy {
            id,
            position,
            hp,
            born_wave: wave,
        });
        tracing::debug!("{} spawned at wave {} with {:.0} hp", id, wave, hp);
        id
    }

    /// Move every raider toward its target and apply contact damage.
    /// Villagers are visited by index only; their ids are never stored.
    pub fn update_enemies(
        &mut self,
        villagers: &mut [Villager],
        home: Option<Vec2>,
        config: &SimulationConfig,
        dt: Seconds,
    ) {
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            let victim = villagers
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_alive())
                .min_by_key(|(_, v)| OrderedFloat(v.position.distance(&enemy.position)))
                .map(|(idx, _)| idx);

            let destination = match (victim, home) {
                (Some(idx), _) => villagers[idx].position,
                (None, Some(home)) => home,
                // Nothing to chase: hold position
                (None, None) => continue,
            };

            enemy.position = enemy
                .position
                .step_towards(destination, config.enemy_speed * dt);

            if let Some(idx) = victim {
                let villager = &mut villagers[idx];
                if villager.position.distance(&enemy.position) <= config.contact_radius {
                    villager.take_damage(config.enemy_dps * dt);
                }
            }
        }
    }

    /// Nearest living raider within `range` of `from`
    pub fn nearest_within(&self, from: Vec2, range: f32) -> Option<EnemyId> {
        self.enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| (e.id, e.position.distance(&from)))
            .filter(|(_, d)| *d <= range)
            .min_by_key(|(_, d)| OrderedFloat(*d))
            .map(|(id, _)| id)
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Remove slain raiders, returning their ids
    pub fn sweep_dead(&mut self) -> Vec<EnemyId> {
        let dead: Vec<EnemyId> = self
            .enemies
            .iter()
            .filter(|e| !e.is_alive())
            .map(|e| e.id)
            .collect();
        self.enemies.retain(|e| e.is_alive());
        dead
    }

    /// Remove every raider (dawn). Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.enemies.len();
        self.enemies.clear();
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}
