//! Simulation configuration with documented constants
//!
//! All balance numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every rate is expressed per
//! simulated second; values first tuned per 60 Hz frame are scaled by 60.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, VillageError};
use crate::entity::villager::Job;

/// Configuration for the simulation systems
///
/// These values have been tuned so a fresh village survives its first few
/// nights without player help. Changing them affects pacing and feel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the world RNG. Identical seeds and dt sequences replay
    /// identically.
    pub seed: u64,

    // === CLOCK ===
    /// Length of one full day/night cycle in simulated seconds
    ///
    /// 1000 frames at 60 Hz.
    pub day_length: f32,

    /// Fraction of the day at which daylight begins (0.2 = 04:48)
    pub day_start: f32,

    /// Fraction of the day at which night falls (0.65 = 15:36)
    pub day_end: f32,

    /// Time of day the simulation starts at (0.25 = 06:00)
    pub start_time_fraction: f32,

    // === MAP ===
    pub map_width: f32,
    pub map_height: f32,

    /// No resource node spawns within this distance of home, keeping a
    /// clearing around the fire.
    pub home_clearing_radius: f32,

    // === RESOURCES ===
    /// Number of resource nodes placed at world creation. Depletion always
    /// respawns a replacement, so this count is held constant.
    pub initial_resource_count: usize,

    /// Share of initial nodes that are trees
    pub tree_share: f32,

    /// Share of initial nodes that are rocks (the remainder are bushes)
    pub rock_share: f32,

    // === VILLAGERS ===
    /// Jobs of the villagers placed around home at world creation
    pub starting_jobs: Vec<Job>,

    /// Villagers start with a base speed in `min_speed..max_speed`
    ///
    /// 2.0 to 2.5 units per frame at 60 Hz.
    pub min_speed: f32,
    pub max_speed: f32,

    pub max_hp: f32,

    /// Distance at which a villager counts as having reached a resource,
    /// wander point or enemy
    pub contact_radius: f32,

    /// Larger arrival radius used for home, so returning villagers do not
    /// crowd onto the exact center
    pub home_radius: f32,

    /// Damage applied to a resource node per second of WORK
    ///
    /// 0.5 per frame at 60 Hz. A tree (100 hp) falls in 4 seconds.
    pub harvest_rate: f32,

    /// Chance per second that an idle-job villager picks a wander point
    pub wander_rate: f32,

    /// Wander points are drawn within this distance of the villager
    pub wander_radius: f32,

    // === HUNGER ===
    /// Hunger gained per second
    pub hunger_rate: f32,

    /// Hunger level at which a villager eats one food
    ///
    /// At the default rate a villager eats roughly every 55 seconds.
    pub hunger_threshold: f32,

    /// HP lost per second while hungry with no food in store
    pub starvation_rate: f32,

    // === PROGRESSION ===
    /// Experience granted per successful delivery
    pub xp_per_delivery: u32,

    // === SOLDIERS ===
    /// Soldiers engage enemies within this distance
    pub engagement_range: f32,

    /// Damage a soldier deals per second while in contact
    pub soldier_dps: f32,

    /// Soldiers with no threat in range walk home when farther than this
    pub guard_radius: f32,

    // === THREATS ===
    /// Spawn chance per second per wave while it is night
    ///
    /// At wave 1 a raider appears roughly every ten seconds of darkness.
    pub base_spawn_rate: f32,

    /// Enemies appear on a ring of this radius around home
    pub spawn_ring_radius: f32,

    pub base_enemy_hp: f32,

    /// Extra enemy hp per wave, so later nights bring tougher raiders
    pub hp_per_wave: f32,

    pub enemy_speed: f32,

    /// Damage an enemy deals per second while in contact with a villager
    pub enemy_dps: f32,

    /// Upper bound on concurrently alive enemies
    pub max_enemies: usize,

    /// Remove surviving enemies when daylight returns
    pub despawn_at_dawn: bool,

    // === ECONOMY ===
    pub starting_wood: u32,
    pub starting_stone: u32,
    pub starting_food: u32,
    pub starting_max_population: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,

            day_length: 1000.0 / 60.0,
            day_start: 0.2,
            day_end: 0.65,
            start_time_fraction: 0.25,

            map_width: 4000.0,
            map_height: 4000.0,
            home_clearing_radius: 150.0,

            initial_resource_count: 150,
            tree_share: 0.6,
            rock_share: 0.25,

            // 2 lumberjacks, 1 miner, 2 idlers
            starting_jobs: vec![Job::Lumber, Job::Lumber, Job::Miner, Job::Idle, Job::Idle],
            min_speed: 120.0,
            max_speed: 150.0,
            max_hp: 100.0,
            contact_radius: 30.0,
            home_radius: 60.0,
            harvest_rate: 30.0,
            wander_rate: 0.6,
            wander_radius: 100.0,

            hunger_rate: 1.8,
            hunger_threshold: 100.0,
            starvation_rate: 5.0,

            xp_per_delivery: 25,

            engagement_range: 250.0,
            soldier_dps: 25.0,
            guard_radius: 200.0,

            base_spawn_rate: 0.1,
            spawn_ring_radius: 600.0,
            base_enemy_hp: 50.0,
            hp_per_wave: 20.0,
            enemy_speed: 90.0,
            enemy_dps: 10.0,
            max_enemies: 24,
            despawn_at_dawn: true,

            starting_wood: 100,
            starting_stone: 50,
            starting_food: 200,
            starting_max_population: 5,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| VillageError::ConfigParse(e.to_string()))?;
        config.validate().map_err(VillageError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VillageError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.day_length <= 0.0 {
            return Err(format!("day_length ({}) must be positive", self.day_length));
        }

        if !(0.0..=1.0).contains(&self.day_start)
            || !(0.0..=1.0).contains(&self.day_end)
            || self.day_start >= self.day_end
        {
            return Err(format!(
                "daylight band [{}, {}) must be an ordered range inside [0, 1]",
                self.day_start, self.day_end
            ));
        }

        if self.map_width <= 0.0 || self.map_height <= 0.0 {
            return Err("map dimensions must be positive".into());
        }

        if self.tree_share < 0.0 || self.rock_share < 0.0 || self.tree_share + self.rock_share > 1.0 {
            return Err(format!(
                "tree_share ({}) + rock_share ({}) must stay within [0, 1]",
                self.tree_share, self.rock_share
            ));
        }

        if self.min_speed <= 0.0 || self.min_speed > self.max_speed {
            return Err(format!(
                "speed range [{}, {}] must be positive and ordered",
                self.min_speed, self.max_speed
            ));
        }

        // Home arrival must not be tighter than ordinary contact, or a
        // villager standing in contact range of home could never deliver
        if self.home_radius < self.contact_radius {
            return Err(format!(
                "home_radius ({}) should be >= contact_radius ({})",
                self.home_radius, self.contact_radius
            ));
        }

        if self.hunger_threshold <= 0.0 || self.max_hp <= 0.0 {
            return Err("hunger_threshold and max_hp must be positive".into());
        }

        if self.starting_jobs.len() > self.starting_max_population as usize {
            return Err(format!(
                "{} starting villagers exceed starting_max_population ({})",
                self.starting_jobs.len(),
                self.starting_max_population
            ));
        }

        let rates = [
            self.harvest_rate,
            self.hunger_rate,
            self.starvation_rate,
            self.wander_rate,
            self.base_spawn_rate,
            self.enemy_speed,
            self.enemy_dps,
            self.soldier_dps,
        ];
        if rates.iter().any(|r| *r < 0.0) {
            return Err("rates must not be negative".into());
        }

        Ok(())
    }
}
