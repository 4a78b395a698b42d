//! Tick system - orchestrates one simulation step
//!
//! queued commands -> clock -> night spawns -> enemy movement and contact
//! damage -> villager state machines and hunger (insertion order) -> sweep
//! of dead villagers, slain enemies and depleted nodes.
//!
//! The tick never fails. Command failures become `CommandRejected` events.

use crate::city::economy::Commodity;
use crate::city::structure::StructureKind;
use crate::command::executor::CommandExecutor;
use crate::command::queue::Command;
use crate::core::error::VillageError;
use crate::core::types::{EnemyId, ResourceId, Seconds, StructureId, Vec2, VillagerId};
use crate::ecs::world::SimulationWorld;
use crate::entity::villager::Job;
use crate::simulation::villager_fsm::{update_villager, VillagerContext};

/// Events generated during a simulation tick
///
/// Returned by `run_simulation_tick` for the presentation layer's log.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    VillagerSpawned {
        villager: VillagerId,
        job: Job,
    },
    JobAssigned {
        villager: VillagerId,
        job: Job,
    },
    MoveOrdered {
        villager: VillagerId,
        point: Vec2,
    },
    StructureBuilt {
        structure: StructureId,
        kind: StructureKind,
    },
    /// A queued command failed; nothing was mutated
    CommandRejected {
        command: Command,
        reason: VillageError,
    },
    /// `by` struck the final blow; `replacement` is the node spawned in its place
    ResourceDepleted {
        resource: ResourceId,
        by: VillagerId,
        replacement: ResourceId,
    },
    Delivered {
        villager: VillagerId,
        commodity: Commodity,
        amount: u32,
    },
    LevelUp {
        villager: VillagerId,
        level: u32,
    },
    VillagerDied {
        villager: VillagerId,
        job: Job,
    },
    EnemySpawned {
        enemy: EnemyId,
        wave: u32,
    },
    EnemySlain {
        enemy: EnemyId,
        by: VillagerId,
    },
    NightFell {
        day: u32,
        wave: u32,
    },
    /// Daylight returned; `dispersed` raiders left the map
    DayBroke {
        day: u32,
        dispersed: usize,
    },
    NewDay {
        day: u32,
        wave: u32,
    },
}

/// Run a single simulation tick of `dt` seconds
pub fn run_simulation_tick(world: &mut SimulationWorld, dt: Seconds) -> Vec<SimulationEvent> {
    // Negative or non-finite steps freeze time rather than rewind it
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut events = Vec::new();

    apply_queued_commands(world, &mut events);
    advance_clock(world, dt, &mut events);
    update_threats(world, dt, &mut events);
    update_villagers(world, dt, &mut events);
    sweep(world, &mut events);

    world.current_tick += 1;
    events
}

fn apply_queued_commands(world: &mut SimulationWorld, events: &mut Vec<SimulationEvent>) {
    for command in world.commands.drain() {
        match CommandExecutor::execute(world, &command) {
            Ok(event) => events.push(event),
            Err(reason) => {
                tracing::warn!("Rejected {:?}: {}", command, reason);
                events.push(SimulationEvent::CommandRejected { command, reason });
            }
        }
    }
}

fn advance_clock(world: &mut SimulationWorld, dt: Seconds, events: &mut Vec<SimulationEvent>) {
    let transition = world.clock.advance(dt);
    let (day, wave) = (world.clock.day(), world.clock.wave());

    if transition.new_days > 0 {
        tracing::info!("Day {} begins (wave {})", day, wave);
        events.push(SimulationEvent::NewDay { day, wave });
    }

    // Events follow the order the boundaries were crossed: a step ending in
    // daylight saw its last dusk before its last dawn.
    let ends_at_night = world.clock.is_night();
    if transition.dusks > 0 && !ends_at_night {
        night_fell(day, wave, events);
    }
    if transition.dawns > 0 {
        let dispersed = if world.config.despawn_at_dawn {
            world.threats.clear()
        } else {
            0
        };
        tracing::info!("Dawn on day {}, {} raiders dispersed", day, dispersed);
        events.push(SimulationEvent::DayBroke { day, dispersed });
    }
    if transition.dusks > 0 && ends_at_night {
        night_fell(day, wave, events);
    }
}

fn night_fell(day: u32, wave: u32, events: &mut Vec<SimulationEvent>) {
    tracing::info!("Night falls on day {} (wave {})", day, wave);
    events.push(SimulationEvent::NightFell { day, wave });
}

fn update_threats(world: &mut SimulationWorld, dt: Seconds, events: &mut Vec<SimulationEvent>) {
    if let Some(enemy) =
        world
            .threats
            .maybe_spawn(&world.clock, world.home, &world.config, dt, &mut world.rng)
    {
        events.push(SimulationEvent::EnemySpawned {
            enemy,
            wave: world.clock.wave(),
        });
    }

    world
        .threats
        .update_enemies(&mut world.villagers, Some(world.home), &world.config, dt);
}

fn update_villagers(world: &mut SimulationWorld, dt: Seconds, events: &mut Vec<SimulationEvent>) {
    let mut ctx = VillagerContext {
        config: &world.config,
        home: world.home,
        resources: &mut world.resources,
        threats: &mut world.threats,
        economy: &mut world.economy,
        rng: &mut world.rng,
        events,
    };

    for villager in world.villagers.iter_mut() {
        update_villager(villager, &mut ctx, dt);
    }
}

fn sweep(world: &mut SimulationWorld, events: &mut Vec<SimulationEvent>) {
    let dead: Vec<(VillagerId, Job)> = world
        .villagers
        .iter()
        .filter(|v| !v.is_alive())
        .map(|v| (v.id, v.job))
        .collect();

    if !dead.is_empty() {
        world.villagers.retain(|v| v.is_alive());
        world.rebuild_index();
        for (villager, job) in dead {
            world.economy.remove_villager();
            tracing::info!("{} ({:?}) died", villager, job);
            events.push(SimulationEvent::VillagerDied { villager, job });
        }
    }

    world.threats.sweep_dead();
    world.resources.sweep_depleted();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;

    fn raider_world(start_time_fraction: f32) -> SimulationWorld {
        let config = SimulationConfig {
            start_time_fraction,
            base_spawn_rate: 0.0,
            starting_jobs: Vec::new(),
            initial_resource_count: 0,
            ..SimulationConfig::default()
        };
        let mut world = SimulationWorld::new(config).unwrap();
        let position = Vec2::new(world.home.x + 400.0, world.home.y);
        world.threats.spawn_at(position, 1, &world.config);
        world
    }

    #[test]
    fn test_full_day_step_still_disperses_raiders() {
        let mut world = raider_world(0.9);
        assert!(world.clock.is_night());
        let day_length = world.config.day_length;

        let events = world.tick(day_length);

        assert!(world.clock.is_night(), "0.9 -> 1.9 ends at night");
        assert_eq!(world.threats.len(), 0);
        let broke = events
            .iter()
            .position(|e| matches!(e, SimulationEvent::DayBroke { dispersed: 1, .. }));
        let fell = events
            .iter()
            .position(|e| matches!(e, SimulationEvent::NightFell { .. }));
        assert!(broke.is_some() && fell.is_some());
        assert!(broke < fell, "dawn came before dusk within the step");
    }

    #[test]
    fn test_dusk_then_dawn_in_one_step() {
        // 0.6 -> 1.3: dusk on day 1, then dawn on day 2
        let mut world = raider_world(0.6);
        let day_length = world.config.day_length;

        let events = world.tick(day_length * 0.7);

        assert!(!world.clock.is_night());
        assert_eq!(world.threats.len(), 0);
        let kinds: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                SimulationEvent::NightFell { .. } => Some("night"),
                SimulationEvent::DayBroke { .. } => Some("dawn"),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec!["night", "dawn"]);
        assert!(events
            .iter()
            .any(|e| matches!(e, SimulationEvent::NewDay { day: 2, wave: 2 })));
    }

    #[test]
    fn test_raiders_stay_without_despawn_at_dawn() {
        let mut world = raider_world(0.9);
        world.config.despawn_at_dawn = false;
        let day_length = world.config.day_length;

        let events = world.tick(day_length);

        assert_eq!(world.threats.len(), 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, SimulationEvent::DayBroke { dispersed: 0, .. })));
    }
}
