//! Command execution - applies queued player commands to the world

use crate::command::queue::Command;
use crate::core::error::Result;
use crate::ecs::world::SimulationWorld;
use crate::entity::villager::Target;
use crate::simulation::tick::SimulationEvent;

/// Applies commands through the world's fallible operations
pub struct CommandExecutor;

impl CommandExecutor {
    /// Apply one command, returning the event that records its effect.
    /// On error the world is left untouched.
    pub fn execute(world: &mut SimulationWorld, command: &Command) -> Result<SimulationEvent> {
        match *command {
            Command::SpawnVillager { job } => {
                let villager = world.spawn_villager(job)?;
                Ok(SimulationEvent::VillagerSpawned {
                    villager,
                    job: job.unwrap_or_default(),
                })
            }
            Command::AssignJob { villager, job } => {
                world.assign_job(villager, job)?;
                Ok(SimulationEvent::JobAssigned { villager, job })
            }
            Command::MoveTo { villager, point } => {
                world.issue_move_command(villager, point)?;
                let point = world
                    .villager(villager)
                    .and_then(|v| match v.target {
                        Some(Target::Point(p)) => Some(p),
                        _ => None,
                    })
                    .unwrap_or(point);
                Ok(SimulationEvent::MoveOrdered { villager, point })
            }
            Command::Build { kind, position } => {
                let structure = world.build(kind, position)?;
                Ok(SimulationEvent::StructureBuilt { structure, kind })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::structure::StructureKind;
    use crate::core::config::SimulationConfig;
    use crate::core::error::VillageError;
    use crate::core::types::{Vec2, VillagerId};
    use crate::entity::villager::Job;

    fn world() -> SimulationWorld {
        SimulationWorld::bare(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_spawn_command_defaults_to_idle() {
        let mut world = world();
        let event = CommandExecutor::execute(&mut world, &Command::SpawnVillager { job: None }).unwrap();
        match event {
            SimulationEvent::VillagerSpawned { villager, job } => {
                assert_eq!(job, Job::Idle);
                assert!(world.villager(villager).is_some());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_move_command_reports_clamped_point() {
        let mut world = world();
        let id = world.spawn_villager(None).unwrap();
        let event = CommandExecutor::execute(
            &mut world,
            &Command::MoveTo {
                villager: id,
                point: Vec2::new(-50.0, 10.0),
            },
        )
        .unwrap();
        assert_eq!(
            event,
            SimulationEvent::MoveOrdered {
                villager: id,
                point: Vec2::new(0.0, 10.0)
            }
        );
    }

    #[test]
    fn test_failed_command_returns_error() {
        let mut world = world();
        world.economy.wood = 0;
        let err = CommandExecutor::execute(
            &mut world,
            &Command::Build {
                kind: StructureKind::Tent,
                position: Vec2::new(100.0, 100.0),
            },
        )
        .unwrap_err();
        assert!(matches!(err, VillageError::InsufficientResources { .. }));

        let err = CommandExecutor::execute(
            &mut world,
            &Command::AssignJob {
                villager: VillagerId(999),
                job: Job::Miner,
            },
        )
        .unwrap_err();
        assert_eq!(err, VillageError::UnknownVillager(VillagerId(999)));
    }
}
