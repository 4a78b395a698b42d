//! Simulation world - owns every registry, the clock, the economy and the RNG

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::city::economy::Economy;
use crate::city::structure::{StructureKind, StructureRegistry};
use crate::command::queue::{Command, CommandQueue};
use crate::core::clock::SimulationClock;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, VillageError};
use crate::core::types::{IdCounter, Seconds, StructureId, Vec2, VillagerId};
use crate::ecs::snapshot::WorldSnapshot;
use crate::entity::villager::{Job, Target, Villager, VillagerState};
use crate::simulation::resource_registry::ResourceRegistry;
use crate::simulation::threat::ThreatSystem;
use crate::simulation::tick::{run_simulation_tick, SimulationEvent};

/// Half-width of the square around home where new villagers appear
const SPAWN_SCATTER: f32 = 50.0;

/// The village and everything in it
pub struct SimulationWorld {
    pub current_tick: u64,
    pub config: SimulationConfig,
    pub clock: SimulationClock,
    pub economy: Economy,
    pub resources: ResourceRegistry,
    pub threats: ThreatSystem,
    pub structures: StructureRegistry,
    pub home: Vec2,
    pub(crate) villagers: Vec<Villager>,
    villager_index: AHashMap<VillagerId, usize>,
    villager_ids: IdCounter,
    pub(crate) commands: CommandQueue,
    pub(crate) rng: ChaCha8Rng,
}

impl SimulationWorld {
    /// A ready-to-play village: home fire, scattered resource nodes and
    /// the configured starting villagers
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut world = Self::bare(config)?;

        let count = world.config.initial_resource_count;
        let (trees, rocks) = (world.config.tree_share, world.config.rock_share);
        world.resources.populate(count, trees, rocks, &mut world.rng);

        let jobs = world.config.starting_jobs.clone();
        for job in jobs {
            world.spawn_villager(Some(job))?;
        }

        tracing::info!(
            "Village founded with {} villagers and {} resource nodes (seed {})",
            world.villagers.len(),
            world.resources.len(),
            world.config.seed
        );
        Ok(world)
    }

    /// Home fire and starting stores only: no nodes, no villagers
    pub fn bare(config: SimulationConfig) -> Result<Self> {
        config.validate().map_err(VillageError::InvalidConfig)?;

        let home = Vec2::new(config.map_width / 2.0, config.map_height / 2.0);
        let clock = SimulationClock::new(
            config.day_length,
            config.day_start,
            config.day_end,
            config.start_time_fraction,
        );
        let economy = Economy::new(
            config.starting_wood,
            config.starting_stone,
            config.starting_food,
            config.starting_max_population,
        );
        let resources = ResourceRegistry::new(
            config.map_width,
            config.map_height,
            home,
            config.home_clearing_radius,
        );
        // The founding fire is free and marks home
        let mut structures = StructureRegistry::new();
        structures.place(StructureKind::Fire, home);

        Ok(Self {
            current_tick: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            clock,
            economy,
            resources,
            threats: ThreatSystem::new(),
            structures,
            home,
            villagers: Vec::new(),
            villager_index: AHashMap::new(),
            villager_ids: IdCounter::new(),
            commands: CommandQueue::new(),
        })
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, dt: Seconds) -> Vec<SimulationEvent> {
        run_simulation_tick(self, dt)
    }

    /// Queue a command for the start of the next tick
    pub fn submit(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Spawn a villager near home
    pub fn spawn_villager(&mut self, job: Option<Job>) -> Result<VillagerId> {
        // Checked before any roll so a rejected spawn leaves the RNG alone
        if !self.economy.has_room() {
            return Err(VillageError::PopulationCap {
                population: self.economy.population,
                max_population: self.economy.max_population,
            });
        }
        let offset = Vec2::new(
            self.rng.gen_range(-SPAWN_SCATTER..=SPAWN_SCATTER),
            self.rng.gen_range(-SPAWN_SCATTER..=SPAWN_SCATTER),
        );
        let position = (self.home + offset).clamp_to(self.config.map_width, self.config.map_height);
        self.spawn_villager_at(job, position)
    }

    pub fn spawn_villager_at(&mut self, job: Option<Job>, position: Vec2) -> Result<VillagerId> {
        self.economy.add_villager()?;

        let id = VillagerId(self.villager_ids.next());
        let speed = self
            .rng
            .gen_range(self.config.min_speed..=self.config.max_speed);
        let job = job.unwrap_or_default();
        let villager = Villager::new(id, job, position, speed, self.config.max_hp);

        self.villager_index.insert(id, self.villagers.len());
        self.villagers.push(villager);
        tracing::debug!("{} spawned as {:?}", id, job);
        Ok(id)
    }

    /// Change a villager's job. A villager carrying a load still delivers it;
    /// otherwise it drops whatever it was doing.
    pub fn assign_job(&mut self, id: VillagerId, job: Job) -> Result<()> {
        let villager = self
            .villager_mut(id)
            .ok_or(VillageError::UnknownVillager(id))?;
        if villager.job == job {
            return Ok(());
        }

        villager.job = job;
        if villager.has_item() {
            villager.state = VillagerState::Return;
            villager.target = Some(Target::Home);
        } else {
            villager.reset_to_idle();
        }
        tracing::debug!("{} reassigned to {:?}", id, job);
        Ok(())
    }

    /// Send an idle-job villager to a point on the map
    pub fn issue_move_command(&mut self, id: VillagerId, point: Vec2) -> Result<()> {
        let (width, height) = (self.config.map_width, self.config.map_height);
        let villager = self
            .villager_mut(id)
            .ok_or(VillageError::UnknownVillager(id))?;
        // A loaded villager finishes its delivery first
        if villager.job != Job::Idle || villager.has_item() {
            return Err(VillageError::MoveRequiresIdleJob {
                villager: id,
                job: villager.job,
            });
        }

        villager.state = VillagerState::Move;
        villager.target = Some(Target::Point(point.clamp_to(width, height)));
        Ok(())
    }

    /// Pay for and place a structure
    pub fn build(&mut self, kind: StructureKind, position: Vec2) -> Result<StructureId> {
        self.economy.spend(kind, &kind.cost())?;

        let position = position.clamp_to(self.config.map_width, self.config.map_height);
        let id = self.structures.place(kind, position);
        self.economy.raise_max_population(kind.housing_capacity());
        tracing::info!(
            "Built {:?} at ({:.0}, {:.0}), population cap now {}",
            kind,
            position.x,
            position.y,
            self.economy.max_population
        );
        Ok(id)
    }

    /// Read-only view for presentation
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    pub fn villager(&self, id: VillagerId) -> Option<&Villager> {
        let idx = *self.villager_index.get(&id)?;
        debug_assert_eq!(self.villagers[idx].id, id, "villager index out of sync");
        self.villagers.get(idx)
    }

    pub fn villager_mut(&mut self, id: VillagerId) -> Option<&mut Villager> {
        let idx = *self.villager_index.get(&id)?;
        debug_assert_eq!(self.villagers[idx].id, id, "villager index out of sync");
        self.villagers.get_mut(idx)
    }

    /// Living villagers in insertion order
    pub fn villagers(&self) -> &[Villager] {
        &self.villagers
    }

    pub fn villager_count(&self) -> usize {
        self.villagers.len()
    }

    /// Re-derive id -> slot after removals
    pub(crate) fn rebuild_index(&mut self) {
        self.villager_index.clear();
        for (idx, villager) in self.villagers.iter().enumerate() {
            self.villager_index.insert(villager.id, idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::resource_registry::ResourceType;

    fn bare() -> SimulationWorld {
        SimulationWorld::bare(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_new_world_matches_starting_config() {
        let world = SimulationWorld::new(SimulationConfig::default()).unwrap();
        assert_eq!(world.villager_count(), 5);
        assert_eq!(world.economy.population, 5);
        assert_eq!(world.resources.len(), 150);
        assert_eq!(world.structures.count(StructureKind::Fire), 1);
        assert_eq!(world.home, Vec2::new(2000.0, 2000.0));

        let lumber = world.villagers().iter().filter(|v| v.job == Job::Lumber).count();
        assert_eq!(lumber, 2);
        for v in world.villagers() {
            assert!(v.position.distance(&world.home) <= SPAWN_SCATTER * 1.5);
            assert!((120.0..=150.0).contains(&v.base_speed));
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig {
            day_length: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            SimulationWorld::new(config),
            Err(VillageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_spawn_respects_population_cap() {
        let mut world = bare();
        for _ in 0..5 {
            world.spawn_villager(None).unwrap();
        }
        let err = world.spawn_villager(Some(Job::Miner)).unwrap_err();
        assert!(matches!(err, VillageError::PopulationCap { .. }));
        assert_eq!(world.villager_count(), 5);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut world = bare();
        let a = world.spawn_villager(None).unwrap();
        world.villager_mut(a).unwrap().hp = 0.0;
        world.tick(0.0);
        assert!(world.villager(a).is_none());

        let b = world.spawn_villager(None).unwrap();
        assert!(b.0 > a.0);
    }

    #[test]
    fn test_assign_job_resets_unloaded_villager() {
        let mut world = bare();
        let id = world.spawn_villager(None).unwrap();
        world.issue_move_command(id, Vec2::new(10.0, 10.0)).unwrap();

        world.assign_job(id, Job::Forager).unwrap();
        let v = world.villager(id).unwrap();
        assert_eq!(v.job, Job::Forager);
        assert_eq!(v.state, VillagerState::Idle);
        assert_eq!(v.target, None);
    }

    #[test]
    fn test_move_rejected_for_working_villager() {
        let mut world = bare();
        let id = world.spawn_villager(Some(Job::Lumber)).unwrap();
        let before = world.villager(id).unwrap().clone();

        let err = world.issue_move_command(id, Vec2::new(0.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            VillageError::MoveRequiresIdleJob {
                villager: id,
                job: Job::Lumber
            }
        );
        assert_eq!(world.villager(id).unwrap(), &before);
    }

    #[test]
    fn test_move_rejected_while_carrying() {
        let mut world = bare();
        let id = world.spawn_villager(Some(Job::Lumber)).unwrap();
        world.villager_mut(id).unwrap().carrying = Some(ResourceType::Tree);
        world.assign_job(id, Job::Idle).unwrap();
        assert_eq!(world.villager(id).unwrap().state, VillagerState::Return);

        assert!(world.issue_move_command(id, Vec2::new(0.0, 0.0)).is_err());
        assert_eq!(world.villager(id).unwrap().state, VillagerState::Return);
    }

    #[test]
    fn test_tent_raises_population_cap() {
        let mut world = bare();
        world.build(StructureKind::Tent, Vec2::new(2100.0, 2000.0)).unwrap();
        assert_eq!(world.economy.wood, 60);
        assert_eq!(world.economy.stone, 40);
        assert_eq!(world.economy.max_population, 7);
    }

    #[test]
    fn test_index_survives_removal_in_the_middle() {
        let mut world = bare();
        let a = world.spawn_villager(None).unwrap();
        let b = world.spawn_villager(None).unwrap();
        let c = world.spawn_villager(None).unwrap();

        world.villager_mut(b).unwrap().hp = 0.0;
        world.tick(0.0);

        assert_eq!(world.villager(a).unwrap().id, a);
        assert_eq!(world.villager(c).unwrap().id, c);
        assert_eq!(world.economy.population, 2);
    }
}
