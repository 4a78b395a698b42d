//! Villager behavior state machine
//!
//! IDLE -> MOVE -> WORK -> RETURN -> IDLE, with COMBAT for soldiers.
//! Each tick a villager runs the handler for its current state once;
//! a transition takes effect on the following tick. In COMBAT a soldier
//! always fights the nearest live enemy in range. Every target id is
//! resolved through its registry on use, and a missing or dead target
//! drops the villager back to IDLE with no target.
//!
//! Hunger runs after the state handler, in every state.

use rand::Rng;
use std::f32::consts::TAU;

use crate::city::economy::Economy;
use crate::core::config::SimulationConfig;
use crate::core::types::{Seconds, Vec2};
use crate::entity::villager::{Job, Target, Villager, VillagerState};
use crate::simulation::progression::{grant_xp, speed_multiplier, yield_multiplier};
use crate::simulation::resource_registry::{HarvestOutcome, ResourceRegistry};
use crate::simulation::threat::ThreatSystem;
use crate::simulation::tick::SimulationEvent;

/// Shared state a villager may read or mutate during its update
pub struct VillagerContext<'a, R: Rng + ?Sized> {
    pub config: &'a SimulationConfig,
    pub home: Vec2,
    pub resources: &'a mut ResourceRegistry,
    pub threats: &'a mut ThreatSystem,
    pub economy: &'a mut Economy,
    pub rng: &'a mut R,
    pub events: &'a mut Vec<SimulationEvent>,
}

/// Run one tick of behavior and hunger for a single villager
pub fn update_villager<R: Rng + ?Sized>(
    villager: &mut Villager,
    ctx: &mut VillagerContext<'_, R>,
    dt: Seconds,
) {
    if !villager.is_alive() {
        return;
    }

    match villager.state {
        VillagerState::Idle => step_idle(villager, ctx, dt),
        VillagerState::Move => step_move(villager, ctx, dt),
        VillagerState::Work => step_work(villager, ctx, dt),
        VillagerState::Return => step_return(villager, ctx, dt),
        VillagerState::Combat => step_combat(villager, ctx, dt),
    }

    apply_hunger(villager, ctx.economy, ctx.config, dt);
}

/// Distance a villager covers in `dt` at its current level
pub fn travel_distance(villager: &Villager, dt: Seconds) -> f32 {
    villager.base_speed * speed_multiplier(villager.level) * dt
}

fn step_idle<R: Rng + ?Sized>(villager: &mut Villager, ctx: &mut VillagerContext<'_, R>, dt: Seconds) {
    // A loaded villager always heads home first
    if villager.has_item() {
        villager.state = VillagerState::Return;
        villager.target = Some(Target::Home);
        return;
    }

    match villager.job {
        Job::Soldier => {
            if let Some(enemy) = ctx
                .threats
                .nearest_within(villager.position, ctx.config.engagement_range)
            {
                villager.state = VillagerState::Combat;
                villager.target = Some(Target::Enemy(enemy));
            } else if villager.position.distance(&ctx.home) > ctx.config.guard_radius {
                villager.state = VillagerState::Move;
                villager.target = Some(Target::Home);
            }
        }
        Job::Idle => {
            let chance = (ctx.config.wander_rate * dt).clamp(0.0, 1.0);
            if chance > 0.0 && ctx.rng.gen::<f32>() < chance {
                let angle = ctx.rng.gen::<f32>() * TAU;
                // sqrt keeps points uniform over the disc
                let distance = ctx.rng.gen::<f32>().sqrt() * ctx.config.wander_radius;
                let point = villager
                    .position
                    .on_ring(angle, distance)
                    .clamp_to(ctx.config.map_width, ctx.config.map_height);
                villager.state = VillagerState::Move;
                villager.target = Some(Target::Point(point));
            }
        }
        job => {
            let Some(resource_type) = job.resource_type() else {
                return;
            };
            if let Some(node) = ctx.resources.find_nearest(resource_type, villager.position) {
                villager.state = VillagerState::Move;
                villager.target = Some(Target::Resource(node));
            }
        }
    }
}

fn step_move<R: Rng + ?Sized>(villager: &mut Villager, ctx: &mut VillagerContext<'_, R>, dt: Seconds) {
    let Some(target) = villager.target else {
        villager.reset_to_idle();
        return;
    };

    let (destination, radius) = match target {
        Target::Resource(id) => match ctx.resources.get_alive(id) {
            Some(node) => (node.position, ctx.config.contact_radius),
            None => {
                villager.reset_to_idle();
                return;
            }
        },
        Target::Point(point) => (point, ctx.config.contact_radius),
        Target::Home => (ctx.home, ctx.config.home_radius),
        // Soldiers close in on enemies from COMBAT, never from MOVE
        Target::Enemy(_) => {
            villager.reset_to_idle();
            return;
        }
    };

    if !move_towards(villager, destination, radius, dt) {
        return;
    }

    match target {
        Target::Resource(_) => villager.state = VillagerState::Work,
        Target::Home if villager.has_item() => deliver(villager, ctx),
        Target::Home | Target::Point(_) | Target::Enemy(_) => villager.reset_to_idle(),
    }
}

fn step_work<R: Rng + ?Sized>(villager: &mut Villager, ctx: &mut VillagerContext<'_, R>, dt: Seconds) {
    let Some(Target::Resource(id)) = villager.target else {
        villager.reset_to_idle();
        return;
    };
    let Some(resource_type) = ctx.resources.get_alive(id).map(|n| n.resource_type) else {
        // Lost the race: someone else finished this node
        villager.reset_to_idle();
        return;
    };

    match ctx
        .resources
        .apply_damage(id, ctx.config.harvest_rate * dt, &mut *ctx.rng)
    {
        HarvestOutcome::Damaged { .. } => {}
        HarvestOutcome::Depleted { replacement } => {
            villager.carrying = Some(resource_type);
            villager.target = Some(Target::Home);
            villager.state = VillagerState::Return;
            ctx.events.push(SimulationEvent::ResourceDepleted {
                resource: id,
                by: villager.id,
                replacement,
            });
        }
        HarvestOutcome::Gone => villager.reset_to_idle(),
    }
}

fn step_return<R: Rng + ?Sized>(villager: &mut Villager, ctx: &mut VillagerContext<'_, R>, dt: Seconds) {
    villager.target = Some(Target::Home);
    if move_towards(villager, ctx.home, ctx.config.home_radius, dt) {
        deliver(villager, ctx);
    }
}

/// Re-pick the nearest live enemy in range every tick, so a closer raider
/// takes over from the one first engaged
fn step_combat<R: Rng + ?Sized>(villager: &mut Villager, ctx: &mut VillagerContext<'_, R>, dt: Seconds) {
    let Some(id) = ctx
        .threats
        .nearest_within(villager.position, ctx.config.engagement_range)
    else {
        villager.reset_to_idle();
        return;
    };
    villager.target = Some(Target::Enemy(id));

    let step = travel_distance(villager, dt);
    let Some(enemy) = ctx.threats.get_mut(id) else {
        villager.reset_to_idle();
        return;
    };

    let distance = villager.position.distance(&enemy.position);
    if distance > ctx.config.contact_radius {
        villager.position = villager.position.step_towards(enemy.position, step);
    }

    if villager.position.distance(&enemy.position) <= ctx.config.contact_radius {
        enemy.take_damage(ctx.config.soldier_dps * dt);
        if !enemy.is_alive() {
            tracing::debug!("{} slew {}", villager.id, id);
            ctx.events.push(SimulationEvent::EnemySlain {
                enemy: id,
                by: villager.id,
            });
            villager.reset_to_idle();
        }
    }
}

/// Step toward `destination`; true once within `radius`
fn move_towards(villager: &mut Villager, destination: Vec2, radius: f32, dt: Seconds) -> bool {
    if villager.position.distance(&destination) <= radius {
        return true;
    }
    let step = travel_distance(villager, dt);
    villager.position = villager.position.step_towards(destination, step);
    villager.position.distance(&destination) <= radius
}

/// Hand the carried load to the economy and collect experience
fn deliver<R: Rng + ?Sized>(villager: &mut Villager, ctx: &mut VillagerContext<'_, R>) {
    if let Some(resource_type) = villager.carrying.take() {
        let amount = (resource_type.base_yield() * yield_multiplier(villager.level)).floor() as u32;
        let commodity = resource_type.commodity();
        ctx.economy.deposit(commodity, amount);
        ctx.events.push(SimulationEvent::Delivered {
            villager: villager.id,
            commodity,
            amount,
        });

        let gained = grant_xp(&mut villager.xp, &mut villager.level, ctx.config.xp_per_delivery);
        if gained > 0 {
            tracing::debug!("{} reached level {}", villager.id, villager.level);
            ctx.events.push(SimulationEvent::LevelUp {
                villager: villager.id,
                level: villager.level,
            });
        }
    }
    villager.reset_to_idle();
}

/// Grow hunger; at the threshold eat one food or lose hp to starvation.
/// Returns true if the villager ate.
pub fn apply_hunger(
    villager: &mut Villager,
    economy: &mut Economy,
    config: &SimulationConfig,
    dt: Seconds,
) -> bool {
    if !villager
        .hunger
        .accumulate(config.hunger_rate, dt, config.hunger_threshold)
    {
        return false;
    }

    if economy.consume_food(1).is_ok() {
        villager.hunger.satisfy();
        true
    } else {
        villager.take_damage(config.starvation_rate * dt);
        false
    }
}
