//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically. Within a tick
//! vessels move first, hitboxes are refitted next and projectiles are tested
//! last, so every hit sees this frame's geometry.

use serde::{Deserialize, Serialize};

use super::combat;
use super::state::{MatchEvent, MatchPhase, World};
use super::vessel::{Intent, Pilot, Side, VesselId};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Intent polled from the player's controls
    pub player: Intent,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &FrameInput) {
    let tuning = &world.tuning;

    world.camera.decay_shake(tuning.camera.shake_decay);

    // Don't tick once the player is gone
    if world.phase == MatchPhase::Sunk {
        return;
    }

    world.time_ticks += 1;

    // All AI decisions read the same pre-movement snapshot of the player
    let intents: Vec<Intent> = {
        let player = &world.vessels[VesselId::PLAYER.index()];
        world
            .vessels
            .iter()
            .map(|vessel| match vessel.pilot {
                Pilot::Player => input.player,
                Pilot::Ai => combat::decide(vessel, player, &tuning.combat),
            })
            .collect()
    };

    // Movement and firing; new shots join the live set next pass
    for (index, (vessel, intent)) in world.vessels.iter_mut().zip(&intents).enumerate() {
        if !vessel.active {
            continue;
        }
        vessel.step(intent, &tuning.vessel);
        for side in Side::BOTH {
            if intent.wants_fire(side) {
                let direction = vessel.broadside(side, &tuning.vessel);
                vessel.fire(VesselId(index), side, direction, &tuning.vessel, &mut world.projectiles);
            }
        }
    }

    for (index, vessel) in world.vessels.iter().enumerate() {
        world.hitboxes.update(VesselId(index), vessel);
    }

    let impacts = world.projectiles.step(&world.hitboxes, &mut world.vessels);
    for impact in impacts {
        if impact.target == VesselId::PLAYER {
            world.camera.add_shake(tuning.camera.shake_per_hit);
        }
        world.last_attacker[impact.target.index()] = Some(impact.attacker);
        world.events.push(MatchEvent::VesselHit {
            target: impact.target,
            attacker: impact.attacker,
            damage: impact.damage,
            health: impact.health,
        });
    }

    respawn_pooled(world);
    resolve_sinkings(world);

    let focus = world.vessels[VesselId::PLAYER.index()].position;
    world.camera.follow(focus);
    let scope = world.camera.scope();
    world.waves.step(&scope);
}

/// Count down inactive enemies and return expired ones to play
fn respawn_pooled(world: &mut World) {
    for index in 0..world.vessels.len() {
        let vessel = &mut world.vessels[index];
        if vessel.active || vessel.pilot != Pilot::Ai {
            continue;
        }
        vessel.respawn_timer = vessel.respawn_timer.saturating_sub(1);
        if vessel.respawn_timer > 0 {
            continue;
        }

        let (position, heading) = world.random_ring_spawn();
        let id = VesselId(index);
        world.vessels[index].respawn(position, heading, &world.tuning.vessel);
        world.hitboxes.update(id, &world.vessels[index]);
        world.last_attacker[index] = None;
        world.events.push(MatchEvent::VesselRespawned { id, position });
        log::info!("Vessel {} respawned at ({:.1}, {:.1})", index, position.x, position.z);
    }
}

/// Retire vessels whose health ran out this tick
fn resolve_sinkings(world: &mut World) {
    let respawn_delay = world.tuning.fleet.respawn_delay;
    for index in 0..world.vessels.len() {
        let vessel = &mut world.vessels[index];
        if !vessel.active || vessel.health > 0.0 {
            continue;
        }
        let id = VesselId(index);
        match vessel.pilot {
            Pilot::Player => {
                world.phase = MatchPhase::Sunk;
                world.events.push(MatchEvent::PlayerSunk);
                log::info!("Player sunk after {} ticks", world.time_ticks);
            }
            Pilot::Ai => {
                // A zero delay would skip the pool entirely
                vessel.deactivate(respawn_delay.max(1));
                world.hitboxes.update(id, vessel);
                let by = world.last_attacker[index].unwrap_or(VesselId::PLAYER);
                world.events.push(MatchEvent::VesselSunk { id, by });
                log::info!("Vessel {} sunk by vessel {}", index, by.index());
            }
        }
    }
}

/// Fixed-step accumulator for hosts with a variable frame rate
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add host frame time and return how many ticks to run now
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, 0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog we refused to simulate
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::Tuning;
    use crate::sim::projectile::Projectile;

    fn duel_world(enemies: usize) -> World {
        let mut tuning = Tuning::default();
        tuning.fleet.enemy_count = enemies;
        World::new(tuning, 12345)
    }

    #[test]
    fn test_tick_advances_player() {
        let mut world = duel_world(0);
        let input = FrameInput {
            player: Intent {
                accelerate: true,
                ..Default::default()
            },
        };
        for _ in 0..30 {
            tick(&mut world, &input);
        }
        assert_eq!(world.time_ticks, 30);
        assert!(world.player().position.x > 0.0);
        // Camera trails the player
        assert_eq!(world.camera.target, world.player().position);
        assert!(world.camera.position.x < world.player().position.x);
    }

    #[test]
    fn test_player_fire_is_rate_limited() {
        let mut world = duel_world(0);
        let input = FrameInput {
            player: Intent {
                fire_left: true,
                fire_right: true,
                ..Default::default()
            },
        };
        tick(&mut world, &input);
        assert_eq!(world.projectiles.len(), 2);
        // Queued this tick, integrated from the next one
        assert!(world.projectiles.live().iter().all(|p| p.age == 0));

        tick(&mut world, &input);
        assert_eq!(world.projectiles.len(), 2);
        assert!(world.projectiles.live().iter().all(|p| p.age == 1));
    }

    #[test]
    fn test_hit_on_player_shakes_camera() {
        let mut world = duel_world(1);
        let enemy = VesselId(1);
        // Parked for the whole test so only the planted shot can land
        world.vessels[1].deactivate(u32::MAX);

        // Drop a shot right onto the player's path
        let player_pos = world.player().position;
        let mut shot = Projectile::new(enemy, player_pos, Vec3::X, &world.tuning.projectile);
        shot.position.y = 0.5;
        world.projectiles.insert(shot);

        tick(&mut world, &FrameInput::default());
        assert!(world.camera.shake > 0.0);
        assert!(world.player().health < world.tuning.vessel.max_health);
        let events = world.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            MatchEvent::VesselHit { target, attacker, .. } if *target == VesselId::PLAYER && *attacker == enemy
        )));

        for _ in 0..100 {
            tick(&mut world, &FrameInput::default());
        }
        assert_eq!(world.camera.shake, 0.0);
    }

    #[test]
    fn test_sunk_enemy_respawns_after_delay() {
        let mut world = duel_world(1);
        let delay = world.tuning.fleet.respawn_delay;
        world.vessels[1].health = 0.0;

        tick(&mut world, &FrameInput::default());
        assert!(!world.vessels[1].active);
        assert!(!world.hitboxes.get(VesselId(1)).unwrap().enabled);
        assert_eq!(world.active_enemies().count(), 0);
        assert!(world
            .drain_events()
            .iter()
            .any(|e| matches!(e, MatchEvent::VesselSunk { id, .. } if *id == VesselId(1))));

        let parked = world.vessels[1].position;
        for _ in 0..delay - 1 {
            tick(&mut world, &FrameInput::default());
            assert!(!world.vessels[1].active);
        }
        // Inactive vessels don't move
        assert_eq!(world.vessels[1].position, parked);

        tick(&mut world, &FrameInput::default());
        let enemy = &world.vessels[1];
        assert!(enemy.active);
        assert_eq!(enemy.health, world.tuning.vessel.max_health);
        assert!(world.hitboxes.get(VesselId(1)).unwrap().enabled);
        assert!(world
            .drain_events()
            .iter()
            .any(|e| matches!(e, MatchEvent::VesselRespawned { id, .. } if *id == VesselId(1))));
    }

    #[test]
    fn test_player_sinking_stops_the_match() {
        let mut world = duel_world(1);
        world.player_mut().health = 0.0;
        tick(&mut world, &FrameInput::default());
        assert_eq!(world.phase, MatchPhase::Sunk);
        assert!(world.drain_events().contains(&MatchEvent::PlayerSunk));

        let ticks = world.time_ticks;
        let position = world.player().position;
        tick(&mut world, &FrameInput::default());
        assert_eq!(world.time_ticks, ticks);
        assert_eq!(world.player().position, position);
    }

    #[test]
    fn test_ai_closes_on_the_player() {
        let mut world = duel_world(1);
        world.vessels[1].position = Vec3::new(60.0, 1.5, 0.0);
        world.vessels[1].heading = 0.0;
        let start = (world.vessels[1].position - world.player().position).length();

        for _ in 0..600 {
            tick(&mut world, &FrameInput::default());
        }
        let end = (world.vessels[1].position - world.player().position).length();
        assert!(end < start);
    }

    #[test]
    fn test_wave_field_tracks_camera() {
        let mut world = duel_world(0);
        let input = FrameInput {
            player: Intent {
                accelerate: true,
                ..Default::default()
            },
        };
        // The buoyancy bob nudges the scope area every frame
        for _ in 0..2500 {
            tick(&mut world, &input);
            let target = world.waves.target_count(&world.camera.scope());
            assert!(world.waves.len().abs_diff(target) <= world.waves.slack());
        }
        let bounds = world.camera.scope().bounds();
        let margin = world.tuning.waves.exit_margin;
        assert!(!world.waves.is_empty());
        for tile in world.waves.tiles() {
            assert!(bounds.exited_edge(*tile, margin).is_none());
        }
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed should produce identical results
        let mut world1 = World::new(Tuning::default(), 99999);
        let mut world2 = World::new(Tuning::default(), 99999);

        let inputs = [
            FrameInput {
                player: Intent {
                    accelerate: true,
                    turn_left: true,
                    ..Default::default()
                },
            },
            FrameInput {
                player: Intent {
                    fire_right: true,
                    ..Default::default()
                },
            },
            FrameInput::default(),
        ];

        for frame in 0..900 {
            let input = &inputs[frame % inputs.len()];
            tick(&mut world1, input);
            tick(&mut world2, input);
        }

        assert_eq!(world1.time_ticks, world2.time_ticks);
        assert_eq!(world1.projectiles.len(), world2.projectiles.len());
        assert_eq!(world1.waves.tiles(), world2.waves.tiles());
        for (a, b) in world1.vessels.iter().zip(&world2.vessels) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.health, b.health);
        }
    }

    #[test]
    fn test_frame_clock_substeps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.5 + 1e-4), 1);
        assert_eq!(clock.advance(SIM_DT * 2.0), 2);
        // Long stalls are capped
        assert_eq!(clock.advance(1.0), MAX_SUBSTEPS);
        assert!(clock.advance(0.0) <= 1);
    }
}
