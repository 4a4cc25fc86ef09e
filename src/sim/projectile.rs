//! Cannon shots: ballistic flight, hits and retirement
//!
//! Shots fired during a frame are queued and join the live set at the end
//! of the next [`ProjectileSet::step`], so the live list is never extended
//! while it is being integrated.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{HitboxRegistry, sphere_aabb_collision};
use super::vessel::{VesselId, VesselState};
use crate::consts::FRAMES_PER_SECOND;
use crate::tuning::ProjectileTuning;

/// A cannon shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec3,
    /// Unit launch direction
    pub direction: Vec3,
    /// Speed scale applied to the horizontal part of `direction`
    pub speed: f32,
    /// Downward speed; negative while the shot is still climbing
    pub fall_speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub owner: VesselId,
    /// Sampled positions for the trail (newest first)
    pub trail: Vec<Vec3>,
    /// Frames since launch
    pub age: u32,
    pub dead: bool,
}

impl Projectile {
    pub fn new(owner: VesselId, position: Vec3, direction: Vec3, tuning: &ProjectileTuning) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            position,
            direction,
            speed: tuning.speed,
            fall_speed: -direction.y * tuning.speed,
            damage: tuning.damage,
            radius: tuning.radius,
            owner,
            trail: Vec::with_capacity(tuning.trail_length),
            age: 0,
            dead: false,
        }
    }

    /// Record current position to the trail
    fn record_trail(&mut self, max_len: usize) {
        self.trail.insert(0, self.position);
        self.trail.truncate(max_len);
    }

    /// Advance one frame of flight.
    ///
    /// A shot already below the water floor is retired without moving, and
    /// one that outlives `max_age` frames is retired wherever it is.
    /// Returns whether the shot is still in flight.
    pub fn integrate(&mut self, tuning: &ProjectileTuning) -> bool {
        if self.dead {
            return false;
        }
        if self.position.y < tuning.water_floor {
            self.dead = true;
            return false;
        }

        self.position.x += self.direction.x * self.speed;
        self.position.z += self.direction.z * self.speed;
        self.fall_speed += tuning.gravity / FRAMES_PER_SECOND as f32;
        self.position.y -= self.fall_speed;

        self.age += 1;
        if self.age % tuning.trail_interval.max(1) == 0 {
            self.record_trail(tuning.trail_length);
        }

        if self.position.y < tuning.water_floor || self.age >= tuning.max_age {
            self.dead = true;
            return false;
        }
        true
    }
}

/// A projectile striking a vessel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub target: VesselId,
    pub attacker: VesselId,
    pub damage: f32,
    pub point: Vec3,
    /// Target health after the hit
    pub health: f32,
}

/// Owns every shot in flight
#[derive(Debug, Clone)]
pub struct ProjectileSet {
    tuning: ProjectileTuning,
    live: Vec<Projectile>,
    pending: Vec<Projectile>,
}

impl ProjectileSet {
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            tuning,
            live: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Queue a shot; it starts flying on the next step
    pub fn spawn(&mut self, owner: VesselId, origin: Vec3, direction: Vec3) {
        self.pending
            .push(Projectile::new(owner, origin, direction, &self.tuning));
    }

    /// Add an already-built shot to the live set (hosts and tests)
    pub fn insert(&mut self, projectile: Projectile) {
        self.live.push(projectile);
    }

    pub fn live(&self) -> &[Projectile] {
        &self.live
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Live plus queued shots
    pub fn len(&self) -> usize {
        self.live.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integrate every live shot, resolve hits and retire dead shots.
    ///
    /// A shot damages every enabled hitbox it overlaps this frame except
    /// its owner's, then dies. Health lives on the vessels, looked up by the
    /// hitbox's owner id.
    pub fn step(&mut self, hitboxes: &HitboxRegistry, vessels: &mut [VesselState]) -> Vec<Impact> {
        let mut impacts = Vec::new();

        for shot in self.live.iter_mut() {
            if !shot.integrate(&self.tuning) {
                continue;
            }

            for hitbox in hitboxes.iter() {
                if !hitbox.enabled || hitbox.owner == shot.owner {
                    continue;
                }
                let contact = sphere_aabb_collision(shot.position, shot.radius, &hitbox.bounds);
                if !contact.hit {
                    continue;
                }
                let Some(target) = vessels.get_mut(hitbox.owner.index()) else {
                    continue;
                };
                if !target.active {
                    continue;
                }
                target.health = (target.health - shot.damage).max(0.0);
                impacts.push(Impact {
                    target: hitbox.owner,
                    attacker: shot.owner,
                    damage: shot.damage,
                    point: contact.point,
                    health: target.health,
                });
                shot.dead = true;
            }
        }

        self.live.retain(|p| !p.dead);
        self.live.append(&mut self.pending);
        impacts
    }
}
