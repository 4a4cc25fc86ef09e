//! Vessel kinematics and buoyancy
//!
//! Player and AI vessels share one integrator. They differ only in where the
//! per-frame [`Intent`] comes from (input polling or the combat controller),
//! which is selected by [`Pilot`] data rather than by type.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::projectile::ProjectileSet;
use crate::tuning::VesselTuning;
use crate::{heading_to_forward, normalize_degrees};

/// Stable index of a vessel in the world's arena.
///
/// Hitboxes and projectiles refer to their owner by id, so pooling a vessel
/// (deactivate, later reactivate) never leaves a dangling reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VesselId(pub usize);

impl VesselId {
    /// The player always occupies the first slot
    pub const PLAYER: VesselId = VesselId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Who produces a vessel's intent each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pilot {
    Player,
    Ai,
}

/// Weapon mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Discrete action request for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub accelerate: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub decelerate: bool,
    pub fire_left: bool,
    pub fire_right: bool,
}

impl Intent {
    #[inline]
    pub fn wants_fire(&self, side: Side) -> bool {
        match side {
            Side::Left => self.fire_left,
            Side::Right => self.fire_right,
        }
    }
}

/// Kinematic and combat state of one vessel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselState {
    pub position: Vec3,
    /// Yaw in degrees, [0, 360). 0 faces +Z, 90 faces +X.
    pub heading: f32,
    /// Banking angle in degrees; gates and drives turning
    pub roll: f32,
    pub throttle: f32,
    /// Monotonic buoyancy phase
    pub bob_phase: f32,
    /// Cosmetic rocking angle in degrees (orientation only)
    pub visual_roll: f32,
    pub forward: Vec3,
    pub up: Vec3,
    /// Direction the bow swings toward when the heading increases
    pub right: Vec3,
    pub health: f32,
    /// Frames until each mount may fire again (left, right)
    cooldowns: [u32; 2],
    /// Inactive vessels are skipped by movement, AI and collision
    pub active: bool,
    /// Frames until a pooled vessel returns
    pub respawn_timer: u32,
    pub pilot: Pilot,
}

impl VesselState {
    pub fn new(position: Vec3, heading: f32, pilot: Pilot, tuning: &VesselTuning) -> Self {
        let mut vessel = Self {
            position,
            heading: normalize_degrees(heading),
            roll: 0.0,
            throttle: 0.0,
            bob_phase: 0.0,
            visual_roll: 0.0,
            forward: Vec3::Z,
            up: Vec3::Y,
            right: Vec3::X,
            health: tuning.max_health,
            cooldowns: [0; 2],
            active: true,
            respawn_timer: 0,
            pilot,
        };
        vessel.update_axes();
        vessel
    }

    /// Current speed along the heading (units/frame)
    #[inline]
    pub fn speed(&self, tuning: &VesselTuning) -> f32 {
        tuning.base_speed + self.throttle
    }

    pub fn cooldown(&self, side: Side) -> u32 {
        self.cooldowns[side.slot()]
    }

    /// Advance one fixed frame under `intent`
    pub fn step(&mut self, intent: &Intent, tuning: &VesselTuning) {
        let min_throttle = tuning.min_throttle();

        if intent.accelerate && self.throttle <= tuning.max_throttle {
            self.throttle += tuning.throttle_step;
        }
        if intent.decelerate && self.throttle > min_throttle {
            self.throttle -= tuning.throttle_step;
        }
        self.throttle = self.throttle.clamp(min_throttle, tuning.max_throttle);

        // Roll builds while a turn is held and relaxes back to level otherwise
        let speed = self.speed(tuning);
        let roll_rate = speed.abs() * 3.0;
        if intent.turn_left {
            self.roll -= roll_rate;
        }
        if intent.turn_right {
            self.roll += roll_rate;
        }
        if self.roll < 0.0 && !intent.turn_left {
            self.roll = (self.roll + roll_rate).min(0.0);
        } else if self.roll > 0.0 && !intent.turn_right {
            self.roll = (self.roll - roll_rate).max(0.0);
        }
        self.roll = self.roll.clamp(-tuning.max_roll, tuning.max_roll);

        // Past half roll the hull turns; |sin(6 * roll)| shapes the rate
        if self.roll.abs() > tuning.max_roll * 0.5 {
            let weight = (6.0 * self.roll).to_radians().sin().abs();
            self.heading += self.roll.signum() * speed * 8.0 * weight;
        }

        self.bob_phase += tuning.bob_step;
        self.position.y = 0.5 + 0.5 * (0.1 * self.bob_phase).sin();
        self.visual_roll = 10.0 * self.bob_phase.sin();

        let rad = self.heading.to_radians();
        self.position.x += speed * rad.sin();
        self.position.z += speed * rad.cos();

        self.update_axes();
        self.heading = normalize_degrees(self.heading);

        for cooldown in &mut self.cooldowns {
            *cooldown = cooldown.saturating_sub(1);
        }
    }

    fn update_axes(&mut self) {
        let rad = self.heading.to_radians();
        self.forward = heading_to_forward(self.heading);
        self.up = Vec3::Y;
        self.right = Vec3::new(rad.cos(), 0.0, -rad.sin());
    }

    /// Conventional firing direction for a mount: square off the hull,
    /// raised by the base elevation and tilted with the roll
    pub fn broadside(&self, side: Side, tuning: &VesselTuning) -> Vec3 {
        let (axis, tilt) = match side {
            Side::Right => (self.right, -self.roll),
            Side::Left => (-self.right, self.roll),
        };
        let elevation = (tuning.broadside_elevation + tilt).to_radians();
        (axis * elevation.cos() + Vec3::Y * elevation.sin()).normalize_or_zero()
    }

    /// Muzzle position for shots leaving this vessel
    pub fn muzzle(&self, tuning: &VesselTuning) -> Vec3 {
        self.position + self.forward * tuning.muzzle_forward + self.up * tuning.muzzle_up
    }

    /// Fire one mount. A mount still cooling down ignores the request.
    ///
    /// Returns whether a projectile was queued.
    pub fn fire(
        &mut self,
        id: VesselId,
        side: Side,
        direction: Vec3,
        tuning: &VesselTuning,
        projectiles: &mut ProjectileSet,
    ) -> bool {
        let slot = side.slot();
        if self.cooldowns[slot] > 0 {
            return false;
        }
        self.cooldowns[slot] = tuning.fire_cooldown;
        projectiles.spawn(id, self.muzzle(tuning), direction);
        true
    }

    /// Take the vessel out of play, keeping its slot for reuse
    pub fn deactivate(&mut self, respawn_delay: u32) {
        self.active = false;
        self.respawn_timer = respawn_delay;
        self.throttle = 0.0;
        self.roll = 0.0;
    }

    /// Return a pooled vessel to play at a new position
    pub fn respawn(&mut self, position: Vec3, heading: f32, tuning: &VesselTuning) {
        self.position = position;
        self.heading = normalize_degrees(heading);
        self.roll = 0.0;
        self.throttle = 0.0;
        self.health = tuning.max_health;
        self.cooldowns = [0; 2];
        self.active = true;
        self.respawn_timer = 0;
        self.update_axes();
    }
}
