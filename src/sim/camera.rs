//! Follow camera with hit shake
//!
//! The rig sits at a fixed offset from the followed vessel and looks at it.
//! Its pose bounds the wave field through [`ViewScope`]; shake is a decaying
//! magnitude the renderer turns into jitter and never feeds back into the
//! scope.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::scope::ViewScope;
use crate::tuning::CameraTuning;

/// Shake below this is snapped to zero
const SHAKE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view (degrees)
    pub fovy: f32,
    pub aspect: f32,
    /// Current shake magnitude
    pub shake: f32,
    offset: Vec3,
}

impl CameraRig {
    pub fn new(tuning: &CameraTuning, focus: Vec3) -> Self {
        let mut rig = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: tuning.fovy,
            aspect: tuning.aspect,
            shake: 0.0,
            offset: tuning.offset,
        };
        rig.follow(focus);
        rig
    }

    pub fn follow(&mut self, focus: Vec3) {
        self.position = focus + self.offset;
        self.target = focus;
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.shake += amount;
    }

    pub fn decay_shake(&mut self, decay: f32) {
        self.shake *= decay;
        if self.shake < SHAKE_EPSILON {
            self.shake = 0.0;
        }
    }

    /// Deterministic jitter for the current tick, scaled by the shake
    pub fn shake_offset(&self, time_ticks: u64) -> Vec3 {
        if self.shake == 0.0 {
            return Vec3::ZERO;
        }
        let t = time_ticks as f32;
        Vec3::new((t * 1.7).sin(), (t * 2.3).cos() * 0.5, (t * 1.3).cos()) * self.shake
    }

    /// Ground footprint of the camera
    pub fn scope(&self) -> ViewScope {
        ViewScope::from_camera(self.position, self.fovy, self.aspect)
    }
}
