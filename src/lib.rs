//! Naval Sim - simulation core of a naval combat game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vessels, wave field, projectiles, AI)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. Every per-frame constant is tuned for 60 Hz.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frames per second of the fixed timestep
    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Height of the water plane
    pub const WATER_LEVEL: f32 = 0.0;

    /// Player spawn point and heading (degrees)
    pub const PLAYER_SPAWN: [f32; 3] = [0.0, 1.5, 0.0];
    pub const PLAYER_SPAWN_HEADING: f32 = 90.0;

    /// Declinations from vertical used to sample the camera footprint (degrees)
    pub const SCOPE_NEAR_DECLINATION: f32 = 22.5;
    pub const SCOPE_FAR_DECLINATION: f32 = 67.5;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in degrees within (-180, 180]
#[inline]
pub fn shortest_delta_degrees(from: f32, to: f32) -> f32 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Horizontal unit vector for a heading in degrees (0 = +Z, 90 = +X)
#[inline]
pub fn heading_to_forward(heading: f32) -> Vec3 {
    let rad = heading.to_radians();
    Vec3::new(rad.sin(), 0.0, rad.cos())
}

/// Heading in degrees of a horizontal direction (inverse of [`heading_to_forward`])
#[inline]
pub fn forward_to_heading(dir: Vec3) -> f32 {
    normalize_degrees(dir.x.atan2(dir.z).to_degrees())
}
