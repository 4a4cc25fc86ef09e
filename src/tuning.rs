//! Data-driven game balance
//!
//! Every constant the simulation integrates with lives here. Values are
//! per-frame quantities tuned for the fixed 60 Hz step in [`crate::consts`].
//! A tuning file is plain JSON; missing sections or fields fall back to the
//! defaults below.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Vessel kinematics, buoyancy and weapons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselTuning {
    /// Speed with zero throttle (units/frame)
    pub base_speed: f32,
    /// Upper throttle bound; the lower bound is `-2 * base_speed`
    pub max_throttle: f32,
    /// Throttle change per frame while accelerate/decelerate is held
    pub throttle_step: f32,
    /// Roll cap (degrees)
    pub max_roll: f32,
    /// Buoyancy phase advance per frame
    pub bob_step: f32,
    pub max_health: f32,
    /// Frames between shots on one broadside
    pub fire_cooldown: u32,
    /// Muzzle offset along the bow
    pub muzzle_forward: f32,
    /// Muzzle offset above the hull
    pub muzzle_up: f32,
    /// Elevation of a level broadside shot (degrees)
    pub broadside_elevation: f32,
}

impl Default for VesselTuning {
    fn default() -> Self {
        Self {
            base_speed: 0.1,
            max_throttle: 0.3,
            throttle_step: 0.005,
            // sin(6 * 25deg) keeps the turn rate non-zero at the cap
            max_roll: 25.0,
            bob_step: 0.05,
            max_health: 50.0,
            fire_cooldown: 60,
            muzzle_forward: 0.5,
            muzzle_up: 1.0,
            broadside_elevation: 8.0,
        }
    }
}

impl VesselTuning {
    /// Lower throttle bound (full astern)
    #[inline]
    pub fn min_throttle(&self) -> f32 {
        -2.0 * self.base_speed
    }
}

/// Cannon shot ballistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Horizontal speed (units/frame)
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    /// Downward acceleration, applied as `gravity / 60` per frame
    pub gravity: f32,
    /// Shots below this height are retired
    pub water_floor: f32,
    /// Frames between trail samples
    pub trail_interval: u32,
    /// Maximum trail samples kept
    pub trail_length: usize,
    /// Frames before a shot that never reaches the water is retired
    pub max_age: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 0.5,
            damage: 10.0,
            radius: 0.25,
            gravity: 0.098,
            water_floor: -1.0,
            trail_interval: 4,
            trail_length: 12,
            max_age: 600,
        }
    }
}

/// Open-water tile field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Tiles per unit of scope area
    pub density: f32,
    /// Hard cap on tile count
    pub max_waves: usize,
    /// Tile drift toward the near edge (units/frame)
    pub wave_speed: f32,
    /// Distance past a scope edge before a tile is recycled
    pub exit_margin: f32,
    /// Area loss (units²) that triggers trimming excess tiles
    pub shrink_threshold: f32,
    /// How far inside an edge recycled tiles appear
    pub edge_inset: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            density: 0.1,
            max_waves: 400,
            wave_speed: 0.02,
            exit_margin: 5.0,
            shrink_threshold: 4.0,
            edge_inset: 0.5,
        }
    }
}

/// Enemy decision thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Distance below which the controller switches from pursuit to orbiting
    pub engage_range: f32,
    /// Pursuit heading dead band (degrees)
    pub heading_tolerance: f32,
    /// Orbit heading dead band (degrees)
    pub orbit_tolerance: f32,
    /// Broadside aim cone half-angle (degrees)
    pub aim_tolerance: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            engage_range: 20.0,
            heading_tolerance: 5.0,
            orbit_tolerance: 10.0,
            aim_tolerance: 10.0,
        }
    }
}

/// Follow camera
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Camera position relative to the followed vessel
    pub offset: Vec3,
    /// Vertical field of view (degrees)
    pub fovy: f32,
    /// Screen width / height
    pub aspect: f32,
    /// Shake added per hit taken by the player
    pub shake_per_hit: f32,
    /// Multiplicative shake decay per frame
    pub shake_decay: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            offset: Vec3::new(-10.0, 10.0, 0.0),
            fovy: 45.0,
            aspect: 2560.0 / 1600.0,
            shake_per_hit: 0.6,
            shake_decay: 0.9,
        }
    }
}

/// Enemy pool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetTuning {
    pub enemy_count: usize,
    /// Spawn ring around the player (inner, outer radius)
    pub spawn_radius_min: f32,
    pub spawn_radius_max: f32,
    /// Frames a sunk enemy stays inactive
    pub respawn_delay: u32,
}

impl Default for FleetTuning {
    fn default() -> Self {
        Self {
            enemy_count: 3,
            spawn_radius_min: 30.0,
            spawn_radius_max: 50.0,
            respawn_delay: 5 * 60,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub vessel: VesselTuning,
    pub projectile: ProjectileTuning,
    pub waves: WaveTuning,
    pub combat: CombatTuning,
    pub camera: CameraTuning,
    pub fleet: FleetTuning,
}

impl Tuning {
    /// Parse a tuning set from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON (for writing a starter tuning file)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a tuning file, falling back to defaults if it is missing or invalid
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
