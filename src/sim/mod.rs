//! Deterministic simulation module
//!
//! All naval gameplay lives here. This module must be pure and deterministic:
//! - Fixed 60 Hz timestep only
//! - Seeded RNG only
//! - Stable iteration order (by vessel ID)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod combat;
pub mod projectile;
pub mod scope;
pub mod state;
pub mod tick;
pub mod vessel;
pub mod view;
pub mod waves;

pub use camera::CameraRig;
pub use collision::{
    Aabb, CollisionResult, HULL_HALF_HEIGHT, Hitbox, HitboxRegistry, hull_bounds,
    sphere_aabb_collision,
};
pub use combat::{Maneuver, decide};
pub use projectile::{Impact, Projectile, ProjectileSet};
pub use scope::{Edge, GroundRect, ViewScope};
pub use state::{MatchEvent, MatchPhase, World};
pub use tick::{FrameClock, FrameInput, tick};
pub use vessel::{Intent, Pilot, Side, VesselId, VesselState};
pub use view::FrameView;
pub use waves::WaveField;
