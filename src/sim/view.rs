//! Read-only frame snapshot for the rendering layer
//!
//! Everything a renderer draws from the simulation: hulls, health bars,
//! water tiles, shots with their trails and the debug hitbox overlay.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{MatchPhase, World};
use super::vessel::{Pilot, VesselId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselView {
    pub id: VesselId,
    pub pilot: Pilot,
    pub position: Vec3,
    pub heading: f32,
    /// Banking from turning (degrees)
    pub roll: f32,
    /// Cosmetic buoyancy rock drawn on top of the banking
    pub visual_roll: f32,
    pub health: f32,
    /// Health as a fraction of the maximum, for the health bar
    pub health_fraction: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec3,
    pub trail: Vec<Vec3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitboxView {
    pub owner: VesselId,
    pub min: Vec3,
    pub max: Vec3,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraView {
    /// Position including shake jitter
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy: f32,
    pub shake: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameView {
    pub tick: u64,
    pub phase: MatchPhase,
    pub vessels: Vec<VesselView>,
    pub tiles: Vec<Vec3>,
    pub projectiles: Vec<ProjectileView>,
    pub hitboxes: Vec<HitboxView>,
    pub camera: CameraView,
}

impl FrameView {
    pub fn capture(world: &World) -> Self {
        let max_health = world.tuning.vessel.max_health;
        let vessels = world
            .vessels
            .iter()
            .enumerate()
            .map(|(i, v)| VesselView {
                id: VesselId(i),
                pilot: v.pilot,
                position: v.position,
                heading: v.heading,
                roll: v.roll,
                visual_roll: v.visual_roll,
                health: v.health,
                health_fraction: if max_health > 0.0 {
                    (v.health / max_health).clamp(0.0, 1.0)
                } else {
                    0.0
                },
                active: v.active,
            })
            .collect();

        let projectiles = world
            .projectiles
            .live()
            .iter()
            .map(|p| ProjectileView {
                position: p.position,
                trail: p.trail.clone(),
            })
            .collect();

        let hitboxes = world
            .hitboxes
            .iter()
            .map(|h| HitboxView {
                owner: h.owner,
                min: h.bounds.min,
                max: h.bounds.max,
                enabled: h.enabled,
            })
            .collect();

        let jitter = world.camera.shake_offset(world.time_ticks);
        let camera = CameraView {
            position: world.camera.position + jitter,
            target: world.camera.target + jitter,
            up: world.camera.up,
            fovy: world.camera.fovy,
            shake: world.camera.shake,
        };

        Self {
            tick: world.time_ticks,
            phase: world.phase,
            vessels,
            tiles: world.waves.tiles().to_vec(),
            projectiles,
            hitboxes,
            camera,
        }
    }
}
