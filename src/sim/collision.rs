//! Hitboxes and sphere/box collision
//!
//! Each vessel owns one axis-aligned box, registered once and refitted in
//! place every frame. The box widens along whichever horizontal axis the
//! hull is currently aligned with, so it bounds the rotating hull without
//! an oriented-box test.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::vessel::{VesselId, VesselState};

/// Half-height of every hull box
pub const HULL_HALF_HEIGHT: f32 = 1.5;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the box to the sphere centre (if hit)
    pub point: Vec3,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }
}

/// Check a sphere against a box
pub fn sphere_aabb_collision(center: Vec3, radius: f32, aabb: &Aabb) -> CollisionResult {
    let point = aabb.closest_point(center);
    if center.distance_squared(point) > radius * radius {
        return CollisionResult::miss();
    }
    CollisionResult { hit: true, point }
}

/// Heading-aware hull box: `1 + 2|sin h|` along X, `1 + 2|cos h|` along Z
pub fn hull_bounds(position: Vec3, heading: f32) -> Aabb {
    let rad = heading.to_radians();
    let half = Vec3::new(
        1.0 + 2.0 * rad.sin().abs(),
        HULL_HALF_HEIGHT,
        1.0 + 2.0 * rad.cos().abs(),
    );
    Aabb::from_center_half_extents(position, half)
}

/// Collision volume of one vessel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hitbox {
    pub owner: VesselId,
    pub bounds: Aabb,
    /// Mirrors the owner's `active` flag
    pub enabled: bool,
}

impl Hitbox {
    pub fn update(&mut self, vessel: &VesselState) {
        self.bounds = hull_bounds(vessel.position, vessel.heading);
        self.enabled = vessel.active;
    }
}

/// All vessel hitboxes, indexed by [`VesselId`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HitboxRegistry {
    boxes: Vec<Hitbox>,
}

impl HitboxRegistry {
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Register the hitbox for the next vessel slot.
    ///
    /// Vessels register in arena order, so the returned id is also the
    /// vessel's index.
    pub fn register(&mut self, vessel: &VesselState) -> VesselId {
        let owner = VesselId(self.boxes.len());
        self.boxes.push(Hitbox {
            owner,
            bounds: hull_bounds(vessel.position, vessel.heading),
            enabled: vessel.active,
        });
        owner
    }

    /// Refit a vessel's box in place
    pub fn update(&mut self, owner: VesselId, vessel: &VesselState) {
        if let Some(hitbox) = self.boxes.get_mut(owner.index()) {
            hitbox.update(vessel);
        }
    }

    pub fn get(&self, owner: VesselId) -> Option<&Hitbox> {
        self.boxes.get(owner.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hitbox> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
