//! Camera footprint on the water plane
//!
//! The follow camera trails the player along -X and looks down toward +X, so
//! the footprint is a trapezoid whose near edge sits closer to the camera
//! than its far edge. X is the forward axis, Z the lateral axis (right = +Z).

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{SCOPE_FAR_DECLINATION, SCOPE_NEAR_DECLINATION, WATER_LEVEL};

/// Widest half-angle accepted before `tan` blows up
const MAX_HALF_ANGLE_DEG: f32 = 89.0;

/// One side of the scope's bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    /// Closest to the camera (min X)
    Near,
    /// Farthest from the camera (max X)
    Far,
    /// Min Z
    Left,
    /// Max Z
    Right,
}

impl Edge {
    /// Round-robin order used when topping up a growing field
    pub const ROTATION: [Edge; 4] = [Edge::Far, Edge::Right, Edge::Near, Edge::Left];

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Near => Edge::Far,
            Edge::Far => Edge::Near,
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
        }
    }
}

/// Axis-aligned rectangle on the water plane, stored as (x, z) pairs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl GroundRect {
    /// Extent along X
    #[inline]
    pub fn depth(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Extent along Z
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.depth().max(0.0) * self.width().max(0.0)
    }

    /// Which edge a point has left by more than `margin`, if any.
    /// Forward-axis exits take precedence over lateral ones.
    pub fn exited_edge(&self, p: Vec3, margin: f32) -> Option<Edge> {
        if p.x < self.min.x - margin {
            Some(Edge::Near)
        } else if p.x > self.max.x + margin {
            Some(Edge::Far)
        } else if p.z < self.min.y - margin {
            Some(Edge::Left)
        } else if p.z > self.max.y + margin {
            Some(Edge::Right)
        } else {
            None
        }
    }
}

/// Ground-plane trapezoid visible to the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewScope {
    pub near_left: Vec3,
    pub near_right: Vec3,
    pub far_right: Vec3,
    pub far_left: Vec3,
}

impl ViewScope {
    /// Project the camera frustum onto the water plane.
    ///
    /// Samples two fixed declinations from vertical: at each one the forward
    /// offset is `h * tan(a)` and the half-width is the slant distance
    /// `h / cos(a)` times `tan(fovy * aspect / 2)`. A camera at water level
    /// yields a zero-area scope.
    pub fn from_camera(position: Vec3, fovy: f32, aspect: f32) -> Self {
        let height = (position.y - WATER_LEVEL).max(0.0);
        let half_angle = (fovy * aspect * 0.5).clamp(0.0, MAX_HALF_ANGLE_DEG).to_radians();
        let spread = half_angle.tan();

        let sample = |declination: f32| {
            let a = declination.to_radians();
            let along = height * a.tan();
            let slant = height / a.cos();
            (along, slant * spread)
        };
        let (near_along, near_half) = sample(SCOPE_NEAR_DECLINATION);
        let (far_along, far_half) = sample(SCOPE_FAR_DECLINATION);

        let ground = |along: f32, lateral: f32| {
            Vec3::new(position.x + along, WATER_LEVEL, position.z + lateral)
        };

        Self {
            near_left: ground(near_along, -near_half),
            near_right: ground(near_along, near_half),
            far_right: ground(far_along, far_half),
            far_left: ground(far_along, -far_half),
        }
    }

    /// Build a scope from explicit corners, ordered
    /// near-left, near-right, far-right, far-left
    pub fn from_corners(corners: [Vec3; 4]) -> Self {
        let [near_left, near_right, far_right, far_left] = corners;
        Self {
            near_left,
            near_right,
            far_right,
            far_left,
        }
    }

    /// Axis-aligned square scope centred on `center`
    pub fn square(center: Vec3, side: f32) -> Self {
        let h = side * 0.5;
        Self::from_corners([
            Vec3::new(center.x - h, WATER_LEVEL, center.z - h),
            Vec3::new(center.x - h, WATER_LEVEL, center.z + h),
            Vec3::new(center.x + h, WATER_LEVEL, center.z + h),
            Vec3::new(center.x + h, WATER_LEVEL, center.z - h),
        ])
    }

    pub fn corners(&self) -> [Vec3; 4] {
        [self.near_left, self.near_right, self.far_right, self.far_left]
    }

    /// Trapezoid area on the XZ plane (shoelace)
    pub fn area(&self) -> f32 {
        let c = self.corners();
        let mut twice = 0.0;
        for i in 0..4 {
            let a = c[i];
            let b = c[(i + 1) % 4];
            twice += a.x * b.z - b.x * a.z;
        }
        twice.abs() * 0.5
    }

    /// Bounding rectangle of the four corners
    pub fn bounds(&self) -> GroundRect {
        let c = self.corners();
        let mut min = Vec2::new(c[0].x, c[0].z);
        let mut max = min;
        for p in &c[1..] {
            let p = Vec2::new(p.x, p.z);
            min = min.min(p);
            max = max.max(p);
        }
        GroundRect { min, max }
    }

    /// Whether a point lies inside the trapezoid (XZ only)
    pub fn contains(&self, p: Vec3) -> bool {
        let c = self.corners();
        let mut sign = 0.0_f32;
        for i in 0..4 {
            let a = c[i];
            let b = c[(i + 1) % 4];
            let cross = (b.x - a.x) * (p.z - a.z) - (b.z - a.z) * (p.x - a.x);
            if cross.abs() <= f32::EPSILON {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        sign != 0.0
    }
}
