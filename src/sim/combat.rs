//! Rule-based enemy controller
//!
//! A pure function of the AI vessel and its target. Far away it pursues the
//! target's position; inside the engage range it holds a course parallel to
//! the target's heading so its broadside stays on. Firing is decided
//! independently from movement by the broadside aim cones.

use glam::Vec3;

use super::vessel::{Intent, VesselState};
use crate::tuning::CombatTuning;
use crate::{forward_to_heading, normalize_degrees, shortest_delta_degrees};

/// Movement mode picked from the distance to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Pursuit,
    Orbit,
}

/// Horizontal offset from `from` to `to`
#[inline]
fn flat_offset(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z)
}

pub fn maneuver_for(me: &VesselState, target: &VesselState, tuning: &CombatTuning) -> Maneuver {
    if flat_offset(me.position, target.position).length() >= tuning.engage_range {
        Maneuver::Pursuit
    } else {
        Maneuver::Orbit
    }
}

/// Heading (degrees) that points from `me` at `target`
pub fn bearing_to(me: &VesselState, target: &VesselState) -> f32 {
    forward_to_heading(flat_offset(me.position, target.position))
}

/// Decide this frame's intent for an AI vessel
pub fn decide(me: &VesselState, target: &VesselState, tuning: &CombatTuning) -> Intent {
    let mut intent = Intent {
        accelerate: true,
        ..Default::default()
    };

    match maneuver_for(me, target, tuning) {
        Maneuver::Pursuit => {
            let desired = bearing_to(me, target);
            steer(&mut intent, me.heading, desired, tuning.heading_tolerance);
        }
        Maneuver::Orbit => {
            // Parallel or anti-parallel, whichever is closer, both keep the target abeam
            let with = target.heading;
            let against = normalize_degrees(target.heading + 180.0);
            let desired = if shortest_delta_degrees(me.heading, with).abs()
                <= shortest_delta_degrees(me.heading, against).abs()
            {
                with
            } else {
                against
            };
            steer(&mut intent, me.heading, desired, tuning.orbit_tolerance);
        }
    }

    aim(&mut intent, me, target, tuning.aim_tolerance);
    intent
}

fn steer(intent: &mut Intent, current: f32, desired: f32, tolerance: f32) {
    let delta = shortest_delta_degrees(current, desired);
    if delta > tolerance {
        intent.turn_right = true;
    } else if delta < -tolerance {
        intent.turn_left = true;
    }
}

/// Fire a broadside when the target sits inside its cone
fn aim(intent: &mut Intent, me: &VesselState, target: &VesselState, tolerance: f32) {
    let to_target = flat_offset(me.position, target.position);
    if to_target.length_squared() <= f32::EPSILON {
        return;
    }
    let right = Vec3::new(me.right.x, 0.0, me.right.z);
    if right.length_squared() <= f32::EPSILON {
        return;
    }
    intent.fire_right = angle_degrees(right, to_target) < tolerance;
    intent.fire_left = angle_degrees(-right, to_target) < tolerance;
}

/// Unsigned angle between two non-zero vectors, in degrees
#[inline]
fn angle_degrees(a: Vec3, b: Vec3) -> f32 {
    let cos = a.normalize().dot(b.normalize()).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
