//! World state and match bookkeeping
//!
//! Every collection the frame loop mutates is owned here and passed by
//! reference into the subsystems, so there is no ambient global state.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::CameraRig;
use super::collision::HitboxRegistry;
use super::projectile::ProjectileSet;
use super::vessel::{Pilot, VesselId, VesselState};
use super::waves::WaveField;
use crate::Tuning;
use crate::consts::{PLAYER_SPAWN, PLAYER_SPAWN_HEADING};
use crate::tuning::FleetTuning;

/// Seed stream split off for the wave field so fleet spawns don't shift tiles
const WAVE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Active gameplay
    Running,
    /// Player vessel destroyed; the world no longer advances
    Sunk,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    VesselHit {
        target: VesselId,
        attacker: VesselId,
        damage: f32,
        health: f32,
    },
    VesselSunk {
        id: VesselId,
        by: VesselId,
    },
    VesselRespawned {
        id: VesselId,
        position: Vec3,
    },
    PlayerSunk,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    /// Match seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: MatchPhase,
    /// Vessel arena; index 0 is the player
    pub vessels: Vec<VesselState>,
    pub hitboxes: HitboxRegistry,
    pub projectiles: ProjectileSet,
    pub waves: WaveField,
    pub camera: CameraRig,
    /// Last attacker per vessel, used to credit sinkings
    pub(crate) last_attacker: Vec<Option<VesselId>>,
    pub(crate) events: Vec<MatchEvent>,
}

impl World {
    /// Set up a match: the player at the spawn point, the enemy fleet on a
    /// ring around it and a wave field filling the initial camera scope
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player_pos = Vec3::from(PLAYER_SPAWN);
        let camera = CameraRig::new(&tuning.camera, player_pos);
        let waves = WaveField::new(&tuning.waves, camera.scope(), seed ^ WAVE_STREAM);
        let projectiles = ProjectileSet::new(tuning.projectile.clone());

        let enemy_spawns: Vec<(Vec3, f32)> = (0..tuning.fleet.enemy_count)
            .map(|_| ring_spawn(&mut rng, player_pos, &tuning.fleet))
            .collect();

        let mut world = Self {
            tuning,
            seed,
            rng,
            time_ticks: 0,
            phase: MatchPhase::Running,
            vessels: Vec::new(),
            hitboxes: HitboxRegistry::new(),
            projectiles,
            waves,
            camera,
            last_attacker: Vec::new(),
            events: Vec::new(),
        };

        world.spawn_vessel(player_pos, PLAYER_SPAWN_HEADING, Pilot::Player);
        for (position, heading) in enemy_spawns {
            world.spawn_vessel(position, heading, Pilot::Ai);
        }

        log::info!(
            "Match started: seed {}, {} enemies, {} wave tiles",
            seed,
            world.vessels.len() - 1,
            world.waves.len()
        );
        world
    }

    /// Add a vessel to the arena and register its hitbox
    pub fn spawn_vessel(&mut self, position: Vec3, heading: f32, pilot: Pilot) -> VesselId {
        let vessel = VesselState::new(position, heading, pilot, &self.tuning.vessel);
        let id = self.hitboxes.register(&vessel);
        debug_assert_eq!(id.index(), self.vessels.len());
        self.vessels.push(vessel);
        self.last_attacker.push(None);
        id
    }

    pub fn player(&self) -> &VesselState {
        &self.vessels[VesselId::PLAYER.index()]
    }

    pub fn player_mut(&mut self) -> &mut VesselState {
        &mut self.vessels[VesselId::PLAYER.index()]
    }

    pub fn vessel(&self, id: VesselId) -> Option<&VesselState> {
        self.vessels.get(id.index())
    }

    /// Ids of AI vessels currently in play
    pub fn active_enemies(&self) -> impl Iterator<Item = VesselId> + '_ {
        self.vessels
            .iter()
            .enumerate()
            .filter(|(_, v)| v.active && v.pilot == Pilot::Ai)
            .map(|(i, _)| VesselId(i))
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Random spawn point and heading on the fleet ring around the player
    pub(crate) fn random_ring_spawn(&mut self) -> (Vec3, f32) {
        let center = self.player().position;
        ring_spawn(&mut self.rng, center, &self.tuning.fleet)
    }
}

fn ring_spawn(rng: &mut Pcg32, center: Vec3, fleet: &FleetTuning) -> (Vec3, f32) {
    let angle = rng.random::<f32>() * TAU;
    let t: f32 = rng.random();
    let radius = fleet.spawn_radius_min + (fleet.spawn_radius_max - fleet.spawn_radius_min) * t;
    let position = Vec3::new(
        center.x + radius * angle.cos(),
        PLAYER_SPAWN[1],
        center.z + radius * angle.sin(),
    );
    let heading = rng.random::<f32>() * 360.0;
    (position, heading)
}
