//! Open-water tile field bounded by the camera scope
//!
//! Tiles drift toward the near edge. A tile that leaves the scope by more
//! than the exit margin is moved to the opposite edge instead of being
//! reallocated, so the visible field stays evenly populated while the camera
//! moves with O(tiles) work per frame. Scope growth is topped up from the
//! edges and large shrinks trim the tail of the set. Slow drift away from
//! the target, from gradual zoom or a density change, is corrected once it
//! exceeds the slack of `shrink_threshold × density` tiles.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::scope::{Edge, GroundRect, ViewScope};
use crate::consts::WATER_LEVEL;
use crate::tuning::WaveTuning;

/// Draws per tile before accepting a point outside the trapezoid
const SPAWN_ATTEMPTS: usize = 8;

/// Wave tile field
#[derive(Debug, Clone)]
pub struct WaveField {
    density: f32,
    max_waves: usize,
    wave_speed: f32,
    exit_margin: f32,
    shrink_threshold: f32,
    edge_inset: f32,
    tiles: Vec<Vec3>,
    /// Scope the field was last stepped against
    previous: ViewScope,
    /// Next edge in [`Edge::ROTATION`] used for top-ups
    edge_cursor: usize,
    rng: Pcg32,
}

impl WaveField {
    /// Create a field filled to its target density inside `scope`
    pub fn new(tuning: &WaveTuning, scope: ViewScope, seed: u64) -> Self {
        let mut field = Self {
            density: tuning.density,
            max_waves: tuning.max_waves,
            wave_speed: tuning.wave_speed,
            exit_margin: tuning.exit_margin,
            shrink_threshold: tuning.shrink_threshold,
            edge_inset: tuning.edge_inset,
            tiles: Vec::new(),
            previous: scope,
            edge_cursor: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        let initial = field.target_count(&scope);
        field.spawn(initial);
        field
    }

    pub fn tiles(&self) -> &[Vec3] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Change the target density; the count converges on the next step
    pub fn set_density(&mut self, density: f32) {
        self.density = density;
    }

    /// Scope of the most recent step
    pub fn scope(&self) -> &ViewScope {
        &self.previous
    }

    /// Tile count the field aims for inside `scope`, capped at `max_waves`.
    /// Zero, negative or NaN densities and degenerate scopes give 0.
    pub fn target_count(&self, scope: &ViewScope) -> usize {
        let raw = self.density * scope.area();
        if raw.is_nan() || raw <= 0.0 {
            return 0;
        }
        (raw.round() as usize).min(self.max_waves)
    }

    /// Tiles the count may sit away from target before it is corrected
    pub fn slack(&self) -> usize {
        let slack = (self.shrink_threshold * self.density).ceil();
        if slack.is_nan() || slack <= 0.0 { 0 } else { slack as usize }
    }

    /// Place `n` tiles uniformly inside the scope.
    ///
    /// Points are drawn from the bounding rectangle and redrawn a few times
    /// when they miss the trapezoid; the last draw is kept regardless.
    pub fn spawn(&mut self, n: usize) {
        let bounds = self.previous.bounds();
        self.tiles.reserve(n);
        for _ in 0..n {
            let mut tile = Vec3::ZERO;
            for _ in 0..SPAWN_ATTEMPTS {
                let x = lerp(bounds.min.x, bounds.max.x, self.rng.random::<f32>());
                let z = lerp(bounds.min.y, bounds.max.y, self.rng.random::<f32>());
                tile = Vec3::new(x, WATER_LEVEL, z);
                if self.previous.contains(tile) {
                    break;
                }
            }
            self.tiles.push(tile);
        }
    }

    /// Place one tile just inside `edge` at a random lateral offset
    pub fn spawn_at_edge(&mut self, edge: Edge) {
        let bounds = self.previous.bounds();
        let tile = edge_point(&mut self.rng, &bounds, edge, self.edge_inset);
        self.tiles.push(tile);
    }

    /// Advance the field one frame against the current camera scope.
    ///
    /// Returns how many tiles were recycled to an opposite edge.
    pub fn step(&mut self, scope: &ViewScope) -> usize {
        let bounds = scope.bounds();
        let drift = Vec3::new(-self.wave_speed, 0.0, 0.0);

        let mut recycled = 0;
        for tile in self.tiles.iter_mut() {
            *tile += drift;
            if let Some(edge) = bounds.exited_edge(*tile, self.exit_margin) {
                *tile = edge_point(&mut self.rng, &bounds, edge.opposite(), self.edge_inset);
                recycled += 1;
            }
        }

        let target = self.target_count(scope);
        let slack = self.slack();
        let area = scope.area();
        let previous_area = self.previous.area();
        self.previous = *scope;

        let len = self.tiles.len();
        let grew = area > previous_area;
        let shrank = previous_area - area > self.shrink_threshold;
        if len < target && (grew || target - len > slack) {
            let missing = target - len;
            for _ in 0..missing {
                let edge = Edge::ROTATION[self.edge_cursor % Edge::ROTATION.len()];
                self.edge_cursor = self.edge_cursor.wrapping_add(1);
                self.spawn_at_edge(edge);
            }
            log::debug!("Wave field grew: +{} tiles (area {:.1})", missing, area);
        } else if len > target && (shrank || len - target > slack) {
            let excess = len - target;
            self.tiles.truncate(target);
            log::debug!("Wave field shrank: -{} tiles (area {:.1})", excess, area);
        }

        // Transient over-cap (e.g. max lowered at runtime) is trimmed, not kept
        if self.tiles.len() > self.max_waves {
            self.tiles.truncate(self.max_waves);
        }

        recycled
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Random point just inside one edge of `bounds`
fn edge_point(rng: &mut Pcg32, bounds: &GroundRect, edge: Edge, inset: f32) -> Vec3 {
    let inset_x = inset.min(bounds.depth().max(0.0) * 0.5);
    let inset_z = inset.min(bounds.width().max(0.0) * 0.5);
    let t: f32 = rng.random();
    let (x, z) = match edge {
        Edge::Near => (bounds.min.x + inset_x, lerp(bounds.min.y, bounds.max.y, t)),
        Edge::Far => (bounds.max.x - inset_x, lerp(bounds.min.y, bounds.max.y, t)),
        Edge::Left => (lerp(bounds.min.x, bounds.max.x, t), bounds.min.y + inset_z),
        Edge::Right => (lerp(bounds.min.x, bounds.max.x, t), bounds.max.y - inset_z),
    };
    Vec3::new(x, WATER_LEVEL, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tuning(density: f32, wave_speed: f32) -> WaveTuning {
        WaveTuning {
            density,
            wave_speed,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_count_matches_density() {
        let scope = ViewScope::square(Vec3::ZERO, 20.0);
        let field = WaveField::new(&tuning(0.1, 0.02), scope, 7);
        assert!((36..=44).contains(&field.len()), "got {}", field.len());

        let bounds = scope.bounds();
        for tile in field.tiles() {
            assert_eq!(tile.y, WATER_LEVEL);
            assert!(tile.x >= bounds.min.x && tile.x <= bounds.max.x);
            assert!(tile.z >= bounds.min.y && tile.z <= bounds.max.y);
        }
    }

    #[test]
    fn test_zero_and_negative_density_stay_empty() {
        let scope = ViewScope::square(Vec3::ZERO, 20.0);
        for density in [0.0, -0.5, f32::NAN] {
            let mut field = WaveField::new(&tuning(density, 0.02), scope, 1);
            assert!(field.is_empty());
            assert_eq!(field.step(&ViewScope::square(Vec3::ZERO, 40.0)), 0);
            assert_eq!(field.step(&ViewScope::square(Vec3::ZERO, 5.0)), 0);
            assert!(field.is_empty());
        }
    }

    #[test]
    fn test_degenerate_scope() {
        let flat = ViewScope::from_camera(Vec3::ZERO, 45.0, 1.6);
        let mut field = WaveField::new(&tuning(0.1, 0.02), flat, 3);
        assert!(field.is_empty());
        field.step(&flat);
        assert!(field.is_empty());
    }

    #[test]
    fn test_count_is_stable_under_fixed_scope() {
        let scope = ViewScope::square(Vec3::ZERO, 20.0);
        let mut field = WaveField::new(&tuning(0.1, 0.5), scope, 11);
        let initial = field.len();

        let mut recycled = 0;
        for _ in 0..200 {
            recycled += field.step(&scope);
            assert_eq!(field.len(), initial);
        }
        assert!(recycled > 0);

        let bounds = scope.bounds();
        for tile in field.tiles() {
            assert!(bounds.exited_edge(*tile, 5.0).is_none());
        }
    }

    #[test]
    fn test_edge_tile_recycles_exactly_once() {
        let scope = ViewScope::square(Vec3::ZERO, 20.0);
        // Target rounds to zero while the slack still tolerates one tile
        let mut field = WaveField::new(&tuning(0.001, 1.0), scope, 5);
        assert!(field.is_empty());
        assert_eq!(field.slack(), 1);
        field.spawn_at_edge(Edge::Far);
        assert_eq!(field.len(), 1);
        let start_x = field.tiles()[0].x;
        assert!((start_x - 9.5).abs() < 1e-5);

        // 9.5 - 25 = -15.5 is the first position past the 5 unit margin
        let mut recycled = 0;
        for _ in 0..25 {
            recycled += field.step(&scope);
        }
        assert_eq!(recycled, 1);
        assert_eq!(field.len(), 1);
        assert!((field.tiles()[0].x - start_x).abs() < 1e-5);
    }

    #[test]
    fn test_growth_tops_up_from_edges() {
        let small = ViewScope::square(Vec3::ZERO, 10.0);
        let large = ViewScope::square(Vec3::ZERO, 20.0);
        let mut field = WaveField::new(&tuning(0.1, 0.0), small, 9);
        assert_eq!(field.len(), 10);

        field.step(&large);
        assert_eq!(field.len(), field.target_count(&large));
        assert_eq!(field.len(), 40);
    }

    #[test]
    fn test_shrink_trims_to_target() {
        let large = ViewScope::square(Vec3::ZERO, 20.0);
        let small = ViewScope::square(Vec3::ZERO, 10.0);
        let mut field = WaveField::new(&tuning(0.1, 0.0), large, 9);
        assert_eq!(field.len(), 40);

        field.step(&small);
        assert_eq!(field.len(), 10);

        // Shrinking to nothing leaves an empty, steppable field
        let empty = ViewScope::square(Vec3::ZERO, 0.0);
        field.step(&empty);
        assert!(field.is_empty());
        field.step(&empty);
        assert!(field.is_empty());
    }

    #[test]
    fn test_max_waves_caps_count() {
        let scope = ViewScope::square(Vec3::ZERO, 20.0);
        let tuning = WaveTuning {
            density: 5.0,
            max_waves: 25,
            ..Default::default()
        };
        let mut field = WaveField::new(&tuning, scope, 2);
        assert_eq!(field.len(), 25);
        field.step(&ViewScope::square(Vec3::ZERO, 40.0));
        assert_eq!(field.len(), 25);
    }

    #[test]
    fn test_camera_motion_conveys_tiles_forward() {
        let mut field = WaveField::new(&tuning(0.1, 0.0), ViewScope::square(Vec3::ZERO, 20.0), 4);
        let count = field.len();
        // Camera advances along +X; tiles left behind reappear at the far edge
        for i in 1..=100 {
            let scope = ViewScope::square(Vec3::new(i as f32 * 0.5, 0.0, 0.0), 20.0);
            field.step(&scope);
            assert_eq!(field.len(), count);
        }
        let bounds = field.scope().bounds();
        for tile in field.tiles() {
            assert!(bounds.exited_edge(*tile, 5.0).is_none());
        }
    }

    #[test]
    fn test_slow_shrink_still_trims() {
        let mut field = WaveField::new(&tuning(0.1, 0.02), ViewScope::square(Vec3::ZERO, 20.0), 21);
        assert_eq!(field.len(), 40);

        // Area drops ~2 units² per frame, always under the shrink threshold
        let mut side = 20.0;
        while side > 10.0 {
            side -= 0.05;
            field.step(&ViewScope::square(Vec3::ZERO, side));
        }
        let scope = ViewScope::square(Vec3::ZERO, side);
        for _ in 0..100 {
            field.step(&scope);
        }
        let target = field.target_count(&scope);
        assert!(field.len().abs_diff(target) <= field.slack(), "len {} target {}", field.len(), target);
    }

    #[test]
    fn test_density_change_converges() {
        let scope = ViewScope::square(Vec3::ZERO, 20.0);
        let mut field = WaveField::new(&tuning(0.1, 0.02), scope, 8);
        assert_eq!(field.len(), 40);

        field.set_density(0.2);
        field.step(&scope);
        assert_eq!(field.len(), 80);

        field.set_density(0.02);
        field.step(&scope);
        assert_eq!(field.len(), 8);

        field.set_density(0.0);
        field.step(&scope);
        assert!(field.is_empty());
    }

    #[test]
    fn test_spawned_tiles_land_inside_trapezoid() {
        let scope = ViewScope::from_camera(Vec3::new(-10.0, 11.5, 0.0), 45.0, 1.6);
        let field = WaveField::new(&tuning(0.1, 0.02), scope, 17);
        assert!(!field.is_empty());
        let inside = field.tiles().iter().filter(|t| scope.contains(**t)).count();
        // Rejection sampling makes a miss vanishingly rare
        assert!(inside * 10 >= field.len() * 9, "{} of {}", inside, field.len());
    }

    proptest! {
        #[test]
        fn prop_count_tracks_target(sides in prop::collection::vec(0.0f32..40.0, 1..30)) {
            let mut field = WaveField::new(&tuning(0.1, 0.3), ViewScope::square(Vec3::ZERO, 20.0), 13);
            for side in sides {
                let scope = ViewScope::square(Vec3::ZERO, side);
                field.step(&scope);
                prop_assert!(field.len() <= 400);

                // Held still, the count no longer changes and sits near target
                let settled = field.len();
                field.step(&scope);
                prop_assert_eq!(field.len(), settled);
                let target = field.target_count(&scope);
                prop_assert!(settled.abs_diff(target) <= field.slack());
            }
        }

        #[test]
        fn prop_gradual_zoom_stays_near_target(
            start in 5.0f32..40.0,
            end in 5.0f32..40.0,
            frames in 20usize..200,
        ) {
            let mut field = WaveField::new(&tuning(0.1, 0.02), ViewScope::square(Vec3::ZERO, start), 31);
            for i in 1..=frames {
                let side = lerp(start, end, i as f32 / frames as f32);
                let scope = ViewScope::square(Vec3::ZERO, side);
                field.step(&scope);
                let target = field.target_count(&scope);
                prop_assert!(field.len().abs_diff(target) <= field.slack());
            }
        }
    }
}
