//! Forest colonization growth
//!
//! A forest starts from a handful of founder trees jittered around its center.
//! Over a fixed number of generations every living tree scatters seeds around
//! itself; a seed takes root only on land and only if it wins a survival roll
//! that gets harder the farther it is from the forest center. Trees never die,
//! so the population only grows.
//!
//! The seed count and seed distance each carry a random term multiplied by
//! zero. The draws are still consumed, so the result is a constant 100 seeds
//! at a constant distance of 10 units. The survival falloff reaches zero at
//! `size * 0.02` from the center, which keeps forests tightly clustered no
//! matter how large `size` is.

use rand::Rng;
use std::f64::consts::PI;

use crate::geometry::Point;
use crate::landmass::Contour;

/// Parameters controlling forest colonization
#[derive(Clone, Debug)]
pub struct ForestParams {
    /// Founders are `min_founders + floor(U * founder_spread)`
    pub min_founders: usize,
    pub founder_spread: f64,
    /// Founder jitter as a fraction of the forest size (full width)
    pub founder_jitter: f64,
    pub generations: usize,
    /// Seeds per tree are `base_seeds + floor(U * seed_spread)`
    pub base_seeds: usize,
    pub seed_spread: f64,
    /// Seed distance is `base_seed_distance + U * size * seed_distance_spread`
    pub base_seed_distance: f64,
    pub seed_distance_spread: f64,
    /// Survival chance at the center; falls off by `distance / (size * survival_falloff)`
    pub max_survival: f64,
    pub survival_falloff: f64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            min_founders: 2,
            founder_spread: 4.0,
            founder_jitter: 0.5,
            generations: 8,
            base_seeds: 100,
            seed_spread: 0.0,
            base_seed_distance: 10.0,
            seed_distance_spread: 0.0,
            max_survival: 0.2,
            survival_falloff: 0.1,
        }
    }
}

/// Forest size is `FOREST_SIZE_MIN + U * FOREST_SIZE_JITTER`
pub const FOREST_SIZE_MIN: f64 = 80.0;
pub const FOREST_SIZE_JITTER: f64 = 120.0;

/// Tree glyph size is `TREE_SIZE_MIN + U * TREE_SIZE_JITTER`
pub const TREE_SIZE_MIN: f64 = 32.0;
pub const TREE_SIZE_JITTER: f64 = 32.0;

/// The surviving trees of one forest
#[derive(Clone, Debug, Default)]
pub struct ForestCluster {
    pub center: Point,
    /// Founders first, then survivors in the order they took root
    pub trees: Vec<Point>,
    /// Number of founders at the start of `trees`
    pub founders: usize,
    /// Active set size after each generation
    pub generation_sizes: Vec<usize>,
}

impl ForestCluster {
    pub fn founders(&self) -> &[Point] {
        &self.trees[..self.founders]
    }

    pub fn seeded(&self) -> &[Point] {
        &self.trees[self.founders..]
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

/// Chance that a seed at `distance` from the forest center takes root
pub fn survival_chance(distance: f64, size: f64, params: &ForestParams) -> f64 {
    (params.max_survival - distance / (size * params.survival_falloff)).max(0.0)
}

/// Grow one forest with the default parameters
pub fn grow_forest(center: Point, size: f64, contour: &Contour, rng: &mut impl Rng) -> ForestCluster {
    grow_forest_with(center, size, contour, &ForestParams::default(), rng)
}

pub fn grow_forest_with(
    center: Point,
    size: f64,
    contour: &Contour,
    params: &ForestParams,
    rng: &mut impl Rng,
) -> ForestCluster {
    let mut trees = Vec::new();

    let founder_count = params.min_founders + (rng.gen::<f64>() * params.founder_spread).floor() as usize;
    for _ in 0..founder_count {
        let founder = Point::new(
            center.x + (rng.gen::<f64>() - 0.5) * size * params.founder_jitter,
            center.y + (rng.gen::<f64>() - 0.5) * size * params.founder_jitter,
        );
        if contour.contains(&founder) {
            trees.push(founder);
        }
    }
    let founders = trees.len();

    let mut generation_sizes = Vec::with_capacity(params.generations);
    for _ in 0..params.generations {
        // Only trees alive at the start of the generation scatter seeds
        let parents = trees.len();
        for p in 0..parents {
            let parent = trees[p];
            let seed_count = params.base_seeds + (rng.gen::<f64>() * params.seed_spread).floor() as usize;

            for _ in 0..seed_count {
                let angle = rng.gen::<f64>() * PI * 2.0;
                let distance = params.base_seed_distance + rng.gen::<f64>() * size * params.seed_distance_spread;
                let seed = parent.offset_polar(angle, distance);

                let chance = survival_chance(seed.distance(&center), size, params);
                if rng.gen::<f64>() > chance {
                    continue;
                }

                if !contour.contains(&seed) {
                    continue;
                }

                trees.push(seed);
            }
        }
        generation_sizes.push(trees.len());
    }

    ForestCluster { center, trees, founders, generation_sizes }
}

/// Random size for a new forest
pub fn random_forest_size(rng: &mut impl Rng) -> f64 {
    FOREST_SIZE_MIN + rng.gen::<f64>() * FOREST_SIZE_JITTER
}

/// Glyph size for one tree
pub fn tree_glyph_size(rng: &mut impl Rng) -> f64 {
    TREE_SIZE_MIN + rng.gen::<f64>() * TREE_SIZE_JITTER
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square_contour(size: f64) -> Contour {
        Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    #[test]
    fn test_survival_falloff() {
        let params = ForestParams::default();
        assert!((survival_chance(0.0, 100.0, &params) - 0.2).abs() < 1e-12);
        assert!((survival_chance(1.0, 100.0, &params) - 0.1).abs() < 1e-12);
        // Zero once past size * 0.02
        assert_eq!(survival_chance(2.5, 100.0, &params), 0.0);
        assert_eq!(survival_chance(50.0, 100.0, &params), 0.0);
    }

    #[test]
    fn test_forest_grows_monotonically_and_stays_on_land() {
        let contour = square_contour(1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        for _ in 0..50 {
            let center = Point::new(rng.gen_range(100.0..900.0), rng.gen_range(100.0..900.0));
            let size = random_forest_size(&mut rng);
            let forest = grow_forest(center, size, &contour, &mut rng);

            assert!((2..=5).contains(&forest.founders));
            assert_eq!(forest.generation_sizes.len(), 8);
            let mut prev = forest.founders;
            for &n in &forest.generation_sizes {
                assert!(n >= prev);
                prev = n;
            }
            assert_eq!(forest.trees.len(), prev);
            assert!(forest.trees.iter().all(|t| contour.contains(t)));
        }
    }

    #[test]
    fn test_founders_jitter_around_center() {
        let contour = square_contour(1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let center = Point::new(500.0, 500.0);
        let forest = grow_forest(center, 200.0, &contour, &mut rng);
        for f in forest.founders() {
            assert!((f.x - center.x).abs() <= 50.0);
            assert!((f.y - center.y).abs() <= 50.0);
        }
    }

    #[test]
    fn test_seeds_stay_near_center() {
        let contour = square_contour(1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(29);
        let center = Point::new(500.0, 500.0);
        let size = 150.0;
        for _ in 0..20 {
            let forest = grow_forest(center, size, &contour, &mut rng);
            // A seed only survives within size * 0.02 of the center
            assert!(forest.seeded().iter().all(|t| t.distance(&center) < size * 0.02));
        }
    }

    #[test]
    fn test_founders_at_sea_leave_empty_forest() {
        let contour = square_contour(100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let forest = grow_forest(Point::new(5000.0, 5000.0), 100.0, &contour, &mut rng);
        assert!(forest.is_empty());
        assert_eq!(forest.generation_sizes, vec![0; 8]);
    }

    #[test]
    fn test_founder_on_center_spawns_ring_of_survivors() {
        // With no jitter every founder sits on the center, so first-generation
        // seeds land exactly 10 units out where size 1000 still gives a 0.1 chance
        let contour = square_contour(10_000.0);
        let params = ForestParams { founder_jitter: 0.0, generations: 1, ..ForestParams::default() };
        let center = Point::new(5000.0, 5000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let forest = grow_forest_with(center, 1000.0, &contour, &params, &mut rng);

        assert!(!forest.seeded().is_empty());
        for t in forest.seeded() {
            assert!((t.distance(&center) - 10.0).abs() < 1e-9);
        }
    }
}
