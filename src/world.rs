//! World composer
//!
//! Runs the generators in a fixed order: landmasses first, since every other
//! generator samples their bounds and tests against their contours, then
//! rivers, mountain ranges and forests. Regenerating throws the whole world
//! away and builds a new one from scratch.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::error::{Result, WorldError};
use crate::feature::{self, Feature};
use crate::forest::{self, ForestCluster};
use crate::geometry::{Bounds, Point};
use crate::landmass::Landmass;
use crate::mountain;
use crate::options::{ResolvedOptions, WorldOptions};
use crate::river::{self, RiverPath};
use crate::seeds::WorldSeeds;

/// Default world frame, in world units
pub const WORLD_WIDTH: f64 = 1000.0;
pub const WORLD_HEIGHT: f64 = 1000.0;

/// A grown mountain range with per-peak glyph sizes
#[derive(Clone, Debug)]
pub struct MountainRange {
    pub peaks: Vec<Point>,
    /// Spacing size the chain was grown with
    pub size: f64,
    pub peak_sizes: Vec<f64>,
}

/// A grown forest with per-tree glyph sizes
#[derive(Clone, Debug)]
pub struct Forest {
    pub cluster: ForestCluster,
    pub size: f64,
    pub tree_sizes: Vec<f64>,
}

/// Requested vs. produced feature counts for one cycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub landmasses: usize,
    pub rivers_requested: usize,
    pub rivers: usize,
    pub ranges_requested: usize,
    pub ranges: usize,
    pub peaks: usize,
    pub forests_requested: usize,
    pub forests: usize,
    pub trees: usize,
}

impl WorldStats {
    /// Features dropped by the omission policy
    pub fn omitted(&self) -> usize {
        (self.rivers_requested - self.rivers)
            + (self.ranges_requested - self.ranges)
            + (self.forests_requested - self.forests)
    }
}

/// All generated data for one world
pub struct World {
    pub width: f64,
    pub height: f64,
    seeds: WorldSeeds,
    landmasses: Vec<Landmass>,
    rivers: Vec<RiverPath>,
    ranges: Vec<MountainRange>,
    forests: Vec<Forest>,
    stats: WorldStats,
}

impl World {
    /// Empty world of the given frame size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            seeds: WorldSeeds::from_master(0),
            landmasses: Vec::new(),
            rivers: Vec::new(),
            ranges: Vec::new(),
            forests: Vec::new(),
            stats: WorldStats::default(),
        }
    }

    pub fn seeds(&self) -> &WorldSeeds {
        &self.seeds
    }

    pub fn landmasses(&self) -> &[Landmass] {
        &self.landmasses
    }

    pub fn rivers(&self) -> &[RiverPath] {
        &self.rivers
    }

    pub fn ranges(&self) -> &[MountainRange] {
        &self.ranges
    }

    pub fn forests(&self) -> &[Forest] {
        &self.forests
    }

    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }

    /// Frame of the world, used by renderers to fit the view
    pub fn frame(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width, self.height)
    }

    /// Generate a brand-new world with fresh random seeds
    pub fn populate(&mut self, options: &WorldOptions) -> Result<()> {
        self.populate_with_seeds(options, WorldSeeds::random())
    }

    /// Generate a world from explicit seeds (same seeds and options give the same world)
    pub fn populate_with_seeds(&mut self, options: &WorldOptions, seeds: WorldSeeds) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(WorldError::InvalidOptions(format!(
                "world size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        options.validate()?;
        self.clear();

        let mut layout_rng = WorldSeeds::rng(seeds.layout);
        let plan = options.resolve(self.width, self.height, &mut layout_rng);

        let mut land_rng = WorldSeeds::rng(seeds.landmass);
        self.landmasses = plan
            .landmasses
            .iter()
            .cloned()
            .map(|opts| Landmass::generate(opts, &mut land_rng))
            .collect::<std::result::Result<_, _>>()?;

        self.grow_features(&plan, &seeds);
        self.seeds = seeds;

        info!(
            seed = self.seeds.master,
            landmasses = self.stats.landmasses,
            rivers = self.stats.rivers,
            ranges = self.stats.ranges,
            forests = self.stats.forests,
            trees = self.stats.trees,
            omitted = self.stats.omitted(),
            "world populated"
        );
        Ok(())
    }

    /// Discard everything and build a new world
    pub fn regenerate(&mut self, options: &WorldOptions) -> Result<()> {
        self.populate(options)
    }

    /// Replace the landmasses with prebuilt ones and drop all features
    pub fn set_landmasses(&mut self, landmasses: Vec<Landmass>) {
        self.clear();
        self.landmasses = landmasses;
    }

    /// Grow rivers, ranges and forests on the current landmasses
    pub fn grow_features(&mut self, plan: &ResolvedOptions, seeds: &WorldSeeds) {
        self.rivers.clear();
        self.ranges.clear();
        self.forests.clear();
        self.stats = WorldStats {
            landmasses: self.landmasses.len(),
            rivers_requested: plan.rivers,
            ranges_requested: plan.mountain_ranges,
            forests_requested: plan.forests,
            ..WorldStats::default()
        };

        if self.landmasses.is_empty() {
            debug!("no landmass to grow features on");
            return;
        }

        self.populate_rivers(plan.rivers, &mut WorldSeeds::rng(seeds.rivers));
        self.populate_mountains(plan.mountain_ranges, &mut WorldSeeds::rng(seeds.mountains));
        self.populate_forests(plan.forests, &mut WorldSeeds::rng(seeds.forests));
    }

    fn clear(&mut self) {
        self.landmasses.clear();
        self.rivers.clear();
        self.ranges.clear();
        self.forests.clear();
        self.stats = WorldStats::default();
    }

    /// Landmass hosting the next feature; only draws when there is a choice
    fn pick_landmass(&self, rng: &mut ChaCha8Rng) -> usize {
        if self.landmasses.len() > 1 {
            rng.gen_range(0..self.landmasses.len())
        } else {
            0
        }
    }

    fn populate_rivers(&mut self, count: usize, rng: &mut ChaCha8Rng) {
        for i in 0..count {
            let land = &self.landmasses[self.pick_landmass(rng)];
            match river::grow_river(land.contour(), &land.bounds(), rng) {
                Some(path) if path.is_renderable() => {
                    self.rivers.push(path);
                    self.stats.rivers += 1;
                }
                Some(_) => debug!(river = i, "river too short to draw"),
                None => debug!(river = i, "river omitted: no inland source"),
            }
        }
    }

    fn populate_mountains(&mut self, count: usize, rng: &mut ChaCha8Rng) {
        for i in 0..count {
            let land = &self.landmasses[self.pick_landmass(rng)];
            let Some(seed) = land.sample_interior(rng) else {
                debug!(range = i, "mountain range omitted: no inland seed");
                continue;
            };

            let size = mountain::random_range_size(rng);
            let peaks = mountain::grow_range(seed, size, land.contour(), rng);
            let peak_sizes = peaks.iter().map(|_| mountain::peak_glyph_size(size, rng)).collect();

            self.stats.ranges += 1;
            self.stats.peaks += peaks.len();
            self.ranges.push(MountainRange { peaks, size, peak_sizes });
        }
    }

    fn populate_forests(&mut self, count: usize, rng: &mut ChaCha8Rng) {
        for i in 0..count {
            let land = &self.landmasses[self.pick_landmass(rng)];
            let Some(center) = land.sample_interior(rng) else {
                debug!(forest = i, "forest omitted: no inland center");
                continue;
            };

            let size = forest::random_forest_size(rng);
            let cluster = forest::grow_forest(center, size, land.contour(), rng);
            if cluster.is_empty() {
                debug!(forest = i, "forest omitted: every founder fell at sea");
                continue;
            }
            let tree_sizes = cluster.trees.iter().map(|_| forest::tree_glyph_size(rng)).collect();

            self.stats.forests += 1;
            self.stats.trees += cluster.trees.len();
            self.forests.push(Forest { cluster, size, tree_sizes });
        }
    }

    /// Every feature of the world in draw order
    pub fn features(&self) -> Vec<Feature> {
        let mut features: Vec<Feature> = self
            .landmasses
            .iter()
            .map(|land| Feature::landmass(land.contour().smoothed_outline(), land.fill))
            .collect();

        features.extend(self.rivers.iter().filter_map(Feature::river));

        for range in &self.ranges {
            for (peak, &size) in range.peaks.iter().zip(&range.peak_sizes) {
                features.push(Feature::mountain(*peak, size));
            }
        }

        for forest in &self.forests {
            for (tree, &size) in forest.cluster.trees.iter().zip(&forest.tree_sizes) {
                features.push(Feature::tree(*tree, size));
            }
        }

        feature::sort_for_drawing(&mut features);
        features
    }

    /// Smallest rectangle covering every landmass
    pub fn land_extent(&self) -> Option<Bounds> {
        self.landmasses.iter().map(Landmass::bounds).reduce(|a, b| a.union(&b))
    }

    /// True when `p` is on any landmass
    pub fn is_land(&self, p: &Point) -> bool {
        self.landmasses.iter().any(|land| land.contains(p))
    }
}
