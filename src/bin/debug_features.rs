//! Debug tool for comparing generator settings visually
//! Renders a grid of worlds grown on the same landmass with different feature parameters

use image::{ImageBuffer, Rgb, RgbImage};
use landmass_generator::feature::Feature;
use landmass_generator::forest::{self, ForestParams};
use landmass_generator::landmass::{Landmass, LandmassOptions};
use landmass_generator::render::{self, Viewport};
use landmass_generator::river::{self, RiverParams};
use landmass_generator::seeds::WorldSeeds;
use landmass_generator::world::{WORLD_HEIGHT, WORLD_WIDTH};
use landmass_generator::{feature, geometry::Bounds, mountain};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const CELL_SIZE: u32 = 360;
const SEED: u64 = 42;

/// One grid cell: which generators run, and with what parameters
struct Variant {
    name: &'static str,
    rivers: Option<(usize, RiverParams)>,
    ranges: usize,
    forests: Option<(usize, ForestParams)>,
}

fn main() {
    println!("Generating feature comparison grid...");

    // Generate the base landmass once
    let mut land_rng = ChaCha8Rng::seed_from_u64(SEED);
    let options = LandmassOptions::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0, WORLD_WIDTH * 0.9, WORLD_HEIGHT * 0.9);
    let land = match Landmass::generate(options, &mut land_rng) {
        Ok(land) => land,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let variants = vec![
        Variant { name: "1. Land only", rivers: None, ranges: 0, forests: None },
        Variant { name: "2. Rivers", rivers: Some((5, RiverParams::default())), ranges: 0, forests: None },
        Variant {
            name: "3. Long rivers",
            rivers: Some((5, RiverParams { max_steps: 120, wobble: 1.0, ..RiverParams::default() })),
            ranges: 0,
            forests: None,
        },
        Variant { name: "4. Mountains", rivers: None, ranges: 6, forests: None },
        Variant { name: "5. Forests", rivers: None, ranges: 0, forests: Some((4, ForestParams::default())) },
        Variant {
            name: "6. Dense forests",
            rivers: None,
            ranges: 0,
            forests: Some((4, ForestParams { survival_falloff: 0.3, generations: 4, ..ForestParams::default() })),
        },
        Variant {
            name: "7. Wide founders",
            rivers: None,
            ranges: 0,
            forests: Some((4, ForestParams { founder_jitter: 1.0, min_founders: 6, ..ForestParams::default() })),
        },
        Variant { name: "8. Sparse", rivers: Some((2, RiverParams::default())), ranges: 2, forests: Some((1, ForestParams::default())) },
        Variant { name: "9. Everything", rivers: Some((7, RiverParams::default())), ranges: 10, forests: Some((10, ForestParams::default())) },
    ];

    let seeds = WorldSeeds::from_master(SEED);
    let frame = Bounds::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT);
    let viewport = Viewport::fit(&frame, CELL_SIZE, CELL_SIZE);

    let mut images: Vec<(String, RgbImage)> = Vec::new();
    for variant in &variants {
        println!("  Processing: {}", variant.name);
        let features = grow_variant(&land, variant, &seeds);
        let img = render::render_features(&features, &viewport, CELL_SIZE, CELL_SIZE);
        images.push((variant.name.to_string(), img));
    }

    // Create 3x3 grid
    let grid = create_grid(&images, 3, 3);
    if let Err(e) = grid.save("feature_comparison.png") {
        eprintln!("Failed to save grid: {}", e);
        std::process::exit(1);
    }

    println!("Saved feature_comparison.png");
}

/// Grow the variant's features on the shared landmass, each generator on its own stream
fn grow_variant(land: &Landmass, variant: &Variant, seeds: &WorldSeeds) -> Vec<Feature> {
    let contour = land.contour();
    let mut features = vec![Feature::landmass(contour.smoothed_outline(), land.fill)];

    if let Some((count, params)) = &variant.rivers {
        let mut rng = WorldSeeds::rng(seeds.rivers);
        for _ in 0..*count {
            if let Some(path) = river::grow_river_with(contour, &land.bounds(), params, &mut rng) {
                features.extend(Feature::river(&path));
            }
        }
    }

    let mut rng = WorldSeeds::rng(seeds.mountains);
    for _ in 0..variant.ranges {
        let Some(seed) = land.sample_interior(&mut rng) else { continue };
        let size = mountain::random_range_size(&mut rng);
        for peak in mountain::grow_range(seed, size, contour, &mut rng) {
            features.push(Feature::mountain(peak, mountain::peak_glyph_size(size, &mut rng)));
        }
    }

    if let Some((count, params)) = &variant.forests {
        let mut rng = WorldSeeds::rng(seeds.forests);
        for _ in 0..*count {
            let Some(center) = land.sample_interior(&mut rng) else { continue };
            let size = forest::random_forest_size(&mut rng);
            let cluster = forest::grow_forest_with(center, size, contour, params, &mut rng);
            println!("    forest of {} trees, generations {:?}", cluster.trees.len(), cluster.generation_sizes);
            for tree in &cluster.trees {
                features.push(Feature::tree(*tree, forest::tree_glyph_size(&mut rng)));
            }
        }
    }

    feature::sort_for_drawing(&mut features);
    features
}

fn create_grid(images: &[(String, RgbImage)], cols: usize, rows: usize) -> RgbImage {
    let label_height = 20u32;
    let total_cell_height = CELL_SIZE + label_height;
    let mut grid: RgbImage = ImageBuffer::from_pixel(
        CELL_SIZE * cols as u32,
        total_cell_height * rows as u32,
        Rgb([30, 30, 30]),
    );

    for (idx, (name, img)) in images.iter().enumerate().take(cols * rows) {
        let col = (idx % cols) as u32;
        let row = (idx / cols) as u32;
        let x_offset = col * CELL_SIZE;
        let y_offset = row * total_cell_height + label_height;

        for (x, y, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x_offset + x, y_offset + y, *pixel);
        }

        render::draw_label(&mut grid, name, x_offset + 5, row * total_cell_height + 6, Rgb([255, 255, 255]));
    }

    grid
}
