use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use landmass_generator::error::Result;
use landmass_generator::options::{Count, WorldOptions};
use landmass_generator::seeds::WorldSeeds;
use landmass_generator::world::World;
use landmass_generator::{ascii, render, viewer};

#[derive(Parser, Debug)]
#[command(name = "landmass_generator")]
#[command(about = "Generate procedural island maps with rivers, mountain ranges and forests")]
struct Args {
    /// Width of the world frame in world units
    #[arg(short = 'W', long, default_value = "1000")]
    width: f64,

    /// Height of the world frame in world units
    #[arg(short = 'H', long, default_value = "1000")]
    height: f64,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of landmasses (1 if not specified)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u64).range(1..=4))]
    landmasses: Option<u64>,

    /// Number of rivers (random 0-7 if not specified)
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u64).range(0..=10))]
    rivers: Option<u64>,

    /// Number of mountain ranges (random 2-10 if not specified)
    #[arg(short = 'm', long, value_parser = clap::value_parser!(u64).range(0..=10))]
    mountains: Option<u64>,

    /// Number of forests (random 1-10 if not specified)
    #[arg(short = 'f', long, value_parser = clap::value_parser!(u64).range(0..=10))]
    forests: Option<u64>,

    /// Load world options from a JSON file; flags above override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export the rendered map to PNG (e.g., "world.png")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Size in pixels of the longer edge of the PNG export
    #[arg(long, default_value = "1000")]
    image_size: u32,

    /// Export the ASCII map and statistics to a text file
    #[arg(long)]
    ascii: Option<PathBuf>,

    /// ASCII map width in characters
    #[arg(long, default_value = "80")]
    ascii_width: usize,

    /// ASCII map height in characters
    #[arg(long, default_value = "40")]
    ascii_height: usize,

    /// Open the interactive viewer (R regenerates, Esc exits)
    #[arg(long)]
    view: bool,
}

impl Args {
    fn world_options(&self) -> Result<WorldOptions> {
        let mut options = match &self.config {
            Some(path) => {
                println!("Loading options from {}", path.display());
                WorldOptions::from_json_file(path)?
            }
            None => WorldOptions::default(),
        };

        let exact = |n: u64| Count::Exact(n as f64);
        if let Some(n) = self.landmasses {
            options.landmasses = Some(exact(n));
        }
        if let Some(n) = self.rivers {
            options.rivers = Some(exact(n));
        }
        if let Some(n) = self.mountains {
            options.mountain_ranges = Some(exact(n));
        }
        if let Some(n) = self.forests {
            options.forests = Some(exact(n));
        }

        options.validate()?;
        Ok(options)
    }

    /// PNG size matching the world aspect ratio
    fn image_dimensions(&self) -> (u32, u32) {
        let longest = self.width.max(self.height);
        let w = (self.image_size as f64 * self.width / longest).round().max(1.0) as u32;
        let h = (self.image_size as f64 * self.height / longest).round().max(1.0) as u32;
        (w, h)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let options = args.world_options()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let seeds = WorldSeeds::from_master(seed);

    println!("Generating world with seed: {}", seed);
    println!("World size: {}x{}", args.width, args.height);

    let mut world = World::new(args.width, args.height);
    world.populate_with_seeds(&options, seeds)?;

    let stats = world.stats();
    println!("Created {} landmass(es)", stats.landmasses);
    if let Some(extent) = world.land_extent() {
        println!(
            "Land extent: ({:.0}, {:.0}) to ({:.0}, {:.0})",
            extent.x, extent.y, extent.right(), extent.bottom()
        );
    }
    println!("Rivers: {} of {} requested", stats.rivers, stats.rivers_requested);
    println!(
        "Mountain ranges: {} of {} requested ({} peaks)",
        stats.ranges, stats.ranges_requested, stats.peaks
    );
    println!(
        "Forests: {} of {} requested ({} trees)",
        stats.forests, stats.forests_requested, stats.trees
    );

    if let Some(path) = &args.output {
        let (w, h) = args.image_dimensions();
        println!("Exporting {}x{} map to {}...", w, h, path.display());
        render::export_png(&world, path, w, h)?;
    }

    if let Some(path) = &args.ascii {
        println!("Exporting ASCII map to {}...", path.display());
        ascii::export_world_file(&world, path, args.ascii_width, args.ascii_height)?;
    }

    if args.view {
        viewer::run_viewer(world, &options)?;
    } else if args.output.is_none() && args.ascii.is_none() {
        println!();
        ascii::print_ascii_map(&world, args.ascii_width, args.ascii_height);
        println!();
        print!("{}", ascii::legend());
    }

    println!("Done!");
    Ok(())
}
