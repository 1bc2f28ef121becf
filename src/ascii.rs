//! ASCII rendering and export module for world maps
//!
//! Provides functions to render world features as ASCII text and export to files.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use chrono::Local;

use crate::error::Result;
use crate::feature::{Feature, MOUNTAIN_CHAR, TREE_CHAR};
use crate::geometry::{self, Bounds, Point};
use crate::world::World;

pub const SEA_CHAR: char = '~';
pub const LAND_CHAR: char = '.';
pub const RIVER_CHAR: char = '=';

/// Character grid over a world frame; one cell per character
struct Grid {
    frame: Bounds,
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl Grid {
    fn new(frame: Bounds, cols: usize, rows: usize) -> Self {
        Self { frame, cols, rows, cells: vec![SEA_CHAR; cols * rows] }
    }

    fn cell_width(&self) -> f64 {
        self.frame.width / self.cols as f64
    }

    fn cell_height(&self) -> f64 {
        self.frame.height / self.rows as f64
    }

    fn cell_center(&self, col: usize, row: usize) -> Point {
        Point::new(
            self.frame.x + (col as f64 + 0.5) * self.cell_width(),
            self.frame.y + (row as f64 + 0.5) * self.cell_height(),
        )
    }

    fn cell_of(&self, p: &Point) -> Option<usize> {
        let col = ((p.x - self.frame.x) / self.cell_width()).floor();
        let row = ((p.y - self.frame.y) / self.cell_height()).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f64 || row >= self.rows as f64 {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    fn mark(&mut self, p: &Point, ch: char) {
        if let Some(i) = self.cell_of(p) {
            self.cells[i] = ch;
        }
    }

    fn fill_polygon(&mut self, outline: &[Point]) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if geometry::is_inside(&self.cell_center(col, row), outline) {
                    self.cells[row * self.cols + col] = LAND_CHAR;
                }
            }
        }
    }

    /// Mark every cell a polyline passes through
    fn trace(&mut self, points: &[Point], ch: char) {
        let step = self.cell_width().min(self.cell_height()) / 2.0;
        for seg in points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let n = (a.distance(&b) / step).ceil().max(1.0) as usize;
            for k in 0..=n {
                let t = k as f64 / n as f64;
                self.mark(&Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t), ch);
            }
        }
    }

    fn into_string(self) -> String {
        let mut result = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.cells.chunks(self.cols) {
            result.extend(row);
            result.push('\n');
        }
        result
    }
}

/// Render features to an ASCII string, drawing them in the order given
pub fn render_features_ascii(features: &[Feature], frame: Bounds, cols: usize, rows: usize) -> String {
    if cols == 0 || rows == 0 {
        return String::new();
    }
    let mut grid = Grid::new(frame, cols, rows);

    for feature in features {
        match feature {
            Feature::Landmass(polygon) => grid.fill_polygon(&polygon.outline),
            Feature::River(line) => grid.trace(&line.points, RIVER_CHAR),
            Feature::Mountain(glyph) | Feature::Tree(glyph) => grid.mark(&glyph.position, glyph.character),
        }
    }

    grid.into_string()
}

/// Render a world to an ASCII string
pub fn render_ascii(world: &World, cols: usize, rows: usize) -> String {
    render_features_ascii(&world.features(), world.frame(), cols, rows)
}

/// Generate legend for map characters
pub fn legend() -> String {
    [
        (SEA_CHAR, "Sea"),
        (LAND_CHAR, "Land"),
        (RIVER_CHAR, "River"),
        (MOUNTAIN_CHAR, "Mountain"),
        (TREE_CHAR, "Tree"),
    ]
    .iter()
    .map(|(ch, name)| format!("  {} {}\n", ch, name))
    .collect()
}

/// Export world data to ASCII file
pub fn export_world_file(world: &World, path: impl AsRef<Path>, cols: usize, rows: usize) -> Result<()> {
    let mut file = File::create(path)?;
    let map = render_ascii(world, cols, rows);
    let stats = world.stats();

    // Header
    writeln!(file, "=== LANDMASS GENERATOR WORLD FILE ===")?;
    writeln!(file, "Seed: {}", world.seeds().master)?;
    writeln!(file, "Size: {}x{}", world.width, world.height)?;
    writeln!(file, "Grid: {}x{} characters", cols, rows)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", map)?;
    writeln!(file)?;
    writeln!(file, "Legend:")?;
    write!(file, "{}", legend())?;
    writeln!(file)?;

    let total = (cols * rows).max(1);
    let land = map.chars().filter(|c| *c != SEA_CHAR && *c != '\n').count();
    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Land: {} cells ({:.1}%)", land, 100.0 * land as f64 / total as f64)?;
    writeln!(file, "Landmasses: {}", stats.landmasses)?;
    writeln!(file, "Rivers: {} of {}", stats.rivers, stats.rivers_requested)?;
    writeln!(file, "Mountain ranges: {} of {} ({} peaks)", stats.ranges, stats.ranges_requested, stats.peaks)?;
    writeln!(file, "Forests: {} of {} ({} trees)", stats.forests, stats.forests_requested, stats.trees)?;

    Ok(())
}

/// Print ASCII map to stdout
pub fn print_ascii_map(world: &World, cols: usize, rows: usize) {
    print!("{}", render_ascii(world, cols, rows));
}
