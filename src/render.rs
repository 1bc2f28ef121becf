//! Raster rendering of world features
//!
//! Draws the feature list into an `RgbImage` over an ocean background. The
//! world frame is fitted to the image: uniform scale, centered on the
//! shorter axis. Landmass fill runs one scanline per rayon task.

use image::{ImageBuffer, Rgb, RgbImage};
use rayon::prelude::*;
use std::path::Path;

use crate::colors::{self, OCEAN_BLUE};
use crate::error::Result;
use crate::feature::{Feature, Glyph, Polygon, Polyline};
use crate::geometry::{Bounds, Point};
use crate::world::World;

/// Bitmap cells per font size unit: a glyph of size `s` is `s * 0.7` tall over 7 rows
const GLYPH_CELL: f64 = 0.1;

/// World-to-screen mapping for a fitted frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    /// Fit `frame` into a `width` x `height` screen, preserving aspect ratio
    pub fn fit(frame: &Bounds, width: u32, height: u32) -> Self {
        let scale_x = width as f64 / frame.width;
        let scale_y = height as f64 / frame.height;
        let scale = scale_x.min(scale_y);

        Self {
            scale,
            offset_x: (width as f64 - frame.width * scale) / 2.0 - frame.x * scale,
            offset_y: (height as f64 - frame.height * scale) / 2.0 - frame.y * scale,
        }
    }

    pub fn to_screen(&self, p: &Point) -> Point {
        Point::new(p.x * self.scale + self.offset_x, p.y * self.scale + self.offset_y)
    }
}

/// Render a world fitted into an image of the given size
pub fn render_world(world: &World, width: u32, height: u32) -> RgbImage {
    let viewport = Viewport::fit(&world.frame(), width, height);
    render_features(&world.features(), &viewport, width, height)
}

/// Render features in the order given
pub fn render_features(features: &[Feature], viewport: &Viewport, width: u32, height: u32) -> RgbImage {
    let sea = colors::to_rgb(colors::palette(OCEAN_BLUE));
    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, sea);

    for feature in features {
        match feature {
            Feature::Landmass(polygon) => fill_polygon(&mut img, polygon, viewport),
            Feature::River(line) => stroke_polyline(&mut img, line, viewport),
            Feature::Mountain(glyph) | Feature::Tree(glyph) => draw_glyph(&mut img, glyph, viewport),
        }
    }

    img
}

/// Render and save a world as PNG
pub fn export_png(world: &World, path: impl AsRef<Path>, width: u32, height: u32) -> Result<()> {
    render_world(world, width, height).save(path)?;
    Ok(())
}

/// Even-odd scanline fill, sampling pixel centers
fn fill_polygon(img: &mut RgbImage, polygon: &Polygon, viewport: &Viewport) {
    if polygon.outline.len() < 3 || img.width() == 0 {
        return;
    }
    let outline: Vec<Point> = polygon.outline.iter().map(|p| viewport.to_screen(p)).collect();
    let color = colors::to_rgb(polygon.fill);
    let width = img.width() as usize;

    img.par_chunks_mut(width * 3).enumerate().for_each(|(y, row)| {
        let spans = scanline_spans(&outline, y as f64 + 0.5);
        for pair in spans.chunks_exact(2) {
            let start = (pair[0] - 0.5).ceil().max(0.0) as usize;
            let end = ((pair[1] - 0.5).ceil().max(0.0) as usize).min(width);
            for x in start..end {
                row[x * 3..x * 3 + 3].copy_from_slice(&color.0);
            }
        }
    });
}

/// Sorted x crossings of the closed outline with the horizontal line at `y`
fn scanline_spans(outline: &[Point], y: f64) -> Vec<f64> {
    let n = outline.len();
    let mut xs = Vec::new();
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + n - 1) % n];
        if (a.y > y) != (b.y > y) {
            xs.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
        }
    }
    xs.sort_by(f64::total_cmp);
    xs
}

/// Thick stroke with round joins, blended once per covered pixel
fn stroke_polyline(img: &mut RgbImage, line: &Polyline, viewport: &Viewport) {
    if line.points.len() < 2 {
        return;
    }
    let points: Vec<Point> = line.points.iter().map(|p| viewport.to_screen(p)).collect();
    let half = (line.width * viewport.scale / 2.0).max(0.5);
    let (w, h) = (img.width() as i64, img.height() as i64);
    let mut covered = vec![false; (w * h) as usize];

    for seg in points.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        let x0 = ((a.x.min(b.x) - half).floor() as i64).max(0);
        let x1 = ((a.x.max(b.x) + half).ceil() as i64).min(w - 1);
        let y0 = ((a.y.min(b.y) - half).floor() as i64).max(0);
        let y1 = ((a.y.max(b.y) + half).ceil() as i64).min(h - 1);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let center = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                if distance_to_segment(&center, &a, &b) <= half {
                    covered[(py * w + px) as usize] = true;
                }
            }
        }
    }

    let color = colors::to_rgb(line.color);
    for (i, _) in covered.iter().enumerate().filter(|(_, c)| **c) {
        let (x, y) = ((i as i64 % w) as u32, (i as i64 / w) as u32);
        let base = *img.get_pixel(x, y);
        img.put_pixel(x, y, colors::blend(base, color, line.alpha));
    }
}

fn distance_to_segment(p: &Point, a: &Point, b: &Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(&Point::new(a.x + t * dx, a.y + t * dy))
}

/// Glyph drawn from the bitmap font, scaled to its size and centered on its position
fn draw_glyph(img: &mut RgbImage, glyph: &Glyph, viewport: &Viewport) {
    let cell = (glyph.size * GLYPH_CELL * viewport.scale).max(1.0);
    let center = viewport.to_screen(&glyph.position);
    let left = center.x - cell * 2.5;
    let top = center.y - cell * 3.5;
    draw_bitmap(img, char_bitmap(glyph.character), left, top, cell, colors::to_rgb(glyph.color));
}

fn draw_bitmap(img: &mut RgbImage, bitmap: [u8; 7], left: f64, top: f64, cell: f64, color: Rgb<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for (row, bits) in bitmap.iter().enumerate() {
        for col in 0..5 {
            if (bits >> (4 - col)) & 1 == 0 {
                continue;
            }
            let x0 = (left + col as f64 * cell).round() as i64;
            let y0 = (top + row as f64 * cell).round() as i64;
            let x1 = (left + (col + 1) as f64 * cell).round() as i64;
            let y1 = (top + (row + 1) as f64 * cell).round() as i64;
            for py in y0.max(0)..y1.min(h) {
                for px in x0.max(0)..x1.min(w) {
                    img.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

/// Draw a one-pixel-per-cell text label at the given top-left corner
pub fn draw_label(img: &mut RgbImage, text: &str, x: u32, y: u32, color: Rgb<u8>) {
    for (i, c) in text.chars().enumerate() {
        let cx = x as f64 + (i as f64) * 6.0;
        draw_bitmap(img, char_bitmap(c), cx, y as f64, 1.0, color);
    }
}

/// 5x7 bitmap for a character (7 rows of 5-bit patterns). Letters are uppercase only.
pub fn char_bitmap(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        '^' => [0b00100, 0b01010, 0b01010, 0b10001, 0b10001, 0b00000, 0b00000],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000],
        '=' => [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100],
        ' ' => [0b00000; 7],
        _ => [0b11111; 7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::SAND_TAN;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    #[test]
    fn test_viewport_fits_and_centers() {
        let frame = Bounds::new(0.0, 0.0, 1000.0, 1000.0);
        let vp = Viewport::fit(&frame, 400, 200);
        assert_eq!(vp.scale, 0.2);
        assert_eq!(vp.offset_x, 100.0);
        assert_eq!(vp.offset_y, 0.0);

        let p = vp.to_screen(&Point::new(500.0, 500.0));
        assert!(p.distance(&Point::new(200.0, 100.0)) < 1e-9);
        let corner = vp.to_screen(&Point::new(0.0, 0.0));
        assert!(corner.distance(&Point::new(100.0, 0.0)) < 1e-9);
    }

    #[test]
    fn test_polygon_fills_inside_only() {
        let vp = Viewport::fit(&Bounds::new(0.0, 0.0, 100.0, 100.0), 100, 100);
        let sand = colors::palette(SAND_TAN);
        let features = vec![Feature::landmass(square(20.0, 20.0, 60.0), sand)];
        let img = render_features(&features, &vp, 100, 100);

        assert_eq!(*img.get_pixel(50, 50), colors::to_rgb(sand));
        assert_eq!(*img.get_pixel(20, 20), colors::to_rgb(sand));
        assert_eq!(*img.get_pixel(79, 79), colors::to_rgb(sand));
        assert_eq!(*img.get_pixel(80, 50), colors::to_rgb(colors::palette(OCEAN_BLUE)));
        assert_eq!(*img.get_pixel(5, 5), colors::to_rgb(colors::palette(OCEAN_BLUE)));
    }

    #[test]
    fn test_river_blends_over_land() {
        let vp = Viewport::fit(&Bounds::new(0.0, 0.0, 100.0, 100.0), 100, 100);
        let sand = colors::palette(SAND_TAN);
        let river = Feature::River(Polyline {
            points: vec![Point::new(10.0, 50.0), Point::new(90.0, 50.0)],
            width: 10.0,
            color: colors::palette(OCEAN_BLUE),
            alpha: 0.5,
        });
        let features = vec![Feature::landmass(square(0.0, 0.0, 100.0), sand), river];
        let img = render_features(&features, &vp, 100, 100);

        let expected = colors::blend(colors::to_rgb(sand), colors::to_rgb(colors::palette(OCEAN_BLUE)), 0.5);
        assert_eq!(*img.get_pixel(50, 50), expected);
        assert_eq!(*img.get_pixel(50, 20), colors::to_rgb(sand));
    }

    #[test]
    fn test_glyph_draws_near_position() {
        let vp = Viewport::fit(&Bounds::new(0.0, 0.0, 100.0, 100.0), 100, 100);
        let features = vec![Feature::tree(Point::new(50.0, 50.0), 50.0)];
        let img = render_features(&features, &vp, 100, 100);

        let green = colors::to_rgb(colors::palette(crate::colors::TREE_GREEN));
        let painted: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, px)| **px == green)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!painted.is_empty());
        assert!(painted.iter().all(|&(x, y)| (30..70).contains(&x) && (30..70).contains(&y)));
        // Trunk of the T passes through the center column
        assert_eq!(*img.get_pixel(50, 52), green);
    }

    #[test]
    fn test_scanline_spans_pairs() {
        let spans = scanline_spans(&square(0.0, 0.0, 10.0), 5.0);
        assert_eq!(spans, vec![0.0, 10.0]);
        assert!(scanline_spans(&square(0.0, 0.0, 10.0), 20.0).is_empty());
    }
}
