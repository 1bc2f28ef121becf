//! Landmass contour generation
//!
//! A landmass is an irregular closed polygon built by walking evenly spaced
//! angles around a center and jittering the radius on each axis. Even angular
//! spacing keeps the vertices roughly in angular order, which avoids gross
//! self-intersection. The raw vertices are what containment tests use; the
//! smoothed outline is presentation only.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::colors::{self, SAND_TAN};
use crate::error::ColorError;
use crate::geometry::{self, Bounds, Point};

/// Vertex count is `MIN_VERTICES + floor(U * VERTEX_SPREAD)`
const MIN_VERTICES: usize = 12;
const VERTEX_SPREAD: f64 = 8.0;

/// Radius range as a fraction of the landmass width/height
const RADIUS_MIN: f64 = 0.3;
const RADIUS_JITTER: f64 = 0.2;

/// Line segments used to flatten each quadratic curve of the outline
const CURVE_SEGMENTS: usize = 8;

/// Placement descriptor for a single landmass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmassOptions {
    /// Center X in world space
    pub x: f64,
    /// Center Y in world space
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Fill color as `#RRGGBB`; sand tan when absent
    #[serde(default)]
    pub color: Option<String>,
}

impl LandmassOptions {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, color: None }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn fill_color(&self) -> Result<u32, ColorError> {
        match &self.color {
            Some(hex) => colors::hex_to_int(hex),
            None => Ok(colors::palette(SAND_TAN)),
        }
    }
}

/// Closed landmass boundary. The last vertex connects back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, p: &Point) -> bool {
        geometry::is_inside(p, &self.points)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }

    /// Smoothed outline for drawing, flattened into a closed polyline.
    ///
    /// Each vertex acts as the control point of a quadratic curve ending at the
    /// midpoint to the next vertex. The path then closes straight back to the
    /// first vertex.
    pub fn smoothed_outline(&self) -> Vec<Point> {
        let Some(&first) = self.points.first() else {
            return Vec::new();
        };

        let mut outline = vec![first];
        let mut cursor = first;
        for pair in self.points.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let end = prev.midpoint(&curr);
            flatten_quadratic(&mut outline, cursor, prev, end, CURVE_SEGMENTS);
            cursor = end;
        }

        outline
    }
}

/// Append points of the quadratic curve `from -> (ctrl) -> to`, excluding `from`
pub fn flatten_quadratic(out: &mut Vec<Point>, from: Point, ctrl: Point, to: Point, segments: usize) {
    for s in 1..=segments {
        let t = s as f64 / segments as f64;
        let mt = 1.0 - t;
        let w0 = mt * mt;
        let w1 = 2.0 * mt * t;
        let w2 = t * t;
        out.push(Point::new(
            w0 * from.x + w1 * ctrl.x + w2 * to.x,
            w0 * from.y + w1 * ctrl.y + w2 * to.y,
        ));
    }
}

/// Build an irregular closed contour around `center` sized by `width` x `height`.
pub fn generate_contour(center: Point, width: f64, height: f64, rng: &mut impl Rng) -> Contour {
    let count = MIN_VERTICES + (rng.gen::<f64>() * VERTEX_SPREAD).floor() as usize;
    let mut points = Vec::with_capacity(count);

    for i in 0..count {
        let angle = (i as f64 / count as f64) * PI * 2.0;

        let radius_x = width * (RADIUS_MIN + rng.gen::<f64>() * RADIUS_JITTER);
        let radius_y = height * (RADIUS_MIN + rng.gen::<f64>() * RADIUS_JITTER);

        points.push(Point::new(
            center.x + angle.cos() * radius_x,
            center.y + angle.sin() * radius_y,
        ));
    }

    Contour::new(points)
}

/// A generated landmass: its placement, boundary and cached bounds
#[derive(Clone, Debug)]
pub struct Landmass {
    pub options: LandmassOptions,
    pub fill: u32,
    contour: Contour,
    bounds: Bounds,
}

impl Landmass {
    pub fn generate(options: LandmassOptions, rng: &mut impl Rng) -> Result<Self, ColorError> {
        let contour = generate_contour(options.center(), options.width, options.height, rng);
        Self::from_contour(options, contour)
    }

    /// Landmass with a prebuilt boundary, e.g. a fixed test shape
    pub fn from_contour(options: LandmassOptions, contour: Contour) -> Result<Self, ColorError> {
        let fill = options.fill_color()?;
        let bounds = contour
            .bounds()
            .unwrap_or_else(|| Bounds::new(options.x, options.y, 0.0, 0.0));
        Ok(Self { options, fill, contour, bounds })
    }

    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    /// World-space boundary vertices
    pub fn points(&self) -> &[Point] {
        self.contour.points()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.contour.contains(p)
    }

    /// Uniform rejection sample of an interior point over the full bounds
    pub fn sample_interior(&self, rng: &mut impl Rng) -> Option<Point> {
        geometry::sample_within(geometry::MAX_SAMPLE_ATTEMPTS, || {
            let p = self.bounds.lerp(rng.gen(), rng.gen());
            self.contains(&p).then_some(p)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_vertex_count_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let contour = generate_contour(Point::new(500.0, 500.0), 1000.0, 800.0, &mut rng);
            assert!((12..=19).contains(&contour.len()), "got {} vertices", contour.len());
            seen.insert(contour.len());
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_vertices_within_radius_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let (cx, cy, w, h) = (400.0, 300.0, 600.0, 200.0);
        for _ in 0..50 {
            let contour = generate_contour(Point::new(cx, cy), w, h, &mut rng);
            for p in contour.points() {
                assert!((p.x - cx).abs() <= w * 0.5 + 1e-9);
                assert!((p.y - cy).abs() <= h * 0.5 + 1e-9);
            }
            // Vertex 0 sits at angle 0: straight right of center, 0.3-0.5 of the width away
            let first = contour.points()[0];
            assert!(first.x - cx >= w * 0.3 - 1e-9 && first.x - cx <= w * 0.5 + 1e-9);
            assert!((first.y - cy).abs() < 1e-9);
        }
    }

    #[test]
    fn test_center_is_inside_and_far_points_are_not() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let contour = generate_contour(Point::new(0.0, 0.0), 100.0, 100.0, &mut rng);
            assert!(contour.contains(&Point::new(0.0, 0.0)));
            // Every contour contains the 0.3-radius ellipse around the center
            assert!(contour.contains(&Point::new(10.0, 0.0)));
            assert!(!contour.contains(&Point::new(1000.0, 1000.0)));
        }
    }

    #[test]
    fn test_smoothed_outline_starts_at_first_vertex() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let contour = generate_contour(Point::new(0.0, 0.0), 100.0, 100.0, &mut rng);
        let outline = contour.smoothed_outline();
        assert_eq!(outline[0], contour.points()[0]);
        assert_eq!(outline.len(), 1 + (contour.len() - 1) * CURVE_SEGMENTS);
        // Raw contour is left untouched
        assert!(contour.len() < outline.len());
    }

    #[test]
    fn test_landmass_default_color_and_bad_color() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let land = Landmass::generate(LandmassOptions::new(0.0, 0.0, 10.0, 10.0), &mut rng).unwrap();
        assert_eq!(land.fill, 0xDAC3A7);
        assert!(land.bounds().width > 0.0);

        let mut bad = LandmassOptions::new(0.0, 0.0, 10.0, 10.0);
        bad.color = Some("#12".into());
        assert!(Landmass::generate(bad, &mut rng).is_err());
    }

    #[test]
    fn test_generated_bounds_cover_contour() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let land = Landmass::generate(LandmassOptions::new(300.0, 200.0, 400.0, 100.0), &mut rng).unwrap();
        assert_eq!(Some(land.bounds()), land.contour().bounds());
    }

    #[test]
    fn test_sample_interior_lands_inside() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let land = Landmass::generate(LandmassOptions::new(500.0, 500.0, 800.0, 800.0), &mut rng).unwrap();
        for _ in 0..100 {
            let p = land.sample_interior(&mut rng).unwrap();
            assert!(land.contains(&p));
        }
    }
}
