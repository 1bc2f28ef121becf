//! River path growth
//!
//! A river starts from an inland source near the middle of the landmass and
//! walks in fixed-length steps along one overall flow direction, wobbling on
//! every step, until it leaves the contour (reaches the sea) or runs out of
//! steps.

use rand::Rng;
use std::f64::consts::PI;

use crate::geometry::{self, Bounds, Point};
use crate::landmass::{self, Contour};

/// Parameters controlling river growth
#[derive(Clone, Debug)]
pub struct RiverParams {
    /// Distance travelled per step (world units)
    pub step_size: f64,
    /// Maximum number of steps after the source
    pub max_steps: usize,
    /// Full width of the per-step wobble around the flow angle (radians)
    pub wobble: f64,
    /// Sources are drawn from `[margin, 1 - margin]` of the bounds on each axis
    pub source_margin: f64,
    /// Attempts at finding an inland source before the river is dropped
    pub source_attempts: usize,
}

impl Default for RiverParams {
    fn default() -> Self {
        Self {
            step_size: 30.0,
            max_steps: 40,
            wobble: 3.2,
            source_margin: 0.25,
            source_attempts: geometry::MAX_SAMPLE_ATTEMPTS,
        }
    }
}

/// Ordered flow path from source to mouth
#[derive(Clone, Debug, PartialEq)]
pub struct RiverPath {
    pub points: Vec<Point>,
    /// The final point lies outside the contour
    pub reached_sea: bool,
}

impl RiverPath {
    pub fn source(&self) -> Point {
        self.points[0]
    }

    /// A path needs at least two points to be drawn
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Smoothed polyline for drawing: interior points act as quadratic
    /// control points ending at the midpoint to their successor, and the
    /// last stretch runs straight to the mouth.
    pub fn smoothed(&self, segments: usize) -> Vec<Point> {
        let Some(&first) = self.points.first() else {
            return Vec::new();
        };

        let mut line = vec![first];
        let mut cursor = first;
        let n = self.points.len();
        for i in 1..n.saturating_sub(1) {
            let curr = self.points[i];
            let next = self.points[i + 1];
            let end = curr.midpoint(&next);
            landmass::flatten_quadratic(&mut line, cursor, curr, end, segments);
            cursor = end;
        }
        if n >= 2 {
            line.push(self.points[n - 1]);
        }

        line
    }
}

/// Pick an inland source from the central region of `bounds`
fn find_source(contour: &Contour, bounds: &Bounds, params: &RiverParams, rng: &mut impl Rng) -> Option<Point> {
    let span = 1.0 - 2.0 * params.source_margin;
    geometry::sample_within(params.source_attempts, || {
        let u = params.source_margin + rng.gen::<f64>() * span;
        let v = params.source_margin + rng.gen::<f64>() * span;
        let p = bounds.lerp(u, v);
        contour.contains(&p).then_some(p)
    })
}

/// Grow one river with the default parameters.
///
/// Returns `None` when no inland source could be found.
pub fn grow_river(contour: &Contour, bounds: &Bounds, rng: &mut impl Rng) -> Option<RiverPath> {
    grow_river_with(contour, bounds, &RiverParams::default(), rng)
}

pub fn grow_river_with(
    contour: &Contour,
    bounds: &Bounds,
    params: &RiverParams,
    rng: &mut impl Rng,
) -> Option<RiverPath> {
    let source = find_source(contour, bounds, params, rng)?;
    let mut points = vec![source];
    let mut reached_sea = false;

    let flow_angle = rng.gen::<f64>() * PI * 2.0;

    for _ in 0..params.max_steps {
        let prev = points[points.len() - 1];

        let wobble = (rng.gen::<f64>() - 0.5) * params.wobble;
        let next = prev.offset_polar(flow_angle + wobble, params.step_size);
        points.push(next);

        if !contour.contains(&next) {
            reached_sea = true;
            break;
        }
    }

    Some(RiverPath { points, reached_sea })
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
    fn test_river_starts_inside_and_only_last_point_exits() {
        let contour = square_contour(1000.0);
        let bounds = contour.bounds().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let river = grow_river(&contour, &bounds, &mut rng).expect("square always has a source");
            assert!(contour.contains(&river.source()));
            assert!(river.points.len() <= 41);

            let (last, body) = river.points.split_last().unwrap();
            assert!(body.iter().all(|p| contour.contains(p)));
            assert_eq!(river.reached_sea, !contour.contains(last));
        }
    }

    #[test]
    fn test_source_drawn_from_central_region() {
        let contour = square_contour(1000.0);
        let bounds = contour.bounds().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        for _ in 0..100 {
            let source = grow_river(&contour, &bounds, &mut rng).unwrap().source();
            assert!((250.0..=750.0).contains(&source.x));
            assert!((250.0..=750.0).contains(&source.y));
        }
    }

    #[test]
    fn test_steps_have_fixed_length() {
        let contour = square_contour(1000.0);
        let bounds = contour.bounds().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let river = grow_river(&contour, &bounds, &mut rng).unwrap();
        for pair in river.points.windows(2) {
            assert!((pair[0].distance(&pair[1]) - 30.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_small_island_reaches_sea_quickly() {
        let contour = square_contour(50.0);
        let bounds = contour.bounds().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let river = grow_river(&contour, &bounds, &mut rng).unwrap();
        // Drift along the flow angle carries the river out long before 40 steps
        assert!(river.reached_sea);
        assert!(river.is_renderable());
    }

    #[test]
    fn test_no_source_means_no_river() {
        // Contour lying entirely outside the sampled bounds
        let contour = square_contour(10.0);
        let bounds = Bounds::new(500.0, 500.0, 100.0, 100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(grow_river(&contour, &bounds, &mut rng).is_none());
    }

    #[test]
    fn test_step_budget_caps_length() {
        let contour = square_contour(1_000_000.0);
        let bounds = contour.bounds().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let river = grow_river(&contour, &bounds, &mut rng).unwrap();
        assert_eq!(river.points.len(), 41);
        assert!(!river.reached_sea);
    }

    #[test]
    fn test_smoothed_ends_at_mouth() {
        let path = RiverPath {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 10.0)],
            reached_sea: true,
        };
        let line = path.smoothed(4);
        assert_eq!(line.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(line.last(), Some(&Point::new(20.0, 10.0)));
        assert_eq!(line.len(), 1 + 4 + 1);
    }
}
