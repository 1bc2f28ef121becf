//! Mountain range growth
//!
//! A range is a chain of anchors grown from a founding peak along one overall
//! heading. Each new peak is placed relative to the last accepted one; peaks
//! that would fall into the sea are skipped and the chain carries on from the
//! same anchor.

use rand::Rng;
use std::f64::consts::PI;

use crate::geometry::Point;
use crate::landmass::Contour;

/// Chain length is `MIN_LINKS + floor(U * LINK_SPREAD)` link attempts
const MIN_LINKS: usize = 3;
const LINK_SPREAD: f64 = 5.0;

/// Full width of the heading wobble for each link (radians)
const HEADING_WOBBLE: f64 = 0.8;

/// Link distance is `size * (LINK_MIN + U * LINK_JITTER)`
const LINK_MIN: f64 = 0.8;
const LINK_JITTER: f64 = 0.4;

/// Range spacing size is `RANGE_SIZE_MIN + U * RANGE_SIZE_JITTER`
pub const RANGE_SIZE_MIN: f64 = 120.0;
pub const RANGE_SIZE_JITTER: f64 = 40.0;

/// Grow a chain of peaks starting at `seed`.
///
/// The seed is always the first element, whether or not it lies inside the
/// contour; every later element lies inside.
pub fn grow_range(seed: Point, size: f64, contour: &Contour, rng: &mut impl Rng) -> Vec<Point> {
    let mut peaks = vec![seed];

    let links = MIN_LINKS + (rng.gen::<f64>() * LINK_SPREAD).floor() as usize;
    let range_angle = rng.gen::<f64>() * PI * 2.0;

    for _ in 0..links {
        let prev = peaks[peaks.len() - 1];

        let angle = range_angle + (rng.gen::<f64>() - 0.5) * HEADING_WOBBLE;
        let distance = size * (LINK_MIN + rng.gen::<f64>() * LINK_JITTER);
        let candidate = prev.offset_polar(angle, distance);

        if !contour.contains(&candidate) {
            continue;
        }

        peaks.push(candidate);
    }

    peaks
}

/// Random spacing size for a new range
pub fn random_range_size(rng: &mut impl Rng) -> f64 {
    RANGE_SIZE_MIN + rng.gen::<f64>() * RANGE_SIZE_JITTER
}

/// Glyph size for one peak, independent of the chain spacing
pub fn peak_glyph_size(size: f64, rng: &mut impl Rng) -> f64 {
    size * (0.5 + rng.gen::<f64>() * 0.5)
}
