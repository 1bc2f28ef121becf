//! Renderable feature descriptors
//!
//! Generators produce bare point sets; the composer turns them into these
//! descriptors. A renderer only needs to know how to draw a filled polygon, a
//! stroked polyline and a glyph.

use crate::colors::{self, MOUNTAIN_BROWN, OCEAN_BLUE, TREE_GREEN};
use crate::geometry::Point;

/// Flattening resolution for river curves
const RIVER_CURVE_SEGMENTS: usize = 6;

pub const RIVER_STROKE_WIDTH: f64 = 10.0;
pub const RIVER_ALPHA: f32 = 0.85;

pub const MOUNTAIN_CHAR: char = '^';
pub const TREE_CHAR: char = 'T';

/// A single tinted character anchored at its center
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub position: Point,
    pub character: char,
    /// Font size in world units
    pub size: f64,
    pub color: u32,
}

/// Closed filled shape
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    /// Smoothed outline, implicitly closed
    pub outline: Vec<Point>,
    pub fill: u32,
}

/// Open stroked line
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub width: f64,
    pub color: u32,
    pub alpha: f32,
}

/// Everything a world can contain, ready to draw
#[derive(Clone, Debug, PartialEq)]
pub enum Feature {
    Landmass(Polygon),
    River(Polyline),
    Mountain(Glyph),
    Tree(Glyph),
}

impl Feature {
    pub fn landmass(outline: Vec<Point>, fill: u32) -> Self {
        Feature::Landmass(Polygon { outline, fill })
    }

    /// River feature from a raw flow path, or `None` if it is too short to draw
    pub fn river(path: &crate::river::RiverPath) -> Option<Self> {
        if !path.is_renderable() {
            return None;
        }
        Some(Feature::River(Polyline {
            points: path.smoothed(RIVER_CURVE_SEGMENTS),
            width: RIVER_STROKE_WIDTH,
            color: colors::palette(OCEAN_BLUE),
            alpha: RIVER_ALPHA,
        }))
    }

    pub fn mountain(position: Point, size: f64) -> Self {
        Feature::Mountain(Glyph {
            position,
            character: MOUNTAIN_CHAR,
            size,
            color: colors::palette(MOUNTAIN_BROWN),
        })
    }

    pub fn tree(position: Point, size: f64) -> Self {
        Feature::Tree(Glyph {
            position,
            character: TREE_CHAR,
            size,
            color: colors::palette(TREE_GREEN),
        })
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Feature::Landmass(poly) => Some(poly),
            _ => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Feature::River(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_glyph(&self) -> Option<&Glyph> {
        match self {
            Feature::Mountain(glyph) | Feature::Tree(glyph) => Some(glyph),
            _ => None,
        }
    }

    /// Draw layer: land below water below glyphs
    pub fn layer(&self) -> u8 {
        match self {
            Feature::Landmass(_) => 0,
            Feature::River(_) => 1,
            Feature::Mountain(_) | Feature::Tree(_) => 2,
        }
    }

    /// Sort key within a layer; glyphs lower on screen are drawn on top
    pub fn depth(&self) -> f64 {
        self.as_glyph().map_or(0.0, |g| g.position.y)
    }
}

/// Sort features into draw order (stable within equal keys)
pub fn sort_for_drawing(features: &mut [Feature]) {
    features.sort_by(|a, b| {
        a.layer()
            .cmp(&b.layer())
            .then(a.depth().total_cmp(&b.depth()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::river::RiverPath;

    #[test]
    fn test_short_river_is_not_drawn() {
        let path = RiverPath { points: vec![Point::new(1.0, 1.0)], reached_sea: false };
        assert!(Feature::river(&path).is_none());

        let path = RiverPath {
            points: vec![Point::new(1.0, 1.0), Point::new(31.0, 1.0)],
            reached_sea: true,
        };
        let river = Feature::river(&path).unwrap();
        let line = river.as_polyline().unwrap();
        assert_eq!(line.width, RIVER_STROKE_WIDTH);
        assert_eq!(line.color, 0x0051FF);
    }

    #[test]
    fn test_capabilities() {
        let land = Feature::landmass(vec![Point::new(0.0, 0.0)], 0xDAC3A7);
        assert!(land.as_polygon().is_some());
        assert!(land.as_glyph().is_none());

        let tree = Feature::tree(Point::new(3.0, 4.0), 40.0);
        assert_eq!(tree.as_glyph().unwrap().character, 'T');
        assert_eq!(tree.as_glyph().unwrap().color, 0x10924D);
        assert!(tree.as_polyline().is_none());

        let peak = Feature::mountain(Point::new(3.0, 4.0), 80.0);
        assert_eq!(peak.as_glyph().unwrap().character, '^');
    }

    #[test]
    fn test_draw_order() {
        let mut features = vec![
            Feature::tree(Point::new(0.0, 50.0), 32.0),
            Feature::mountain(Point::new(0.0, 10.0), 80.0),
            Feature::landmass(vec![], 0),
            Feature::tree(Point::new(0.0, 20.0), 32.0),
        ];
        sort_for_drawing(&mut features);

        assert!(matches!(features[0], Feature::Landmass(_)));
        let depths: Vec<f64> = features[1..].iter().map(Feature::depth).collect();
        assert_eq!(depths, vec![10.0, 20.0, 50.0]);
    }
}
