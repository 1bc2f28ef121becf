//! World generation options
//!
//! One configuration surface covers both historical setups: explicit feature
//! counts or randomized count ranges, and a landmass count or an explicit list
//! of landmass placements. Anything left unset falls back to a randomized range.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, WorldError};
use crate::landmass::LandmassOptions;

/// A feature count: either a fixed (possibly fractional) number or a range
/// sampled uniformly once per generation cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Exact(f64),
    Range { min: f64, max: f64 },
}

/// Ceiling for any count or range maximum; larger values are rejected
pub const MAX_COUNT: f64 = 1000.0;

impl Count {
    pub const fn range(min: f64, max: f64) -> Self {
        Count::Range { min, max }
    }

    /// Draw the count for one cycle
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        match *self {
            Count::Exact(n) => n,
            Count::Range { min, max } => min + rng.gen::<f64>() * (max - min),
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        let ok = match *self {
            Count::Exact(n) => n.is_finite() && (0.0..=MAX_COUNT).contains(&n),
            Count::Range { min, max } => {
                min.is_finite() && max.is_finite() && min >= 0.0 && min <= max && max <= MAX_COUNT
            }
        };
        if ok {
            Ok(())
        } else {
            Err(WorldError::InvalidOptions(format!(
                "{} count {:?} must be within 0..={} with min <= max",
                name, self, MAX_COUNT
            )))
        }
    }
}

impl From<usize> for Count {
    fn from(n: usize) -> Self {
        Count::Exact(n as f64)
    }
}

/// Number of generator runs for a sampled count.
///
/// A fractional count runs like `for i in 0.. while i < n`, so 2.3 gives 3 runs.
pub fn iterations(count: f64) -> usize {
    if count.is_finite() && count > 0.0 {
        count.ceil() as usize
    } else {
        0
    }
}

pub const DEFAULT_LANDMASSES: Count = Count::Exact(1.0);
pub const DEFAULT_RIVERS: Count = Count::range(0.0, 7.0);
pub const DEFAULT_MOUNTAIN_RANGES: Count = Count::range(2.0, 10.0);
pub const DEFAULT_FORESTS: Count = Count::range(1.0, 10.0);

/// Landmass size as a fraction of the world size, sampled per axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub x: Count,
    pub y: Count,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            x: Count::range(0.8, 1.0),
            y: Count::range(0.8, 1.0),
        }
    }
}

/// Options for one populate cycle. Never mutated during generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldOptions {
    pub landmasses: Option<Count>,
    /// Explicit placements; takes precedence over `landmasses` when non-empty
    pub landmass_options_list: Option<Vec<LandmassOptions>>,
    pub rivers: Option<Count>,
    pub mountain_ranges: Option<Count>,
    pub forests: Option<Count>,
    pub landmass_scale: ScaleRange,
}

/// Concrete plan for one cycle after all ranges have been sampled
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOptions {
    pub landmasses: Vec<LandmassOptions>,
    pub rivers: usize,
    pub mountain_ranges: usize,
    pub forests: usize,
}

impl WorldOptions {
    /// Explicit counts for every feature, one landmass
    pub fn with_counts(rivers: usize, mountain_ranges: usize, forests: usize) -> Self {
        Self {
            landmasses: Some(Count::from(1)),
            rivers: Some(rivers.into()),
            mountain_ranges: Some(mountain_ranges.into()),
            forests: Some(forests.into()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: WorldOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("landmasses", self.landmasses),
            ("rivers", self.rivers),
            ("mountain_ranges", self.mountain_ranges),
            ("forests", self.forests),
        ];
        for (name, count) in counts {
            if let Some(count) = count {
                count.validate(name)?;
            }
        }

        self.landmass_scale.x.validate("landmass_scale.x")?;
        self.landmass_scale.y.validate("landmass_scale.y")?;

        for land in self.landmass_options_list.iter().flatten() {
            if !(land.width > 0.0 && land.height > 0.0) {
                return Err(WorldError::InvalidOptions(format!(
                    "landmass at ({}, {}) must have a positive size, got {}x{}",
                    land.x, land.y, land.width, land.height
                )));
            }
            land.fill_color()?;
        }

        Ok(())
    }

    /// Sample every range and lay out the landmasses for a world of the given size.
    ///
    /// A world always has at least one landmass.
    pub fn resolve(&self, world_width: f64, world_height: f64, rng: &mut impl Rng) -> ResolvedOptions {
        let landmasses = match &self.landmass_options_list {
            Some(list) if !list.is_empty() => list.clone(),
            _ => {
                let count = iterations(self.landmasses.unwrap_or(DEFAULT_LANDMASSES).sample(rng)).max(1);
                self.place_landmasses(count, world_width, world_height, rng)
            }
        };

        ResolvedOptions {
            landmasses,
            rivers: iterations(self.rivers.unwrap_or(DEFAULT_RIVERS).sample(rng)),
            mountain_ranges: iterations(self.mountain_ranges.unwrap_or(DEFAULT_MOUNTAIN_RANGES).sample(rng)),
            forests: iterations(self.forests.unwrap_or(DEFAULT_FORESTS).sample(rng)),
        }
    }

    fn place_landmasses(&self, count: usize, world_width: f64, world_height: f64, rng: &mut impl Rng) -> Vec<LandmassOptions> {
        if count == 1 {
            let width = world_width * self.landmass_scale.x.sample(rng);
            let height = world_height * self.landmass_scale.y.sample(rng);
            return vec![LandmassOptions::new(world_width / 2.0, world_height / 2.0, width, height)];
        }

        // Several islands share the frame, so each one shrinks with the count
        let shrink = (count as f64).sqrt();
        (0..count)
            .map(|_| {
                let x = world_width * (0.25 + rng.gen::<f64>() * 0.5);
                let y = world_height * (0.25 + rng.gen::<f64>() * 0.5);
                let width = world_width * self.landmass_scale.x.sample(rng) / shrink;
                let height = world_height * self.landmass_scale.y.sample(rng) / shrink;
                LandmassOptions::new(x, y, width, height)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fractional_iterations() {
        assert_eq!(iterations(0.0), 0);
        assert_eq!(iterations(-1.0), 0);
        assert_eq!(iterations(3.0), 3);
        assert_eq!(iterations(2.3), 3);
        assert_eq!(iterations(0.01), 1);
        assert_eq!(iterations(f64::NAN), 0);
    }

    #[test]
    fn test_explicit_counts_resolve_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let resolved = WorldOptions::with_counts(3, 5, 3).resolve(1000.0, 1000.0, &mut rng);
        assert_eq!(resolved.rivers, 3);
        assert_eq!(resolved.mountain_ranges, 5);
        assert_eq!(resolved.forests, 3);
        assert_eq!(resolved.landmasses.len(), 1);
        assert_eq!(resolved.landmasses[0].center(), crate::geometry::Point::new(500.0, 500.0));
    }

    #[test]
    fn test_unset_counts_use_default_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..200 {
            let r = WorldOptions::default().resolve(1000.0, 1000.0, &mut rng);
            assert!(r.rivers <= 7);
            assert!((2..=10).contains(&r.mountain_ranges));
            assert!((1..=10).contains(&r.forests));
            let land = &r.landmasses[0];
            assert!((800.0..=1000.0).contains(&land.width));
            assert!((800.0..=1000.0).contains(&land.height));
        }
    }

    #[test]
    fn test_parse_json_with_ranges_and_list() {
        let json = r##"{
            "rivers": 4,
            "mountain_ranges": { "min": 1, "max": 3 },
            "landmass_options_list": [
                { "x": 300, "y": 400, "width": 200, "height": 300 },
                { "x": 700, "y": 500, "width": 250, "height": 250, "color": "#C2B280" }
            ]
        }"##;
        let options = WorldOptions::from_json_str(json).unwrap();
        assert_eq!(options.rivers, Some(Count::Exact(4.0)));
        assert_eq!(options.mountain_ranges, Some(Count::range(1.0, 3.0)));
        assert!(options.forests.is_none());

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let resolved = options.resolve(1000.0, 1000.0, &mut rng);
        assert_eq!(resolved.landmasses.len(), 2);
        assert_eq!(resolved.landmasses[1].fill_color().unwrap(), 0xC2B280);
        assert!((1..=3).contains(&resolved.mountain_ranges));
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(WorldOptions::from_json_str(r#"{ "rivers": -2 }"#).is_err());
        assert!(WorldOptions::from_json_str(r#"{ "forests": { "min": 5, "max": 1 } }"#).is_err());
        assert!(WorldOptions::from_json_str(
            r#"{ "landmass_options_list": [{ "x": 0, "y": 0, "width": 0, "height": 10 }] }"#
        )
        .is_err());
        assert!(WorldOptions::from_json_str(
            r#"{ "landmass_options_list": [{ "x": 0, "y": 0, "width": 5, "height": 10, "color": "blue" }] }"#
        )
        .is_err());
        assert!(WorldOptions::from_json_str("not json").is_err());
    }

    #[test]
    fn test_oversized_counts_rejected() {
        for json in [
            r#"{ "landmasses": 1e15 }"#,
            r#"{ "rivers": 1e12 }"#,
            r#"{ "mountain_ranges": { "min": 1, "max": 1e9 } }"#,
            r#"{ "forests": 1001 }"#,
        ] {
            assert!(
                matches!(WorldOptions::from_json_str(json), Err(WorldError::InvalidOptions(_))),
                "accepted {}",
                json
            );
        }

        let options = WorldOptions { rivers: Some(Count::Exact(1e15)), ..WorldOptions::default() };
        assert!(options.validate().is_err());
        assert!(WorldOptions::from_json_str(r#"{ "forests": 1000 }"#).is_ok());
    }

    #[test]
    fn test_multiple_landmasses_shrink() {
        let options = WorldOptions { landmasses: Some(Count::Exact(4.0)), ..WorldOptions::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let resolved = options.resolve(1000.0, 1000.0, &mut rng);
        assert_eq!(resolved.landmasses.len(), 4);
        for land in &resolved.landmasses {
            assert!(land.width <= 500.0 && land.height <= 500.0);
            assert!((250.0..=750.0).contains(&land.x));
        }
    }
}
