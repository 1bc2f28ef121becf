//! Seed management for world generation
//!
//! Each generator draws from its own random stream, derived from a master seed,
//! so changing how many rivers are grown does not reshuffle the forests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for all world generation systems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Option resolution (sampled counts, landmass placement)
    pub layout: u64,
    /// Landmass contours
    pub landmass: u64,
    pub rivers: u64,
    pub mountains: u64,
    pub forests: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            layout: derive_seed(master, "layout"),
            landmass: derive_seed(master, "landmass"),
            rivers: derive_seed(master, "rivers"),
            mountains: derive_seed(master, "mountains"),
            forests: derive_seed(master, "forests"),
        }
    }

    /// Fresh, unpredictable seeds
    pub fn random() -> Self {
        Self::from_master(rand::random())
    }

    pub fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self::random()
    }
}

/// Derive a sub-seed from a master seed and a system name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}
