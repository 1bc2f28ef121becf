//! Procedural landmass generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod colors;
pub mod error;
pub mod feature;
pub mod forest;
pub mod geometry;
pub mod landmass;
pub mod mountain;
pub mod options;
pub mod render;
pub mod river;
pub mod seeds;
pub mod viewer;
pub mod world;
