//! Error types for the configuration and export surfaces.
//!
//! Generation itself never fails: omitted features are logged and counted.

use thiserror::Error;

/// Errors raised while loading options, parsing colors or writing output.
#[derive(Error, Debug)]
pub enum WorldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid options file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Window error: {0}")]
    Window(#[from] minifb::Error),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("Invalid world options: {0}")]
    InvalidOptions(String),
}

/// Errors from parsing `#RRGGBB` color strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color {0:?} must have exactly 6 hex digits")]
    Length(String),
    #[error("color {0:?} contains a non-hex digit")]
    Digit(String),
}

pub type Result<T> = std::result::Result<T, WorldError>;
