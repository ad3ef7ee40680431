//! Readers and writers of grid files holding structural maps.
use crate::*;
use byteorder::*;
use std::io::{Cursor, Read};

pub mod grid;

/// Decoding result; errors are converted to [`Error::Grid`] at the module boundary.
type DeResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Node value Surfer uses to mark a blank.
pub const SURFER_BLANK: f64 = 1.70141e38;

fn grid_err(e: impl fmt::Display) -> Error {
    Error::Grid(e.to_string())
}
