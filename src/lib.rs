//! Geological cross-section construction.
//!
//! Wells, stratigraphic breaks and structural maps are projected along a section path onto a
//! scaled drawing plane. The entry point is [`BuildProject`], which owns the inputs, keeps the
//! derived quantities current, and produces a [`BuildResult`] on demand.
use rustc_hash::FxHashMap as HashMap;
use std::{fmt, iter::FromIterator};

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

mod breaks;
mod decoration;
mod error;
mod extents;
mod formation;
mod graph;
mod grid;
mod interp;
#[cfg(feature = "io")]
pub mod io;
mod label;
mod path;
mod point;
pub mod polygon;
mod polyline;
mod project;
mod result;
mod section;
mod settings;
mod structural_map;
mod well;

pub use breaks::*;
pub use decoration::*;
pub use error::*;
pub use extents::*;
pub use formation::*;
pub use graph::*;
pub use grid::*;
pub use interp::*;
pub use label::*;
pub use path::*;
pub use point::*;
pub use polygon::*;
pub use polyline::*;
pub use project::*;
pub use result::*;
pub use settings::*;
pub use structural_map::*;
pub use well::*;

/// Centimetres in a metre. Drawing-plane coordinates are in centimetres.
pub const CM_PER_M: f64 = 100.0;

pub trait Envelops<O> {
    fn envelops(&self, object: O) -> bool;
}

/// A plane surface, `z = a + bx + cy`, sampled onto a grid covering `[0, 1000]²` at 100 m.
#[cfg(test)]
fn dummy_map(name: &str, a: f64, b: f64, c: f64) -> StructuralMap {
    let mut g = Grid::new([0.0, 0.0], 11, 11, [100.0, 100.0]);
    for y in 0..11 {
        for x in 0..11 {
            let [px, py] = g.get_xy(x, y);
            g.set(x, y, a + b * px + c * py);
        }
    }
    StructuralMap::new(name, g)
}

#[cfg(test)]
fn dummy_well(name: &str, location: Point2, altitude: f64) -> Well {
    Well::new(
        name,
        altitude,
        location,
        2000.0,
        vec![GeophysicalData::new(altitude, 0.0, 2000.0, 1.0).unwrap()],
        true,
    )
    .unwrap()
}
