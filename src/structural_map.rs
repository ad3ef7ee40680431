use crate::*;
use std::path::{Path, PathBuf};

/// A structural map: a gridded elevation surface of a stratigraphic horizon.
///
/// All elevations are reported _below sea level_; source magnitudes are forced negative.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuralMap {
    name: String,
    path: Option<PathBuf>,
    grid: Grid,
    min: f64,
    max: f64,
}

impl StructuralMap {
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        let (min, max) = grid
            .values()
            .map(|z| normalise(*z))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
                (lo.min(z), hi.max(z))
            });

        Self {
            name: name.into(),
            path: None,
            grid,
            min,
            max,
        }
    }

    /// Load a map from a grid file. The map is named after the file stem.
    #[cfg(feature = "io")]
    pub fn from_grid_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let grid = io::grid::from_grid_bytes(&bytes)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::debug!(
            "loaded structural map '{}' ({}x{} nodes)",
            name,
            grid.x_count(),
            grid.y_count()
        );

        Ok(Self::new(name, grid).with_path(path))
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the map was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Elevation at a plan location. `NaN` if the grid has no data around `p`.
    pub fn get_z(&self, p: Point2) -> f64 {
        match self.grid.sample(p) {
            Some(z) => normalise(z),
            None => {
                log::trace!("structural map '{}' has no data at {:?}", self.name, p);
                f64::NAN
            }
        }
    }

    /// Normalised node values.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.grid.values().map(|z| normalise(*z))
    }

    /// The lowest normalised value.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// The highest normalised value.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// The plan area covered by the grid.
    pub fn envelope(&self) -> Extents2 {
        self.grid.extents()
    }
}

impl fmt::Display for StructuralMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn normalise(z: f64) -> f64 {
    -z.abs()
}
