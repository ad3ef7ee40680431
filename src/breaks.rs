use crate::*;

/// A stratigraphic break: one relative depth per well.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Break {
    name: String,
    /// Relative depths, keyed by well name, in input order.
    values: Vec<(String, f64)>,
    /// Elevations (`altitude - depth`), parallel to `values`.
    absolute: Vec<f64>,
}

impl Break {
    /// Create a break from `(well name, relative depth)` pairs.
    ///
    /// Every named well must exist in `wells`. Completeness (an entry for _every_ well) is
    /// checked by the owning [`BuildProject`].
    pub fn new<N, I, S>(name: N, values: I, wells: &[Well]) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let name = name.into();
        let values = values
            .into_iter()
            .map(|(w, d)| (w.into(), d))
            .collect::<Vec<(String, f64)>>();

        let absolute = values
            .iter()
            .map(|(w, d)| {
                well_by_name(wells, w)
                    .map(|well| well.altitude() - d)
                    .ok_or_else(|| Error::UnknownBreakWell {
                        break_name: name.clone(),
                        well: w.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            values,
            absolute,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative depth at a well, matching the well name case-insensitively.
    pub fn get(&self, well_name: &str) -> Option<f64> {
        let well_name = well_name.to_lowercase();
        self.values
            .iter()
            .find(|(w, _)| w.to_lowercase() == well_name)
            .map(|(_, d)| *d)
    }

    /// Relative depths keyed by well name.
    pub fn values(&self) -> impl ExactSizeIterator<Item = (&str, f64)> {
        self.values.iter().map(|(w, d)| (w.as_str(), *d))
    }

    /// Elevations keyed by well name.
    pub fn absolute_values(&self) -> impl ExactSizeIterator<Item = (&str, f64)> {
        self.values
            .iter()
            .zip(&self.absolute)
            .map(|((w, _), a)| (w.as_str(), *a))
    }

    /// Elevation of the break at the named well.
    pub fn absolute_value(&self, well_name: &str) -> Option<f64> {
        self.values
            .iter()
            .zip(&self.absolute)
            .find(|((w, _), _)| w == well_name)
            .map(|(_, a)| *a)
    }

    pub fn has_well(&self, well_name: &str) -> bool {
        self.values.iter().any(|(w, _)| w == well_name)
    }

    /// Mean of the relative depths.
    pub fn average_relative(&self) -> f64 {
        mean(self.values.iter().map(|(_, d)| *d))
    }

    /// Mean of the elevations.
    pub fn average_absolute(&self) -> f64 {
        mean(self.absolute.iter().copied())
    }
}

impl fmt::Display for Break {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

pub(crate) fn mean(xs: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = xs.fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    sum / n as f64
}
