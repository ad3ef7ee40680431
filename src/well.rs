use crate::*;

/// A geophysical measurement over a depth interval of a well.
///
/// Depths are relative to the well's reference point, positive down.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeophysicalData {
    well_altitude: f64,
    top: f64,
    bottom: f64,
    value: f64,
}

impl GeophysicalData {
    /// Fails if either depth is negative or the interval is empty or inverted.
    pub fn new(well_altitude: f64, top: f64, bottom: f64, value: f64) -> Result<Self> {
        if top < 0.0 || bottom < 0.0 || top >= bottom {
            return Err(Error::InvalidInterval { top, bottom });
        }

        Ok(Self {
            well_altitude,
            top,
            bottom,
            value,
        })
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Elevation of the interval top.
    pub fn absolute_top(&self) -> f64 {
        self.well_altitude - self.top
    }

    /// Elevation of the interval bottom.
    pub fn absolute_bottom(&self) -> f64 {
        self.well_altitude - self.bottom
    }

    /// Returns if the elevation `y` lies within the interval, inclusive.
    pub fn brackets(&self, y: f64) -> bool {
        self.absolute_bottom() <= y && self.absolute_top() >= y
    }
}

/// A well.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Well {
    name: String,
    altitude: f64,
    location: Point2,
    bottom: f64,
    geophysical_data: Vec<GeophysicalData>,
    enabled: bool,
}

impl Well {
    pub fn new<N, G>(
        name: N,
        altitude: f64,
        location: Point2,
        bottom: f64,
        geophysical_data: G,
        enabled: bool,
    ) -> Result<Self>
    where
        N: Into<String>,
        G: IntoIterator<Item = GeophysicalData>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyWellName);
        }
        if !(bottom > 0.0) {
            return Err(Error::NonPositiveBottom { name, bottom });
        }
        let geophysical_data = geophysical_data.into_iter().collect::<Vec<_>>();
        if geophysical_data.is_empty() {
            return Err(Error::NoGeophysicalData(name));
        }

        Ok(Self {
            name,
            altitude,
            location,
            bottom,
            geophysical_data,
            enabled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elevation of the well's reference point.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn location(&self) -> Point2 {
        self.location
    }

    /// Total depth.
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn geophysical_data(&self) -> &[GeophysicalData] {
        &self.geophysical_data
    }

    /// The value of the first interval bracketing the elevation `y`.
    pub fn geophysical_value(&self, y: f64) -> Option<f64> {
        self.geophysical_data
            .iter()
            .find(|d| d.brackets(y))
            .map(GeophysicalData::value)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Find a well by exact name.
pub fn well_by_name<'a>(wells: &'a [Well], name: &str) -> Option<&'a Well> {
    wells.iter().find(|w| w.name == name)
}
