use crate::*;
use serde::Serialize;

/// An attribute value attached to a [`Feature`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(x: f64) -> Self {
        AttrValue::Number(x)
    }
}

/// Geometry of an exported feature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Geometry {
    Point(Point2),
    LineString(Vec<Point2>),
    Polygon(Polygon2),
}

impl Geometry {
    /// All the coordinates of the geometry.
    pub fn coords(&self) -> &[Point2] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::LineString(ps) => ps,
            Geometry::Polygon(p) => p.pts(),
        }
    }
}

/// A geometry with named attributes, in insertion order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feature {
    pub geometry: Geometry,
    pub attributes: Vec<(String, AttrValue)>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            attributes: Vec::new(),
        }
    }

    /// Builder style attribute insertion.
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set an attribute, replacing an existing one of the same key.
    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(AttrValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(AttrValue::Number(x)) => Some(*x),
            _ => None,
        }
    }
}

/// A geophysical value sampled at a point of the section.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct GeophysicalSample {
    /// Distance along the section path (m).
    pub x: f64,
    /// Elevation (m).
    pub y: f64,
    /// Drawing x (cm).
    pub scaled_x: f64,
    /// Drawing y (cm).
    pub scaled_y: f64,
    pub value: f64,
}

/// The samples of one well.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WellSamples {
    pub well: String,
    pub samples: Vec<GeophysicalSample>,
}

/// A named group of features, written by exporters as one layer.
#[derive(Debug)]
pub struct FeatureGroup<'a> {
    pub name: &'static str,
    pub features: Vec<&'a Feature>,
}

/// The features of one section build.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildResult {
    /// The settings the build read.
    pub settings: BuildSettings,
    pub geophysical: Vec<WellSamples>,
    pub section_area: Feature,
    pub wells: Vec<Feature>,
    pub structural_maps: Vec<Feature>,
    pub breaks: Vec<Feature>,
    pub well_points: Vec<Feature>,
    pub section_path: Feature,
    pub clip_areas: Vec<Feature>,
    pub decoration_columns: Vec<Feature>,
    pub oil_bearing_formations: Vec<Feature>,
    pub well_labels: Vec<Feature>,
    pub zero_mark: Option<Feature>,
}

impl BuildResult {
    /// The feature groups in export order.
    ///
    /// The zero mark, well labels, and formations groups are only present if non-empty.
    pub fn groups(&self) -> Vec<FeatureGroup<'_>> {
        fn g<'a>(name: &'static str, features: &'a [Feature]) -> FeatureGroup<'a> {
            FeatureGroup {
                name,
                features: features.iter().collect(),
            }
        }

        let mut v = vec![
            g("Wells", &self.wells),
            g("Decoration columns", &self.decoration_columns),
            g("Area", std::slice::from_ref(&self.section_area)),
            g("Structural maps", &self.structural_maps),
            g("Breaks", &self.breaks),
            g("Clip", &self.clip_areas),
            g("Well locations", &self.well_points),
            g("Section path", std::slice::from_ref(&self.section_path)),
        ];

        if let Some(z) = &self.zero_mark {
            v.push(g("Zero mark", std::slice::from_ref(z)));
        }
        if !self.well_labels.is_empty() {
            v.push(g("Well labels", &self.well_labels));
        }
        if !self.oil_bearing_formations.is_empty() {
            v.push(g("Oil-bearing formations", &self.oil_bearing_formations));
        }

        v
    }

    /// The samples of a well, by name.
    pub fn samples(&self, well: &str) -> Option<&[GeophysicalSample]> {
        self.geophysical
            .iter()
            .find(|w| w.well == well)
            .map(|w| w.samples.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes() {
        let mut f = Feature::new(Geometry::Point([1.0, 2.0]))
            .with("Name", "W1")
            .with("Altitude", 12.5);

        assert_eq!(f.get_text("Name"), Some("W1"));
        assert_eq!(f.get_number("Altitude"), Some(12.5));
        assert_eq!(f.get_number("Name"), None);

        f.set("Name", "W2");
        assert_eq!(f.attributes.len(), 2);
        assert_eq!(f.get_text("Name"), Some("W2"));
        assert_eq!(f.geometry.coords(), &[[1.0, 2.0]]);
    }
}
