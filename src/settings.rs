use crate::*;
use serde::{Deserialize, Serialize};

/// Where a decoration column (or the depth ruler) is drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationColumnMode {
    None,
    Left,
    Right,
    #[default]
    LeftAndRight,
}

impl DecorationColumnMode {
    pub fn has_left(self) -> bool {
        matches!(self, Self::Left | Self::LeftAndRight)
    }

    pub fn has_right(self) -> bool {
        matches!(self, Self::Right | Self::LeftAndRight)
    }

    /// The number of strips the column occupies.
    pub fn count(self) -> usize {
        self.has_left() as usize + self.has_right() as usize
    }
}

/// Parameters of a section build.
///
/// Lengths are in metres unless stated. Drawing-plane sizes (`decoration_columns_width`,
/// `decoration_headers_height`) are in centimetres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Drawing metres per real metre along the section.
    pub horizontal_scale: f64,
    /// Drawing metres per real metre of elevation.
    pub vertical_scale: f64,
    /// Distance the section extends beyond the end wells.
    pub offset: f64,
    /// If true, `offset` is a drawing distance, otherwise a real one.
    pub offset_scaled: bool,
    /// Sampling points per drawing centimetre along the section.
    pub horizontal_resolution: u32,
    /// Sampling points per drawing centimetre of elevation.
    pub vertical_resolution: u32,
    /// Upper elevation of the drawn area.
    pub top: f64,
    /// Lower elevation of the drawn area.
    pub bottom: f64,
    pub decoration_columns_width: f64,
    pub decoration_headers_height: f64,
    /// Text encoding label handed to exporters.
    pub encoding: String,
    pub depth_column_mode: DecorationColumnMode,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            offset: 0.0,
            offset_scaled: false,
            horizontal_resolution: 10,
            vertical_resolution: 10,
            top: 0.0,
            bottom: 0.0,
            decoration_columns_width: 1.0,
            decoration_headers_height: 4.0,
            encoding: "windows-1251".to_string(),
            depth_column_mode: DecorationColumnMode::LeftAndRight,
        }
    }
}

impl BuildSettings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Settings(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Settings(e.to_string()))
    }

    /// Offset as a drawing distance.
    pub fn scaled_offset(&self) -> f64 {
        if self.offset_scaled {
            self.offset
        } else {
            self.offset * self.horizontal_scale
        }
    }

    /// Offset as a real distance.
    pub fn unscaled_offset(&self) -> f64 {
        if self.offset_scaled {
            self.offset / self.horizontal_scale
        } else {
            self.offset
        }
    }

    /// Switch the offset interpretation, converting the stored value so that the effective
    /// offset does not change.
    pub fn set_offset_scaled(&mut self, scaled: bool) {
        if scaled == self.offset_scaled {
            return;
        }
        self.offset_scaled = scaled;
        if scaled {
            self.offset *= self.horizontal_scale;
        } else {
            self.offset /= self.horizontal_scale;
        }
    }

    /// Real distance between horizontal samples.
    pub fn horizontal_step(&self) -> f64 {
        (CM_PER_M * self.horizontal_resolution as f64 * self.horizontal_scale).recip()
    }

    /// Real elevation difference between vertical samples.
    pub fn vertical_step(&self) -> f64 {
        (CM_PER_M * self.vertical_resolution as f64 * self.vertical_scale).recip()
    }

    /// Transform a distance along the section into a drawing x (cm).
    ///
    /// `left_width` is the width (cm) of the decoration columns left of the main area.
    pub fn to_section_x(&self, len: f64, left_width: f64) -> f64 {
        len * self.horizontal_scale * CM_PER_M + left_width
    }

    /// Transform an elevation into a drawing y (cm). The settings' bottom maps to zero.
    pub fn to_section_y(&self, value: f64) -> f64 {
        (value - self.bottom) * self.vertical_scale * CM_PER_M
    }

    pub fn validate(&self) -> Validation {
        use Field::*;
        use Invalid::*;

        let mut v = Validation::new();

        for (field, scale) in [
            (HorizontalScale, self.horizontal_scale),
            (VerticalScale, self.vertical_scale),
        ] {
            v.ensure(scale > 0.0, field, NonPositiveScale);
            v.ensure(scale.is_finite(), field, NonFiniteScale);
        }

        v.ensure(self.offset >= 0.0, Offset, NegativeOffset);
        v.ensure(
            self.horizontal_resolution > 0,
            HorizontalResolution,
            NonPositiveResolution,
        );
        v.ensure(
            self.vertical_resolution > 0,
            VerticalResolution,
            NonPositiveResolution,
        );
        v.ensure(self.top > self.bottom, Top, TopNotAboveBottom);
        v.ensure(self.bottom < self.top, Bottom, BottomNotBelowTop);
        v.ensure(
            self.decoration_columns_width >= 0.1,
            DecorationColumnsWidth,
            ColumnWidthTooSmall,
        );
        v.ensure(
            self.decoration_headers_height >= 0.1,
            DecorationHeadersHeight,
            HeaderHeightTooSmall,
        );

        v
    }
}
