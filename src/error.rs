//! Error types.
//!
//! [`Error`] is the fatal tier: construction or build cannot proceed.
//! [`Invalid`] is the recoverable tier: a field holds a value that blocks building but the
//! project stays usable. Field errors are collected into a [`Validation`].
use crate::*;
use thiserror::Error;

/// Fatal errors raised by construction, loading, or building.
#[derive(Error, Debug)]
pub enum Error {
    #[error("at least two wells are required, found {0}")]
    TooFewWells(usize),

    #[error("a well name must not be empty")]
    EmptyWellName,

    #[error("well '{0}' is defined more than once")]
    DuplicateWell(String),

    #[error("well '{name}' has a non-positive bottom depth {bottom}")]
    NonPositiveBottom { name: String, bottom: f64 },

    #[error("well '{0}' has no geophysical data")]
    NoGeophysicalData(String),

    #[error("geophysical interval {top}..{bottom} is invalid")]
    InvalidInterval { top: f64, bottom: f64 },

    #[error("break '{break_name}' has no depth for well '{well}'")]
    MissingBreakDepth { break_name: String, well: String },

    #[error("break '{break_name}' references unknown well '{well}'")]
    UnknownBreakWell { break_name: String, well: String },

    #[error("break '{0}' is defined more than once")]
    DuplicateBreak(String),

    #[error("section path segment {0} is not anchored by a well")]
    UnanchoredSegment(usize),

    #[error("well '{0}' is not on the section path")]
    WellNotOnPath(String),

    #[error("sampling step {0} must be positive and finite")]
    InvalidStep(f64),

    #[error("a build is already in progress")]
    BuildInProgress,

    #[error("project cannot be built: {0}")]
    NotBuildable(Validation),

    #[error("malformed grid file: {0}")]
    Grid(String),

    #[error("settings document is invalid: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for fatal errors. The error type can be overridden, as geometry constructors do.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The property a field-level error is attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    HorizontalScale,
    VerticalScale,
    Offset,
    HorizontalResolution,
    VerticalResolution,
    Top,
    Bottom,
    DecorationColumnsWidth,
    DecorationHeadersHeight,
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
    TopBreak,
    BottomBreak,
    Text,
    Well,
    ActiveWells,
    StructuralMaps,
    SectionPath,
    OilBearingFormations,
    WellLabels,
    DecorationColumns,
}

/// Recoverable, field-level errors.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum Invalid {
    #[error("scale must be greater than zero")]
    NonPositiveScale,
    #[error("scale must be a finite number")]
    NonFiniteScale,
    #[error("offset must not be negative")]
    NegativeOffset,
    #[error("resolution must be greater than zero")]
    NonPositiveResolution,
    #[error("the upper bound must be above the lower bound")]
    TopNotAboveBottom,
    #[error("the lower bound must be below the upper bound")]
    BottomNotBelowTop,
    #[error("decoration column width must be at least 1 mm")]
    ColumnWidthTooSmall,
    #[error("decoration header height must be at least 1 mm")]
    HeaderHeightTooSmall,
    #[error("a top break must be specified")]
    MissingTopBreak,
    #[error("a bottom break must be specified")]
    MissingBottomBreak,
    #[error("break '{0}' does not exist")]
    UnknownBreak(String),
    #[error("the top break must be above the bottom break")]
    TopBreakNotAbove,
    #[error("the bottom break must be below the top break")]
    BottomBreakNotBelow,
    #[error("label text must not be empty")]
    EmptyText,
    #[error("a well must be specified")]
    MissingWell,
    #[error("well '{0}' does not exist")]
    UnknownWell(String),
    #[error("at least two wells must be enabled")]
    TooFewActiveWells,
    #[error("at least two structural maps must be loaded")]
    TooFewStructuralMaps,
    #[error("a section path must be defined")]
    NoSectionPath,
    #[error("the section path must lie inside structural map '{0}'")]
    PathOutsideMap(String),
    #[error("oil-bearing formation {0} has errors")]
    FormationErrors(usize),
    #[error("well label {0} has errors")]
    LabelErrors(usize),
    #[error("decoration column '{0}' has errors")]
    ColumnErrors(String),
}

/// A set of field-level errors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Validation {
    errors: Vec<(Field, Invalid)>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, invalid: Invalid) {
        self.errors.push((field, invalid));
    }

    /// Push `invalid` against `field` if `cond` is false.
    pub fn ensure(&mut self, cond: bool, field: Field, invalid: Invalid) {
        if !cond {
            self.push(field, invalid);
        }
    }

    /// Merge another set of errors into this one.
    pub fn extend(&mut self, other: Validation) {
        self.errors.extend(other.errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The errors attached to a single field.
    pub fn errors(&self, field: Field) -> impl Iterator<Item = &Invalid> {
        self.errors
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Field, Invalid)> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (field, e)) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{:?}: {}", field, e)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_collects_per_field() {
        let mut v = Validation::new();
        assert!(!v.has_errors());

        v.ensure(true, Field::Top, Invalid::TopNotAboveBottom);
        assert!(v.is_empty());

        v.ensure(false, Field::Top, Invalid::TopNotAboveBottom);
        v.push(Field::Bottom, Invalid::BottomNotBelowTop);
        assert_eq!(v.len(), 2);
        assert_eq!(
            v.errors(Field::Top).collect::<Vec<_>>(),
            vec![&Invalid::TopNotAboveBottom]
        );
        assert_eq!(v.errors(Field::Offset).count(), 0);
        assert_eq!(
            v.to_string(),
            "Top: the upper bound must be above the lower bound; \
             Bottom: the lower bound must be below the upper bound"
        );
    }

    #[test]
    fn fatal_messages() {
        let e = Error::MissingBreakDepth {
            break_name: "P1".into(),
            well: "W2".into(),
        };
        assert_eq!(e.to_string(), "break 'P1' has no depth for well 'W2'");
    }

    #[test]
    fn result_error_defaults_to_fatal() {
        fn fatal() -> Result<u8> {
            Err(Error::BuildInProgress)
        }
        fn geometric() -> Result<u8, &'static str> {
            Polyline2::new([[0.0, 0.0]]).map(|_| 1)
        }

        assert!(matches!(fatal(), Err(Error::BuildInProgress)));
        assert!(geometric().is_err());
        assert!(Polygon2::new([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]).is_ok());
    }
}
