use crate::*;
use serde::{Deserialize, Serialize};

/// An oil-bearing formation: the layer between two breaks, referenced by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OilBearingFormation {
    pub top_break: Option<String>,
    pub bottom_break: Option<String>,
}

impl OilBearingFormation {
    pub fn new(top_break: impl Into<String>, bottom_break: impl Into<String>) -> Self {
        Self {
            top_break: Some(top_break.into()),
            bottom_break: Some(bottom_break.into()),
        }
    }

    /// Validate against the project's breaks.
    ///
    /// The top break's mean relative depth must be shallower than the bottom break's.
    pub fn validate(&self, breaks: &[Break]) -> Validation {
        use Field::*;
        use Invalid::*;

        let mut v = Validation::new();

        let find = |name: &Option<String>, field: Field, missing: Invalid| match name {
            None => Err((field, missing)),
            Some(n) => breaks
                .iter()
                .find(|b| b.name() == n.as_str())
                .ok_or_else(|| (field, UnknownBreak(n.clone()))),
        };

        let top = find(&self.top_break, TopBreak, MissingTopBreak);
        let bottom = find(&self.bottom_break, BottomBreak, MissingBottomBreak);

        match (top, bottom) {
            (Ok(top), Ok(bottom)) => {
                let (t, b) = (top.average_relative(), bottom.average_relative());
                v.ensure(t < b, TopBreak, TopBreakNotAbove);
                v.ensure(b > t, BottomBreak, BottomBreakNotBelow);
            }
            (top, bottom) => {
                for (field, e) in [top.err(), bottom.err()].into_iter().flatten() {
                    v.push(field, e);
                }
            }
        }

        v
    }
}
