use crate::*;
use serde::{Deserialize, Serialize};

/// A text annotation on a well, spanning an elevation range (m).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WellLabel {
    pub well: String,
    pub top: f64,
    pub bottom: f64,
    pub text: String,
}

impl WellLabel {
    pub fn new(well: impl Into<String>, top: f64, bottom: f64, text: impl Into<String>) -> Self {
        Self {
            well: well.into(),
            top,
            bottom,
            text: text.into(),
        }
    }

    pub fn validate(&self, wells: &[Well]) -> Validation {
        let mut v = Validation::new();

        v.ensure(!self.text.trim().is_empty(), Field::Text, Invalid::EmptyText);
        if self.well.trim().is_empty() {
            v.push(Field::Well, Invalid::MissingWell);
        } else {
            v.ensure(
                well_by_name(wells, &self.well).is_some(),
                Field::Well,
                Invalid::UnknownWell(self.well.clone()),
            );
        }
        v.ensure(self.top > self.bottom, Field::Top, Invalid::TopNotAboveBottom);
        v.ensure(
            self.bottom < self.top,
            Field::Bottom,
            Invalid::BottomNotBelowTop,
        );

        v
    }

    /// Returns if any part of the label lies within the open elevation window.
    pub fn is_visible(&self, settings: &BuildSettings) -> bool {
        self.top > settings.bottom && self.bottom < settings.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_validation() {
        let wells = vec![dummy_well("W1", [0.0, 0.0], 10.0)];

        assert!(!WellLabel::new("W1", -5.0, -10.0, "oil")
            .validate(&wells)
            .has_errors());

        let v = WellLabel::new("", -10.0, -5.0, " ").validate(&wells);
        assert_eq!(v.len(), 4);
        assert_eq!(
            v.errors(Field::Well).collect::<Vec<_>>(),
            vec![&Invalid::MissingWell]
        );

        let v = WellLabel::new("W9", -5.0, -10.0, "oil").validate(&wells);
        assert_eq!(
            v.errors(Field::Well).collect::<Vec<_>>(),
            vec![&Invalid::UnknownWell("W9".into())]
        );
    }

    #[test]
    fn visibility_window() {
        let s = BuildSettings {
            top: 0.0,
            bottom: -100.0,
            ..Default::default()
        };
        assert!(WellLabel::new("W", -10.0, -20.0, "t").is_visible(&s));
        assert!(WellLabel::new("W", 10.0, -200.0, "t").is_visible(&s));
        assert!(!WellLabel::new("W", -100.0, -120.0, "t").is_visible(&s));
        assert!(!WellLabel::new("W", 20.0, 0.0, "t").is_visible(&s));
    }
}
