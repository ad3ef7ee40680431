//! Decoration columns: labelled strips drawn beside the main section area.
use crate::*;
use serde::{Deserialize, Serialize};

/// Header of the depth ruler column.
pub const DEPTH_RULER_HEADER: &str = "ABS. ELEV., m";

/// A labelled entry in a decoration column. Bounds are elevations (m).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecorationColumnRecord {
    pub text: String,
    pub left_top: f64,
    pub left_bottom: f64,
    pub right_top: f64,
    pub right_bottom: f64,
}

impl DecorationColumnRecord {
    pub fn validate(&self) -> Validation {
        use Field::*;
        use Invalid::*;

        let mut v = Validation::new();
        v.ensure(self.left_bottom < self.left_top, LeftBottom, BottomNotBelowTop);
        v.ensure(self.left_top > self.left_bottom, LeftTop, TopNotAboveBottom);
        v.ensure(
            self.right_bottom < self.right_top,
            RightBottom,
            BottomNotBelowTop,
        );
        v.ensure(self.right_top > self.right_bottom, RightTop, TopNotAboveBottom);
        v
    }

    /// `(top, bottom)` of the given side.
    fn bounds(&self, side: Side) -> (f64, f64) {
        match side {
            Side::Left => (self.left_top, self.left_bottom),
            Side::Right => (self.right_top, self.right_bottom),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecorationColumn {
    pub header: String,
    pub mode: DecorationColumnMode,
    pub records: Vec<DecorationColumnRecord>,
}

impl DecorationColumn {
    /// Errors of all the records, merged.
    pub fn validate(&self) -> Validation {
        self.records
            .iter()
            .map(DecorationColumnRecord::validate)
            .fold(Validation::new(), |mut acc, v| {
                acc.extend(v);
                acc
            })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn name(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// Total width (cm) of the strips left of the main area.
pub fn left_columns_width(settings: &BuildSettings, columns: &[DecorationColumn]) -> f64 {
    let n = columns
        .iter()
        .map(|c| c.mode)
        .chain(Some(settings.depth_column_mode))
        .filter(|m| m.has_left())
        .count();
    n as f64 * settings.decoration_columns_width
}

/// Total number of strips, both sides, including the depth ruler.
pub fn strip_count(settings: &BuildSettings, columns: &[DecorationColumn]) -> usize {
    columns
        .iter()
        .map(|c| c.mode)
        .chain(Some(settings.depth_column_mode))
        .map(DecorationColumnMode::count)
        .sum()
}

/// Build the features of the depth ruler and decoration columns.
///
/// The ruler is the strip nearest the main area on each side, the columns follow outward in
/// order. Each strip yields a header box, a body box, and its records (or ruler ticks).
pub fn decoration_features(
    settings: &BuildSettings,
    columns: &[DecorationColumn],
    main_area_width: f64,
) -> Vec<Feature> {
    let w = settings.decoration_columns_width;
    let left = left_columns_width(settings, columns);
    let height = (settings.top - settings.bottom) * settings.vertical_scale * CM_PER_M;
    let header_top = height + settings.decoration_headers_height;

    let mut features = Vec::new();

    for side in [Side::Left, Side::Right] {
        let strips = std::iter::once((DEPTH_RULER_HEADER, settings.depth_column_mode, None))
            .chain(columns.iter().map(|c| (c.header.as_str(), c.mode, Some(c))))
            .filter(|(_, mode, _)| match side {
                Side::Left => mode.has_left(),
                Side::Right => mode.has_right(),
            });

        for (k, (header, _, column)) in strips.enumerate() {
            let (x0, x1) = match side {
                Side::Left => (left - (k + 1) as f64 * w, left - k as f64 * w),
                Side::Right => {
                    let x = left + main_area_width + k as f64 * w;
                    (x, x + w)
                }
            };

            features.push(
                Feature::new(Geometry::Polygon(Polygon2::rectangle(
                    [x0, header_top],
                    [x1, height],
                )))
                .with("Kind", "Header")
                .with("Side", side.name())
                .with("Text", header),
            );
            features.push(
                Feature::new(Geometry::Polygon(Polygon2::rectangle(
                    [x0, height],
                    [x1, 0.0],
                )))
                .with("Kind", "Column")
                .with("Side", side.name())
                .with("Text", header),
            );

            match column {
                Some(column) => {
                    features.extend(record_features(settings, column, side, (x0, x1), height))
                }
                None => features.extend(ruler_ticks(settings, side, (x0, x1), height)),
            }
        }
    }

    features
}

fn record_features<'a>(
    settings: &'a BuildSettings,
    column: &'a DecorationColumn,
    side: Side,
    (x0, x1): (f64, f64),
    height: f64,
) -> impl Iterator<Item = Feature> + 'a {
    column.records.iter().filter_map(move |r| {
        let (top, bottom) = r.bounds(side);
        let top = settings.to_section_y(top).min(height);
        let bottom = settings.to_section_y(bottom).max(0.0);
        (top > bottom).then(|| {
            Feature::new(Geometry::Polygon(Polygon2::rectangle(
                [x0, top],
                [x1, bottom],
            )))
            .with("Kind", "Record")
            .with("Side", side.name())
            .with("Text", r.text.as_str())
        })
    })
}

/// One tick per drawing centimetre, on the edge facing the main area.
fn ruler_ticks(
    settings: &BuildSettings,
    side: Side,
    (x0, x1): (f64, f64),
    height: f64,
) -> Vec<Feature> {
    let len = (x1 - x0) * 0.25;
    let (a, b) = match side {
        Side::Left => (x1 - len, x1),
        Side::Right => (x0, x0 + len),
    };
    let per_cm = (settings.vertical_scale * CM_PER_M).recip();
    let n = (height.max(0.0) + 1e-9).floor() as usize;

    (0..=n)
        .map(|i| {
            let y = i as f64;
            Feature::new(Geometry::LineString(vec![[a, y], [b, y]]))
                .with("Kind", "Tick")
                .with("Side", side.name())
                .with("Value", settings.bottom + y * per_cm)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point2, b: Point2) -> bool {
        dist(a, b) < 1e-9
    }

    fn settings() -> BuildSettings {
        BuildSettings {
            top: 0.0,
            bottom: -50.0,
            vertical_scale: 0.001, // 1:1000 -> 5 cm tall
            decoration_columns_width: 1.0,
            decoration_headers_height: 2.0,
            depth_column_mode: DecorationColumnMode::Left,
            ..Default::default()
        }
    }

    fn column(mode: DecorationColumnMode) -> DecorationColumn {
        DecorationColumn {
            header: "Age".into(),
            mode,
            records: vec![DecorationColumnRecord {
                text: "J1".into(),
                left_top: -10.0,
                left_bottom: -20.0,
                right_top: 5.0,
                right_bottom: -30.0,
            }],
        }
    }

    #[test]
    fn record_validation() {
        let mut r = column(DecorationColumnMode::Left).records.remove(0);
        assert!(!r.validate().has_errors());

        r.left_top = -25.0;
        let v = r.validate();
        assert_eq!(v.len(), 2);
        assert_eq!(v.errors(Field::LeftTop).count(), 1);
        assert_eq!(v.errors(Field::LeftBottom).count(), 1);

        let c = DecorationColumn {
            records: vec![r],
            ..column(DecorationColumnMode::Left)
        };
        assert_eq!(c.validate().len(), 2);
    }

    #[test]
    fn widths() {
        let s = settings();
        let cols = [
            column(DecorationColumnMode::LeftAndRight),
            column(DecorationColumnMode::Right),
        ];
        assert_eq!(left_columns_width(&s, &cols), 2.0);
        assert_eq!(strip_count(&s, &cols), 4);
    }

    #[test]
    fn strips_layout() {
        let s = settings();
        let cols = [column(DecorationColumnMode::LeftAndRight)];
        let fs = decoration_features(&s, &cols, 10.0);

        let headers = fs
            .iter()
            .filter(|f| f.get_text("Kind") == Some("Header"))
            .collect::<Vec<_>>();
        assert_eq!(headers.len(), 3);

        // ruler nearest the main area on the left, [1, 2]
        let ruler = headers[0];
        assert_eq!(ruler.get_text("Text"), Some(DEPTH_RULER_HEADER));
        let e = match &ruler.geometry {
            Geometry::Polygon(p) => p.pts().iter().copied().collect::<Extents2>(),
            _ => unreachable!(),
        };
        assert!(close(e.origin, [1.0, 5.0]) && close(e.max(), [2.0, 7.0]));

        // column on the right starts at left + main width
        let right = headers[2];
        assert_eq!(right.get_text("Side"), Some("Right"));
        assert!(close(right.geometry.coords()[0], [12.0, 7.0]));

        // 0..=5 ticks
        let ticks = fs
            .iter()
            .filter(|f| f.get_text("Kind") == Some("Tick"))
            .collect::<Vec<_>>();
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].get_number("Value"), Some(-50.0));
        assert!((ticks[5].get_number("Value").unwrap() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn records_are_clipped_to_area() {
        let s = settings();
        let cols = [column(DecorationColumnMode::LeftAndRight)];
        let fs = decoration_features(&s, &cols, 10.0);
        let records = fs
            .iter()
            .filter(|f| f.get_text("Kind") == Some("Record"))
            .collect::<Vec<_>>();
        assert_eq!(records.len(), 2);

        let e = |f: &Feature| match &f.geometry {
            Geometry::Polygon(p) => p.pts().iter().copied().collect::<Extents2>(),
            _ => unreachable!(),
        };
        // left: -10..-20 -> 4..3 cm
        let l = e(records[0]);
        assert!((l.origin[1] - 3.0).abs() < 1e-9 && (l.max()[1] - 4.0).abs() < 1e-9);
        // right: 5..-30 -> clipped to 5..2 cm
        let r = e(records[1]);
        assert!((r.origin[1] - 2.0).abs() < 1e-9 && (r.max()[1] - 5.0).abs() < 1e-9);
    }
}
