//! The section path: the polyline the cross-section is projected along.
use crate::*;

/// What a [`SectionPath`] vertex stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vertex {
    /// A well, by name.
    Well(String),
    /// An extension point beyond an end well.
    Offset,
}

impl Vertex {
    pub fn well(&self) -> Option<&str> {
        match self {
            Vertex::Well(n) => Some(n),
            Vertex::Offset => None,
        }
    }
}

/// A polyline through the active wells, optionally extended at both ends.
///
/// Each vertex of the line is tagged as a well or an offset point, so wells are identified by
/// position in the path rather than by coordinate equality.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionPath {
    line: Polyline2,
    vertices: Vec<Vertex>,
}

impl SectionPath {
    /// Create a path from a line and its vertex tags.
    ///
    /// Fails if the counts differ.
    pub fn new(line: Polyline2, vertices: Vec<Vertex>) -> Result<Self, &'static str> {
        if line.len() != vertices.len() {
            Err("section path requires one vertex tag per point")
        } else {
            Ok(Self { line, vertices })
        }
    }

    pub fn line(&self) -> &Polyline2 {
        &self.line
    }

    pub fn pts(&self) -> &[Point2] {
        self.line.pts()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Total planar length (m).
    pub fn length(&self) -> f64 {
        self.line.length()
    }

    /// Distance along the path to the vertex `idx`.
    pub fn length_to(&self, idx: usize) -> f64 {
        self.line.length_to(idx)
    }

    /// Iterate `(index of left vertex, left, right)` for each segment.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = (usize, Point2, Point2)> + '_ {
        self.line.segments().enumerate().map(|(i, (a, b))| (i, a, b))
    }

    /// Distance along the path to the named well.
    pub fn well_distance(&self, name: &str) -> Option<f64> {
        self.vertices
            .iter()
            .position(|v| v.well() == Some(name))
            .map(|i| self.length_to(i))
    }

    /// Returns if the path has offset points at its ends.
    pub fn has_offset(&self) -> bool {
        self.vertices.first() == Some(&Vertex::Offset)
    }
}

impl Aabb for SectionPath {
    fn aabb(&self) -> Extents2 {
        self.line.aabb()
    }
}

/// Build the section path through `wells`, in order.
///
/// With a non-zero `unscaled_offset`, a point is prepended `unscaled_offset` beyond the first
/// well, along the extension of the first segment, and likewise appended beyond the last well.
/// Returns `None` if there are fewer than two wells.
///
/// # Example
/// ```rust
/// # use geosection::*;
/// let a = Well::new("A", 0.0, [0.0, 0.0], 10.0,
///     vec![GeophysicalData::new(0.0, 0.0, 10.0, 1.0).unwrap()], true).unwrap();
/// let b = Well::new("B", 0.0, [100.0, 0.0], 10.0,
///     vec![GeophysicalData::new(0.0, 0.0, 10.0, 1.0).unwrap()], true).unwrap();
///
/// let path = build_section_path(&[&a, &b], 10.0).unwrap();
/// assert_eq!(path.pts(), &[[-10.0, 0.0], [0.0, 0.0], [100.0, 0.0], [110.0, 0.0]]);
/// assert_eq!(path.well_distance("B"), Some(110.0));
/// ```
pub fn build_section_path(wells: &[&Well], unscaled_offset: f64) -> Option<SectionPath> {
    if wells.len() < 2 {
        return None;
    }

    let mut pts = Vec::with_capacity(wells.len() + 2);
    let mut vertices = Vec::with_capacity(wells.len() + 2);

    let first = wells[0].location();
    let second = wells[1].location();
    let last = wells[wells.len() - 1].location();
    let prelast = wells[wells.len() - 2].location();
    let offset = unscaled_offset != 0.0;

    if offset {
        pts.push(offset_away(first, second, unscaled_offset));
        vertices.push(Vertex::Offset);
    }

    for w in wells {
        pts.push(w.location());
        vertices.push(Vertex::Well(w.name().to_string()));
    }

    if offset {
        pts.push(offset_away(last, prelast, unscaled_offset));
        vertices.push(Vertex::Offset);
    }

    let line = Polyline2::new(pts).ok()?;
    SectionPath::new(line, vertices).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    fn wells(locs: &[Point2]) -> Vec<Well> {
        locs.iter()
            .enumerate()
            .map(|(i, p)| dummy_well(&format!("W{}", i + 1), *p, 100.0))
            .collect()
    }

    #[test]
    fn zero_offset_path_is_well_locations() {
        let ws = wells(&[[0.0, 0.0], [100.0, 0.0], [200.0, 0.0]]);
        let refs = ws.iter().collect::<Vec<_>>();
        let p = build_section_path(&refs, 0.0).unwrap();

        assert_eq!(p.pts(), &[[0.0, 0.0], [100.0, 0.0], [200.0, 0.0]]);
        assert_eq!(p.length(), 200.0);
        assert!(!p.has_offset());
        assert_eq!(p.well_distance("W2"), Some(100.0));
        assert_eq!(p.well_distance("W9"), None);
    }

    #[test]
    fn too_few_wells() {
        let ws = wells(&[[0.0, 0.0]]);
        assert!(build_section_path(&[&ws[0]], 5.0).is_none());
        assert!(build_section_path(&[], 0.0).is_none());
    }

    #[test]
    fn offset_extends_end_segments() {
        let ws = wells(&[[0.0, 0.0], [30.0, 40.0], [30.0, 100.0]]);
        let refs = ws.iter().collect::<Vec<_>>();
        let p = build_section_path(&refs, 5.0).unwrap();

        assert_eq!(p.len(), 5);
        assert!(p.has_offset());
        assert_eq!(p.vertices()[0], Vertex::Offset);
        assert_eq!(p.vertices()[1], Vertex::Well("W1".into()));
        assert!(dist(p.pts()[0], [-3.0, -4.0]) < 1e-9);
        assert!(dist(p.pts()[4], [30.0, 105.0]) < 1e-9);
        assert!((p.length() - 120.0).abs() < 1e-9);
        assert_eq!(
            p.aabb(),
            Extents2::from_min_max(p.pts()[0], [30.0, p.pts()[4][1]])
        );
    }

    #[test]
    fn mismatched_vertex_tags() {
        let line = Polyline2::new([[0.0, 0.0], [1.0, 0.0]]).unwrap();
        assert!(SectionPath::new(line, vec![Vertex::Offset]).is_err());
    }

    #[quickcheck]
    fn offset_adds_twice_the_distance(xs: Vec<(i16, i16)>, d: u16) -> TestResult {
        let locs = xs
            .into_iter()
            .map(|(x, y)| [x as f64, y as f64])
            .collect::<Vec<_>>();
        let distinct = locs.windows(2).all(|w| dist(w[0], w[1]) > 0.0);
        if locs.len() < 2 || !distinct {
            return TestResult::discard();
        }

        let ws = wells(&locs);
        let refs = ws.iter().collect::<Vec<_>>();
        let d = d as f64;
        let base = build_section_path(&refs, 0.0).unwrap().length();
        let ext = build_section_path(&refs, d).unwrap();
        let len = ext.length();

        let tol = 1e-9 * (base + d).max(1.0);
        TestResult::from_bool(
            (len - (base + 2.0 * d)).abs() < tol
                && (dist(ext.pts()[0], locs[0]) - d).abs() < tol
                && (dist(ext.line().last(), locs[locs.len() - 1]) - d).abs() < tol,
        )
    }
}
