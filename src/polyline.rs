use super::*;

/// An open 2D polyline of at least two points.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline2(Vec<Point2>);

impl Polyline2 {
    pub fn new<I>(points: I) -> Result<Self, &'static str>
    where
        I: IntoIterator<Item = Point2>,
    {
        let points = points.into_iter().collect::<Vec<_>>();
        if points.len() < 2 {
            Err("polyline requires 2 or more points to be valid")
        } else {
            Ok(Polyline2(points))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pts(&self) -> &[Point2] {
        &self.0
    }

    pub fn first(&self) -> Point2 {
        self.0[0]
    }

    pub fn last(&self) -> Point2 {
        self.0[self.0.len() - 1]
    }

    /// Iterate the `(from, to)` pairs of each segment.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = (Point2, Point2)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// The total planar length.
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| dist(a, b)).sum()
    }

    /// The length travelled along the polyline from the first point to the vertex `idx`.
    ///
    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn length_to(&self, idx: usize) -> f64 {
        self.0[..=idx]
            .windows(2)
            .map(|w| dist(w[0], w[1]))
            .sum()
    }
}

impl Aabb for Polyline2 {
    fn aabb(&self) -> Extents2 {
        self.0.iter().copied().collect()
    }
}

impl IntoIterator for Polyline2 {
    type Item = Point2;
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_requires_two_points() {
        assert!(Polyline2::new([[0.0, 0.0]]).is_err());
        assert!(Polyline2::new([[0.0, 0.0], [1.0, 1.0]]).is_ok());
    }

    #[test]
    fn lengths() {
        let p = Polyline2::new([[0.0, 0.0], [3.0, 4.0], [3.0, 10.0]]).unwrap();
        assert_eq!(p.length(), 11.0);
        assert_eq!(p.length_to(0), 0.0);
        assert_eq!(p.length_to(1), 5.0);
        assert_eq!(p.length_to(2), 11.0);
        assert_eq!(p.segments().len(), 2);
        assert_eq!(p.aabb(), Extents2::from_min_max([0.0, 0.0], [3.0, 10.0]));
    }
}
