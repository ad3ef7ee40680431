use crate::*;

/// A plan envelope, held as its minimum corner and size.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Extents2 {
    pub origin: Point2,
    pub size: Point2,
}

impl Extents2 {
    pub fn zero() -> Self {
        Self {
            origin: Point2::zero(),
            size: Point2::zero(),
        }
    }

    pub fn from_min_max(min: Point2, max: Point2) -> Self {
        Self {
            origin: min,
            size: max.sub(min),
        }
    }

    pub fn max(&self) -> Point2 {
        self.origin.add(self.size)
    }

    /// Returns if `other` lies completely inside (or on the boundary of) these extents.
    pub fn contains(&self, other: &Self) -> bool {
        self.envelops(other.origin) && self.envelops(other.max())
    }
}

/// The envelope of the points. An empty iterator gives [`Extents2::zero`].
impl FromIterator<Point2> for Extents2 {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Point2>,
    {
        let mut iter = iter.into_iter();
        let Some(init) = iter.next() else { return Self::zero(); };

        let (min, max) = iter.fold((init, init), |(min, max), p| {
            (min.min_all(p), max.max_all(p))
        });

        Self::from_min_max(min, max)
    }
}

impl Envelops<Point2> for Extents2 {
    fn envelops(&self, [x, y]: Point2) -> bool {
        let [lx, ly] = self.origin;
        let [hx, hy] = self.max();

        lx <= x && x <= hx && ly <= y && y <= hy
    }
}

/// Objects with a plan envelope.
pub trait Aabb {
    fn aabb(&self) -> Extents2;
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    #[quickcheck]
    fn envelope_holds_its_points(pts: Vec<(i32, i32)>) -> TestResult {
        if pts.is_empty() {
            return TestResult::discard();
        }
        // survey coordinates, well inside f64 precision
        let pts = pts
            .into_iter()
            .map(|(x, y)| [x as f64 / 8.0, y as f64 / 8.0])
            .collect::<Vec<_>>();
        let e = pts.iter().copied().collect::<Extents2>();

        TestResult::from_bool(
            pts.iter().all(|p| e.envelops(*p)) && e.size.iter().all(|s| *s >= 0.0),
        )
    }

    #[test]
    fn containment() {
        let outer = Extents2::from_min_max([0.0, 0.0], [10.0, 10.0]);
        let inner = Extents2::from_min_max([1.0, 1.0], [9.0, 10.0]);
        let across = Extents2::from_min_max([5.0, 5.0], [11.0, 6.0]);

        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&across));
        assert!(!outer.envelops([-0.1, 3.0]));
    }

    #[test]
    fn from_points() {
        let e = Extents2::from_iter([[3.0, 1.0], [-1.0, 4.0], [2.0, 2.0]]);
        assert_eq!(e.origin, [-1.0, 1.0]);
        assert_eq!(e.max(), [3.0, 4.0]);

        assert_eq!(Extents2::from_iter(std::iter::empty()), Extents2::zero());
    }
}
