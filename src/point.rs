use std::ops;

pub trait Point: Copy + Sized + IntoIterator<Item = f64> {
    /// Set all the values to this value.
    fn all(v: f64) -> Self;

    /// Set all values to zero.
    fn zero() -> Self {
        Self::all(0.)
    }

    /// Scale point by multiplying all dimensions by `scalar`.
    fn scale(self, scalar: f64) -> Self;

    /// Calculate the magnitude of the vector.
    fn mag(self) -> f64 {
        self.into_iter()
            .zip(self)
            .map(|(a, b)| a * b)
            .sum::<f64>()
            .sqrt()
    }

    /// Normalise the vector by the magnitude.
    fn unit(self) -> Self {
        self.scale(self.mag().recip())
    }

    /// Return the minimum of each dimension.
    fn min_all(self, b: Self) -> Self {
        xfm(self, b, f64::min)
    }

    /// Return the maximum of each dimension.
    fn max_all(self, b: Self) -> Self {
        xfm(self, b, f64::max)
    }

    /// Perform a transformation on each pair of dimensions.
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self;
}

pub trait Add<Rhs = Self> {
    fn add(self, rhs: Rhs) -> Self;
    fn sub(self, rhs: Rhs) -> Self
    where
        Self: Sized + Copy,
        Rhs: Point,
    {
        self.add(rhs.scale(-1.0))
    }
}

/// 2D Point (X,Y).
pub type Point2 = [f64; 2];

impl Add for Point2 {
    fn add(self, rhs: Self) -> Self {
        xfm(self, rhs, ops::Add::add)
    }

    fn sub(self, rhs: Self) -> Self {
        xfm(self, rhs, ops::Sub::sub)
    }
}

impl Point for Point2 {
    fn all(v: f64) -> Self {
        [v; 2]
    }
    fn scale(self, scalar: f64) -> Self {
        self.map(|f| f * scalar)
    }
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self {
        let [ax, ay] = self;
        let [bx, by] = b;
        [f(ax, bx), f(ay, by)]
    }
}

/// Planar distance between two points.
pub fn dist(a: Point2, b: Point2) -> f64 {
    b.sub(a).mag()
}

/// Move `from` by `d` along the direction _towards_ `to`.
///
/// If `from` and `to` coincide the direction is undefined and `from` is returned.
///
/// # Example
/// ```rust
/// # use geosection::*;
/// let p = offset_towards([0.0, 0.0], [10.0, 0.0], 4.0);
/// assert_eq!(p, [4.0, 0.0]);
/// ```
pub fn offset_towards(from: Point2, to: Point2, d: f64) -> Point2 {
    let v = to.sub(from);
    if zero_len(v) {
        return from;
    }
    from.add(v.unit().scale(d))
}

/// Move `from` by `d` along the direction _away_ from `other`.
///
/// This extends the segment `other -> from` beyond `from`.
///
/// # Example
/// ```rust
/// # use geosection::*;
/// let p = offset_away([0.0, 0.0], [10.0, 0.0], 4.0);
/// assert_eq!(p, [-4.0, 0.0]);
/// ```
pub fn offset_away(from: Point2, other: Point2, d: f64) -> Point2 {
    offset_towards(from, other, -d)
}

pub fn zero_len(p: Point2) -> bool {
    let [x, y] = p;
    x.abs() < 1e-7 && y.abs() < 1e-7
}

/// Helper function which effectively transforms to [`Point::xfm`].
#[inline(always)]
pub fn xfm<P: Point, F: Fn(f64, f64) -> f64>(a: P, b: P, f: F) -> P {
    P::xfm(a, b, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    #[test]
    fn point_adding() {
        let p = [0.0, 1.0].add([3.0, 1.0]);
        assert_eq!(p, [3.0, 2.0]);

        let p = [0.0, 1.0].sub([3.0, 1.0]);
        assert_eq!(p, [-3.0, 0.0]);
    }

    #[test]
    fn mag_testing() {
        let m = [3.0, 4.0].mag() - 5.0;
        assert!(m.abs() < 1e-11);

        let m = [-3.0, -4.0].mag() - 5.0;
        assert!(m.abs() < 1e-11);
    }

    #[test]
    fn offsets() {
        let p = offset_towards([1.0, 1.0], [4.0, 5.0], 10.0);
        assert!(dist(p, [7.0, 9.0]) < 1e-11);

        let p = offset_away([1.0, 1.0], [4.0, 5.0], 5.0);
        assert!(dist(p, [-2.0, -3.0]) < 1e-11);

        // coincident points have no direction
        assert_eq!(offset_towards([2.0, 2.0], [2.0, 2.0], 3.0), [2.0, 2.0]);
    }

    #[quickcheck]
    fn offset_towards_travels_exact_distance(a: (i16, i16), b: (i16, i16), d: u16) -> TestResult {
        let a = [a.0 as f64, a.1 as f64];
        let b = [b.0 as f64, b.1 as f64];
        if zero_len(b.sub(a)) {
            return TestResult::discard();
        }
        let d = d as f64;
        let p = offset_towards(a, b, d);
        TestResult::from_bool((dist(a, p) - d).abs() < 1e-6)
    }
}
