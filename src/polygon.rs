use crate::*;

/// A polygon ring. The closing point is implicit, it is not repeated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polygon2(Vec<Point2>);

impl Polygon2 {
    pub fn new<I>(points: I) -> Result<Self, &'static str>
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut points = points.into_iter().collect::<Vec<_>>();
        // accept explicitly closed rings
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            Err("polygon requires 3 or more points to be valid")
        } else {
            Ok(Polygon2(points))
        }
    }

    /// An axis aligned rectangle with opposite corners `a` and `b`.
    ///
    /// Points run `a`, `(a.x, b.y)`, `b`, `(b.x, a.y)`.
    pub fn rectangle(a: Point2, b: Point2) -> Self {
        let [ax, ay] = a;
        let [bx, by] = b;
        Polygon2(vec![a, [ax, by], b, [bx, ay]])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pts(&self) -> &[Point2] {
        &self.0
    }
}
