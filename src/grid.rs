use crate::*;

/// A grid of generic data.
///
/// A grid is evenly spaced in x and y and is axis aligned. Nodes sit on the grid lines, so a
/// grid of `n` nodes in an axis covers `(n - 1) * spacing` of that axis.
///
/// > `PartialEq` is derived and is _exact_ on the float values. This is useful for debugging but
/// should not be used for actual grid equality
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenericGrid<T> {
    /// The x,y at coord 0,0.
    origin: Point2,

    /// The **X** count, such that the zs are stored row-first.
    stride: usize,

    /// Distance between nodes in the x and y axis.
    spacing: Point2,

    /// The z values.
    zs: Vec<Option<T>>,
}

impl<T> GenericGrid<T> {
    /// Create a new, empty, grid with the given origin, size, and spacing.
    pub fn new(origin: Point2, x_count: usize, y_count: usize, spacing: Point2) -> Self {
        let zs = std::iter::repeat_with(|| None)
            .take(x_count * y_count)
            .collect();
        Self {
            origin,
            stride: x_count,
            spacing,
            zs,
        }
    }

    /// The origin the grid was constructed with.
    pub fn origin(&self) -> Point2 {
        self.origin
    }

    /// The 2D plan extents spanned by the grid nodes.
    ///
    /// This does not account for grid point existence, just the origin, the spacing, and
    /// the counts.
    pub fn extents(&self) -> Extents2 {
        let counts = [self.x_count(), self.y_count()].map(|n| n.saturating_sub(1) as f64);
        let [sx, sy] = self.spacing;
        Extents2 {
            origin: self.origin,
            size: [counts[0] * sx, counts[1] * sy],
        }
    }

    /// The number of grid points in the x-axis.
    pub fn x_count(&self) -> usize {
        self.stride
    }

    /// The number of grid points in the y-axis.
    pub fn y_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.zs.len() / self.stride
        }
    }

    /// The spacing between grid points, x then y.
    pub fn spacing(&self) -> Point2 {
        self.spacing
    }

    /// The _size_ of the grid, this **includes** empty points.
    /// (`x_count * y_count`)
    pub fn len(&self) -> usize {
        self.zs.len()
    }

    /// The number of points that are **not** `None`.
    pub fn len_nonempty(&self) -> usize {
        self.zs.iter().filter(|x| x.is_some()).count()
    }

    /// Returns if the grid is zero-sized, that is, has no points **at all**.
    pub fn is_empty(&self) -> bool {
        self.zs.is_empty()
    }

    /// Returns the [`Point2`] coordinates of the `x` and `y` indices.
    ///
    /// Note that this will always return a value, even if a grid point does not exist.
    pub fn get_xy(&self, x: usize, y: usize) -> Point2 {
        let [sx, sy] = self.spacing;
        self.origin.add([x as f64 * sx, y as f64 * sy])
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.zs[self.idx(x, y)].as_ref()
    }

    pub fn set(&mut self, x: usize, y: usize, z: impl Into<Option<T>>) {
        let idx = self.idx(x, y);
        self.zs[idx] = z.into();
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        if x >= self.stride {
            panic!("x value '{}' is outside grid bounds", x);
        }
        let a = self.stride * y;
        if a >= self.zs.len() {
            panic!("y value '{}' is outside grid bounds", y);
        }

        a + x
    }

    /// Iterate the values of existing nodes, row first.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.zs.iter().filter_map(Option::as_ref)
    }
}

/// Type alias for a common grid of float values.
pub type Grid = GenericGrid<f64>;

impl Grid {
    /// Sample the grid at an arbitrary plan location.
    ///
    /// Inside a cell with all four nodes present the value is bilinearly interpolated.
    /// If some corners are blank the nearest present corner is used.
    /// Locations outside the grid are clamped to the border cell.
    /// Returns `None` if the grid has fewer than two nodes in either axis, or if the cell has no
    /// present corners.
    pub fn sample(&self, p: Point2) -> Option<f64> {
        let (xn, yn) = (self.x_count(), self.y_count());
        if xn < 2 || yn < 2 {
            return None;
        }

        let [sx, sy] = self.spacing;
        let [fx, fy] = p.sub(self.origin);
        let (fx, fy) = (fx / sx, fy / sy);

        // cell lower-left index, clamped so that (x0 + 1, y0 + 1) exists
        let x0 = (fx.floor().max(0.0) as usize).min(xn - 2);
        let y0 = (fy.floor().max(0.0) as usize).min(yn - 2);
        let tx = (fx - x0 as f64).clamp(0.0, 1.0);
        let ty = (fy - y0 as f64).clamp(0.0, 1.0);

        let corners = [
            (x0, y0, (1.0 - tx) * (1.0 - ty)),
            (x0 + 1, y0, tx * (1.0 - ty)),
            (x0, y0 + 1, (1.0 - tx) * ty),
            (x0 + 1, y0 + 1, tx * ty),
        ];

        let zs = corners.map(|(x, y, w)| self.get(x, y).map(|z| (*z, w)));

        if zs.iter().all(Option::is_some) {
            return Some(zs.iter().flatten().map(|(z, w)| z * w).sum());
        }

        // nearest present corner; the weight is largest for the closest corner
        zs.into_iter()
            .flatten()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(z, _)| z)
    }
}
