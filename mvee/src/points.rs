//! The input to a fit: a finite set of points in d-dimensional space.

use faer::MatRef;

use crate::InputError;

/// An n×d matrix of finite coordinates. Each row is one point.
/// Stored row-major so every point is a contiguous slice.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    coords: Vec<f64>,
    num_points: usize,
    dimension: usize,
}

impl PointSet {
    /// Build a point set from rows of coordinates.
    /// Every row must have the same, non-zero length, and every coordinate must be finite.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, InputError> {
        let dimension = rows.first().map(|r| r.as_ref().len()).unwrap_or_default();
        if dimension == 0 {
            return Err(InputError::EmptyPointSet);
        }
        let mut coords = Vec::with_capacity(rows.len() * dimension);
        for (row, point) in rows.iter().enumerate() {
            let point = point.as_ref();
            if point.len() != dimension {
                return Err(InputError::RaggedRows {
                    row,
                    expected: dimension,
                    found: point.len(),
                });
            }
            coords.extend_from_slice(point);
        }
        Self::from_row_major(coords, rows.len(), dimension)
    }

    /// Copy a faer matrix (rows are points) into a point set.
    pub fn from_mat(mat: MatRef<'_, f64>) -> Result<Self, InputError> {
        let (num_points, dimension) = (mat.nrows(), mat.ncols());
        let mut coords = Vec::with_capacity(num_points * dimension);
        for i in 0..num_points {
            for j in 0..dimension {
                coords.push(mat[(i, j)]);
            }
        }
        Self::from_row_major(coords, num_points, dimension)
    }

    fn from_row_major(
        coords: Vec<f64>,
        num_points: usize,
        dimension: usize,
    ) -> Result<Self, InputError> {
        if num_points == 0 || dimension == 0 {
            return Err(InputError::EmptyPointSet);
        }
        if let Some(idx) = coords.iter().position(|c| !c.is_finite()) {
            return Err(InputError::NonFiniteCoordinate {
                row: idx / dimension,
                column: idx % dimension,
            });
        }
        Ok(Self {
            coords,
            num_points,
            dimension,
        })
    }

    /// Merge several point sets by taking one row from each in turn,
    /// until all of them are exhausted.
    pub fn interleave(sets: &[PointSet]) -> Result<Self, InputError> {
        let Some(first) = sets.first() else {
            return Err(InputError::EmptyPointSet);
        };
        let dimension = first.dimension;
        if let Some(bad) = sets.iter().find(|s| s.dimension != dimension) {
            return Err(InputError::RaggedRows {
                row: 0,
                expected: dimension,
                found: bad.dimension,
            });
        }
        let longest = sets.iter().map(|s| s.num_points).max().unwrap_or_default();
        let mut rows = Vec::with_capacity(sets.iter().map(|s| s.num_points).sum());
        for i in 0..longest {
            rows.extend(sets.iter().filter(|s| i < s.num_points).map(|s| s.point(i)));
        }
        Self::from_rows(&rows)
    }

    /// Number of points (n).
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Number of coordinates per point (d).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinates of the i-th point.
    ///
    /// # Panics
    /// If `i` is out of bounds.
    pub fn point(&self, i: usize) -> &[f64] {
        let start = i * self.dimension;
        &self.coords[start..start + self.dimension]
    }

    /// Iterate over every point's coordinates.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        self.coords.chunks_exact(self.dimension)
    }

    /// View the points as an n×d faer matrix.
    pub fn as_mat(&self) -> MatRef<'_, f64> {
        MatRef::from_row_major_slice(&self.coords, self.num_points, self.dimension)
    }

    /// Indices of points which exactly copy an earlier point, ascending.
    pub(crate) fn duplicates(&self) -> Vec<usize> {
        // total_cmp puts -0.0 before 0.0, but they're the same coordinate.
        fn unsigned_zero(x: f64) -> f64 {
            if x == 0.0 { 0.0 } else { x }
        }
        let mut order: Vec<usize> = (0..self.num_points()).collect();
        // Stable, so each copy sorts after the point it copies.
        order.sort_by(|&a, &b| {
            self.point(a)
                .iter()
                .zip(self.point(b))
                .map(|(&x, &y)| unsigned_zero(x).total_cmp(&unsigned_zero(y)))
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut copies: Vec<usize> = order
            .windows(2)
            .filter(|w| self.point(w[0]) == self.point(w[1]))
            .map(|w| w[1])
            .collect();
        copies.sort_unstable();
        copies
    }
}
