//! Geometry of a fitted ellipsoid.
use faer::{Mat, MatRef};

use crate::PointSet;

/// An ellipsoid `{x : (x - c)ᵀ·V·diag(1/r²)·Vᵀ·(x - c) ≤ 1}`.
#[derive(Debug, Clone)]
pub struct Ellipsoid {
    pub(crate) centroid: Vec<f64>,
    pub(crate) radii: Vec<f64>,
    pub(crate) pose: Mat<f64>,
}

impl Ellipsoid {
    /// Center of the ellipsoid.
    pub fn centroid(&self) -> &[f64] {
        &self.centroid
    }

    /// Semi-axis lengths. `radii()[k]` is the length along column k of the pose.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Orthogonal matrix whose columns are the principal axis directions.
    pub fn pose(&self) -> MatRef<'_, f64> {
        self.pose.as_ref()
    }

    /// Number of dimensions.
    pub fn dimension(&self) -> usize {
        self.centroid.len()
    }

    /// Coordinates of `point` in the ellipsoid's principal frame, scaled by the radii.
    /// The ellipsoid is exactly where these have norm ≤ 1.
    fn normalized(&self, point: &[f64]) -> impl Iterator<Item = f64> + '_ {
        debug_assert_eq!(point.len(), self.dimension());
        let offset: Vec<f64> = point
            .iter()
            .zip(&self.centroid)
            .map(|(x, c)| x - c)
            .collect();
        (0..self.dimension()).map(move |k| {
            let along_axis: f64 = offset
                .iter()
                .enumerate()
                .map(|(i, o)| self.pose[(i, k)] * o)
                .sum();
            along_axis / self.radii[k]
        })
    }

    /// How far `point` is from the centroid, in units of the ellipsoid.
    /// Points on the surface are at distance 1.
    pub fn mahalanobis_distance(&self, point: &[f64]) -> f64 {
        libm::sqrt(self.normalized(point).map(|z| z * z).sum())
    }

    /// Is `point` inside the ellipsoid, allowing `slack` for numerical error?
    pub fn contains(&self, point: &[f64], slack: f64) -> bool {
        self.mahalanobis_distance(point) <= 1.0 + slack
    }

    /// Are all these points inside the ellipsoid, allowing `slack` for numerical error?
    pub fn contains_all(&self, points: &PointSet, slack: f64) -> bool {
        points.iter().all(|p| self.contains(p, slack))
    }

    /// d-dimensional volume.
    pub fn volume(&self) -> f64 {
        let d = self.dimension() as f64;
        let unit_ball = libm::pow(std::f64::consts::PI, d / 2.0) / libm::tgamma(d / 2.0 + 1.0);
        unit_ball * self.radii.iter().product::<f64>()
    }

    /// The quadratic form `E = V·diag(1/r²)·Vᵀ`.
    pub fn shape_matrix(&self) -> Mat<f64> {
        let d = self.dimension();
        Mat::from_fn(d, d, |i, j| {
            (0..d)
                .map(|k| self.pose[(i, k)] * self.pose[(j, k)] / (self.radii[k] * self.radii[k]))
                .sum()
        })
    }

    /// 2D ellipses can be described by 5 numbers.
    /// Returns None for other dimensions.
    pub fn as_ellipse_params(&self) -> Option<EllipseParams> {
        if self.dimension() != 2 {
            return None;
        }
        Some(EllipseParams {
            a: self.radii[0],
            b: self.radii[1],
            x0: self.centroid[0],
            y0: self.centroid[1],
            phi: libm::atan2(self.pose[(1, 0)], self.pose[(0, 0)]),
        })
    }
}

/// A 2D ellipse: semi-axes `a` and `b`, centered at `(x0, y0)`,
/// with the `a` axis rotated `phi` radians counterclockwise from +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParams {
    #[allow(missing_docs)]
    pub a: f64,
    #[allow(missing_docs)]
    pub b: f64,
    #[allow(missing_docs)]
    pub x0: f64,
    #[allow(missing_docs)]
    pub y0: f64,
    #[allow(missing_docs)]
    pub phi: f64,
}

impl EllipseParams {
    /// The point at parameter `t` radians along the boundary.
    pub fn boundary_point(&self, t: f64) -> [f64; 2] {
        let (sin_t, cos_t) = (libm::sin(t), libm::cos(t));
        let (sin_phi, cos_phi) = (libm::sin(self.phi), libm::cos(self.phi));
        [
            self.x0 + self.a * cos_t * cos_phi - self.b * sin_t * sin_phi,
            self.y0 + self.a * cos_t * sin_phi + self.b * sin_t * cos_phi,
        ]
    }

    /// `n` points evenly spaced in parameter around the boundary.
    pub fn sample_boundary(&self, n: usize) -> Vec<[f64; 2]> {
        (0..n)
            .map(|i| self.boundary_point(i as f64 * std::f64::consts::TAU / n as f64))
            .collect()
    }
}

impl std::fmt::Display for EllipseParams {
    /// Human-readable, for the CLI and debugging.
    #[mutants::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "a = {}, b = {}, center = ({}, {}), phi = {}",
            self.a, self.b, self.x0, self.y0, self.phi
        )
    }
}
