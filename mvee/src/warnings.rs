use crate::{Config, Ellipsoid, PointSet};

/// Below this ratio of smallest to largest radius, the ellipsoid is reported as flat.
const FLAT_RATIO: f64 = 1e-6;

/// Something about a fit which didn't stop it, but which the caller might care about.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Warning {
    /// Index of the point this is about, if it's about a particular one.
    pub about_point: Option<usize>,
    pub content: WarningContent,
}

#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum WarningContent {
    /// Some points are exact copies of others.
    DuplicatePoints {
        /// How many points repeat an earlier one.
        count: usize,
    },
    /// The Gram matrix was inverted without damping.
    NoRegularization,
    /// The ellipsoid is nearly degenerate in at least one direction.
    Flat {
        /// Smallest radius divided by largest radius.
        ratio: f64,
    },
}

/// Checks made before iterating.
pub(crate) fn lint_input(points: &PointSet, config: &Config) -> Vec<Warning> {
    let mut warnings = Vec::default();
    let copies = points.duplicates();
    if let Some(&first) = copies.first() {
        warnings.push(Warning {
            about_point: Some(first),
            content: WarningContent::DuplicatePoints {
                count: copies.len(),
            },
        });
    }
    if config.regularization == 0.0 {
        warnings.push(Warning {
            about_point: None,
            content: WarningContent::NoRegularization,
        });
    }
    warnings
}

/// Checks made on the finished ellipsoid.
pub(crate) fn lint_ellipsoid(ellipsoid: &Ellipsoid, warnings: &mut Vec<Warning>) {
    let smallest = ellipsoid.radii().iter().copied().fold(f64::INFINITY, libm::fmin);
    let largest = ellipsoid.radii().iter().copied().fold(0.0, libm::fmax);
    let ratio = smallest / largest;
    if ratio < FLAT_RATIO {
        warnings.push(Warning {
            about_point: None,
            content: WarningContent::Flat { ratio },
        });
    }
}

impl std::fmt::Display for WarningContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningContent::DuplicatePoints { count } => write!(
                f,
                "{count} points are exact duplicates of other points. They don't change the ellipsoid, but they do slow down every iteration."
            ),
            WarningContent::NoRegularization => write!(
                f,
                "Regularization is 0, so the Gram matrix will be singular whenever fewer than d+1 points carry weight. Consider a small positive value like 1e-8."
            ),
            WarningContent::Flat { ratio } => write!(
                f,
                "The ellipsoid is nearly flat (smallest/largest radius = {ratio:e}). The points probably lie in a lower-dimensional subspace."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use faer::Mat;

    use super::*;

    #[test]
    fn lints_duplicates_and_zero_regularization() {
        let points =
            PointSet::from_rows(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 0.0], [0.0, 0.0]])
                .unwrap();
        let warnings = lint_input(&points, &Config::default().with_regularization(0.0));
        assert_eq!(
            warnings,
            vec![
                Warning {
                    about_point: Some(3),
                    content: WarningContent::DuplicatePoints { count: 2 },
                },
                Warning {
                    about_point: None,
                    content: WarningContent::NoRegularization,
                },
            ]
        );
        assert!(lint_input(&points, &Config::default()).len() == 1);
    }

    #[test]
    fn lints_flat_ellipsoid() {
        let flat = Ellipsoid {
            centroid: vec![0.0, 0.0],
            radii: vec![1e-9, 1.0],
            pose: Mat::identity(2, 2),
        };
        let mut warnings = Vec::new();
        lint_ellipsoid(&flat, &mut warnings);
        assert!(matches!(
            warnings.as_slice(),
            [Warning {
                about_point: None,
                content: WarningContent::Flat { .. }
            }]
        ));

        let round = Ellipsoid {
            centroid: vec![0.0, 0.0],
            radii: vec![1.0, 1.0],
            pose: Mat::identity(2, 2),
        };
        let mut warnings = Vec::new();
        lint_ellipsoid(&round, &mut warnings);
        assert!(warnings.is_empty());
    }

    #[test]
    fn display_formats_are_human_friendly() {
        assert!(
            WarningContent::DuplicatePoints { count: 3 }
                .to_string()
                .contains("3 points")
        );
        assert!(WarningContent::NoRegularization.to_string().contains("1e-8"));
        assert!(WarningContent::Flat { ratio: 1e-9 }.to_string().contains("flat"));
    }
}
