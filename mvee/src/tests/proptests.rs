use proptest::prelude::*;

use crate::{Config, FitError, IterationStats, PointSet, fit, fit_with_observer};

const EPS: f64 = 1e-3;
const SLACK: f64 = 1e-2;

fn config() -> Config {
    Config::default()
        .with_tolerance(EPS)
        .with_max_iterations(1_000_000)
}

/// Fit, checking every iteration keeps the weights on the probability simplex.
fn fit_checked(points: &PointSet) -> crate::FitOutcome {
    let mut history: Vec<IterationStats> = Vec::new();
    let outcome = fit_with_observer(points, config(), |stats| history.push(*stats)).unwrap();
    assert_eq!(history.len(), outcome.iterations());
    for stats in &history {
        assert!(
            (stats.weight_sum - 1.0).abs() < 1e-9,
            "weights sum to {} at iteration {}",
            stats.weight_sum,
            stats.iteration
        );
        assert!(stats.min_weight >= 0.0);
        assert!(stats.max_leverage.is_finite());
    }
    outcome
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn planar_clouds_are_enclosed(
        cloud in prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 1..40),
    ) {
        // A fixed triangle keeps the cloud from being degenerate.
        let mut rows = vec![[0.0, 0.0], [50.0, 0.0], [0.0, 50.0]];
        rows.extend(cloud.into_iter().map(|(x, y)| [x, y]));
        let points = PointSet::from_rows(&rows).unwrap();

        let outcome = fit_checked(&points);
        prop_assert!(outcome.ellipsoid().contains_all(&points, SLACK));
        prop_assert!(outcome.radii().iter().all(|r| r.is_finite() && *r > 0.0));
    }

    #[test]
    fn spatial_clouds_are_enclosed(
        cloud in prop::collection::vec(
            (-10.0..10.0f64, -10.0..10.0f64, -10.0..10.0f64),
            1..25,
        ),
    ) {
        let mut rows = vec![[0.0, 0.0, 0.0], [5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];
        rows.extend(cloud.into_iter().map(|(x, y, z)| [x, y, z]));
        let points = PointSet::from_rows(&rows).unwrap();

        let outcome = fit_checked(&points);
        prop_assert!(outcome.ellipsoid().contains_all(&points, SLACK));
        prop_assert_eq!(outcome.radii().len(), 3);
    }

    #[test]
    fn scaling_points_scales_radii(
        cloud in prop::collection::vec((-1.0..1.0f64, -1.0..1.0f64), 1..20),
        scale in 0.5..20.0f64,
    ) {
        let mut rows = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        rows.extend(cloud.into_iter().map(|(x, y)| [x, y]));
        let small = PointSet::from_rows(&rows).unwrap();
        let big = PointSet::from_rows(
            &rows.iter().map(|[x, y]| [x * scale, y * scale]).collect::<Vec<_>>(),
        )
        .unwrap();

        let small = fit_checked(&small);
        let big = fit_checked(&big);
        // The approximations can take different paths, but both are close to the optimum.
        let volume_ratio = big.ellipsoid().volume() / (small.ellipsoid().volume() * scale * scale);
        prop_assert!((volume_ratio - 1.0).abs() < 0.05, "volume ratio {}", volume_ratio);
    }

    #[test]
    fn any_scale_is_enclosed_or_rejected(
        cloud in prop::collection::vec((-1.0..1.0f64, -1.0..1.0f64), 1..20),
        log_scale in -6.0..6.0f64,
    ) {
        // Small enough and the default λ outweighs the points' spread.
        let scale = libm::pow(10.0, log_scale);
        let mut rows = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        rows.extend(cloud.into_iter().map(|(x, y)| [x, y]));
        let points = PointSet::from_rows(
            &rows.iter().map(|[x, y]| [x * scale, y * scale]).collect::<Vec<_>>(),
        )
        .unwrap();

        match fit(&points, config()) {
            Ok(outcome) => {
                let worst = points
                    .iter()
                    .map(|p| outcome.ellipsoid().mahalanobis_distance(p))
                    .fold(0.0, libm::fmax);
                prop_assert!(worst <= 1.0 + SLACK, "scale {}: point at distance {}", scale, worst);
            }
            Err(FitError::Numerical(_)) => {}
            Err(e) => prop_assert!(false, "scale {}: unexpected error {}", scale, e),
        }
    }
}
