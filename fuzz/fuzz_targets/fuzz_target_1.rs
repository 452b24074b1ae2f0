#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mvee::{Config, PointSet};

fuzz_target!(|setup: Setup| {
    let Ok(points) = PointSet::from_rows(&setup.rows) else {
        return;
    };
    // Keep runs short, the fuzzer cares about panics rather than convergence.
    let config = setup.config.with_max_iterations(setup.config.max_iterations % 1000 + 1);
    let Ok(outcome) = mvee::fit(&points, config) else {
        return;
    };
    for &r in outcome.radii() {
        assert!(r.is_finite() && r > 0.0);
    }
});

#[derive(Debug, Arbitrary)]
struct Setup {
    rows: Vec<[f64; 2]>,
    config: Config,
}
