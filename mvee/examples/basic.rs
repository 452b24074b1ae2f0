//! A basic example of fitting an ellipse around some points.
use mvee::{Config, PointSet, fit};

fn main() {
    // Corners of a 6×2 rectangle, plus a point in the middle which won't matter.
    let points = PointSet::from_rows(&[
        [3.0, 1.0],
        [-3.0, 1.0],
        [-3.0, -1.0],
        [3.0, -1.0],
        [0.5, 0.0],
    ])
    .unwrap();

    // Fit the smallest ellipse containing all of them.
    let outcome = match fit(&points, Config::default()) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Could not fit: {e}");
            std::process::exit(1);
        }
    };

    // Check the outcome.
    let ellipse = outcome.ellipsoid().as_ellipse_params().unwrap();
    println!("{ellipse}");
    println!(
        "Took {} iterations, {}μs",
        outcome.iterations(),
        outcome.elapsed().as_micros()
    );
    assert!(outcome.ellipsoid().contains_all(&points, 1e-2));
}
