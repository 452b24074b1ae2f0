use std::{
    hint::black_box,
    io::{self, Read},
    path::PathBuf,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use mvee::{
    Config, DEFAULT_MAX_ITERATIONS, DEFAULT_REGULARIZATION, DEFAULT_TOLERANCE, Delimiter,
    EllipseParams, FitError, FitOutcome, NumericalError, Parallelism, PointSet, Warning, fit,
    parse_points,
};

#[derive(Parser)]
#[command(name = "mvee", version, about, long_about = None)]
struct Cli {
    /// Path to a file of points, one per line.
    /// Use '-' for stdin.
    #[arg(short = 'f', long, required_unless_present = "ellipses")]
    filepath: Option<PathBuf>,

    /// Instead of reading a file, sample points from the ellipse `a,b,x0,y0,phi`.
    /// Repeat to sample several ellipses, whose points get interleaved.
    #[arg(
        long = "ellipse",
        value_parser = parse_ellipse,
        allow_hyphen_values = true,
        conflicts_with = "filepath"
    )]
    ellipses: Vec<EllipseParams>,

    /// How many points to sample from each `--ellipse`.
    #[arg(long, default_value_t = 50)]
    points_per_ellipse: usize,

    /// What separates coordinates in the file: a single character, or 'whitespace'.
    #[arg(long, default_value = ",")]
    delimiter: Delimiter,

    /// Stop once the weight update is at most this small.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Added to the diagonal of the Gram matrix before inverting it.
    #[arg(long, default_value_t = DEFAULT_REGULARIZATION)]
    regularization: f64,

    /// Give up after this many iterations.
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Never use multiple threads.
    #[arg(long)]
    sequential: bool,

    /// Fit this many times and report the mean time.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,

    /// Show the principal axes of the ellipsoid.
    #[arg(long = "show-pose")]
    show_pose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let parallelism = if self.sequential {
            Parallelism::Sequential
        } else {
            Parallelism::Auto
        };
        Config::default()
            .with_tolerance(self.tolerance)
            .with_regularization(self.regularization)
            .with_max_iterations(self.max_iterations)
            .with_parallelism(parallelism)
    }
}

/// A successful fit, plus how long it took on average.
#[derive(Debug)]
struct Run {
    outcome: FitOutcome,
    num_points: usize,
    mean_duration: Duration,
    runs: u32,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match main_inner(&cli) {
        Ok(run) => print_output(&run, cli.show_pose),
        Err(e) => {
            print_failure_output(&e);
            std::process::exit(1);
        }
    }
}

fn main_inner(cli: &Cli) -> anyhow::Result<Run> {
    let points = read_points(cli)?;
    let config = cli.config();
    log::info!(
        "Read {} points in {} dimensions",
        points.num_points(),
        points.dimension()
    );

    let outcome = fit(&points, config)?;

    // It succeeded. Benchmark its perf
    let mut total = outcome.elapsed();
    for _ in 1..cli.runs {
        total += black_box(fit(&points, config))?.elapsed();
    }
    Ok(Run {
        outcome,
        num_points: points.num_points(),
        mean_duration: total / cli.runs,
        runs: cli.runs,
    })
}

/// Parse `a,b,x0,y0,phi`.
fn parse_ellipse(s: &str) -> Result<EllipseParams, String> {
    let numbers = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("'{s}' should be 5 comma-separated numbers: {e}"))?;
    let [a, b, x0, y0, phi] = numbers[..] else {
        return Err(format!(
            "'{s}' should be 5 comma-separated numbers (a,b,x0,y0,phi), but found {}",
            numbers.len()
        ));
    };
    if !(a > 0.0 && b > 0.0) {
        return Err(format!("Semi-axes must be positive, but got a = {a}, b = {b}"));
    }
    Ok(EllipseParams { a, b, x0, y0, phi })
}

/// Get the points to fit, from a file, stdin, or sampled ellipses, depending on user args.
fn read_points(cli: &Cli) -> anyhow::Result<PointSet> {
    if !cli.ellipses.is_empty() {
        let sets = cli
            .ellipses
            .iter()
            .map(|e| PointSet::from_rows(&e.sample_boundary(cli.points_per_ellipse)))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(PointSet::interleave(&sets)?);
    }
    let Some(filepath) = &cli.filepath else {
        anyhow::bail!("Pass either a file of points (-f) or at least one --ellipse");
    };

    let text = if filepath == &PathBuf::from("-") {
        let mut text = String::with_capacity(100);
        io::stdin()
            .read_to_string(&mut text)
            .context("Could not read points from stdin")?;
        text
    } else {
        std::fs::read_to_string(filepath)
            .with_context(|| format!("Could not read {}", filepath.display()))?
    };
    parse_points(&text, cli.delimiter).context("Could not parse points")
}

fn format_vector(v: impl IntoIterator<Item = f64>) -> String {
    let parts: Vec<String> = v.into_iter().map(|x| format!("{x:.4}")).collect();
    format!("({})", parts.join(", "))
}

/// Prints the output nicely to stdout.
fn print_output(run: &Run, show_pose: bool) {
    let Run {
        outcome,
        num_points,
        mean_duration,
        runs,
    } = run;
    let ellipsoid = outcome.ellipsoid();
    print_warnings(outcome.warnings());
    println!(
        "Problem size: {num_points} points, {} dimensions",
        ellipsoid.dimension()
    );
    println!("Iterations needed: {}", outcome.iterations());
    print_performance(*mean_duration, *runs);
    println!("Center: {}", format_vector(ellipsoid.centroid().iter().copied()));
    println!("Radii: {}", format_vector(ellipsoid.radii().iter().copied()));
    println!("Volume: {:.4}", ellipsoid.volume());
    if let Some(params) = ellipsoid.as_ellipse_params() {
        println!("Ellipse: {params}");
    }
    if show_pose {
        println!("Pose:");
        let pose = ellipsoid.pose();
        for i in 0..pose.nrows() {
            println!(
                "\t{}",
                format_vector((0..pose.ncols()).map(|j| pose[(i, j)]))
            );
        }
    }
}

fn print_performance(duration: Duration, runs: u32) {
    use colored::Colorize;
    let time = format!("{}μs", duration.as_micros());
    println!("Fitted in {time} (mean over {runs} runs)");
    let micros = duration.as_micros().max(1);
    let fits_per_second = Duration::from_secs(1).as_micros() / micros;
    let fits_per_second = if fits_per_second <= 60 {
        fits_per_second.to_string().red()
    } else {
        fits_per_second.to_string().normal()
    };
    println!("i.e. {fits_per_second} fits per second");
}

fn print_warnings(warnings: &[Warning]) {
    use colored::Colorize;
    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings {
            let text = match warning.about_point {
                Some(i) => format!("Point {i}: {}", warning.content),
                None => warning.content.to_string(),
            };
            println!("\t{}", text.yellow());
        }
    }
}

fn print_failure_output(error: &anyhow::Error) {
    use colored::Colorize;
    eprintln!("{}: {error:#}", "Could not fit ellipsoid".red());
    match error.downcast_ref::<FitError>() {
        Some(FitError::DidNotConverge { .. }) => {
            eprintln!("Try a larger --max-iterations, or a looser --tolerance.");
        }
        Some(FitError::Numerical(
            NumericalError::RegularizationDominates { .. } | NumericalError::PointsOutside { .. },
        )) => {
            eprintln!("Try a smaller --regularization, or scale your points up.");
        }
        Some(FitError::Numerical(_)) => {
            eprintln!(
                "Your points might all lie in a lower-dimensional subspace (e.g. on a line in 2D)."
            );
        }
        _ => {}
    }
}
