use super::{IterationStats, LiftedMatrix, invert_spd, leverage};
use crate::{Config, FitError, NumericalError};

/// Weights which satisfied the stopping rule.
pub(super) struct Converged {
    pub weights: Vec<f64>,
    pub iterations: usize,
    pub final_error: f64,
}

/// Repeatedly move weight onto the point with the largest leverage score,
/// until the weights stop changing.
pub(super) fn iterate<F>(
    lifted: &LiftedMatrix,
    config: &Config,
    observer: &mut F,
) -> Result<Converged, FitError>
where
    F: FnMut(&IterationStats),
{
    let n = lifted.num_points();
    let d_plus_1 = lifted.num_rows() as f64;
    let parallel = config.parallelism.use_rayon(n);
    if parallel {
        log::debug!(
            "Scoring leverage on up to {} threads",
            rayon::current_num_threads()
        );
    }

    let mut weights = vec![1.0 / n as f64; n];
    let mut scores = vec![0.0; n];
    let mut last_error = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let gram = lifted.gram(&weights, config.regularization);
        let gram_inv = invert_spd(gram.as_ref(), "Gram")?;
        let (index, max_leverage) =
            leverage::most_extremal(lifted, gram_inv.as_ref(), &mut scores, parallel)?;
        if max_leverage <= 1.0 {
            return Err(NumericalError::LeverageCollapsed { max_leverage }.into());
        }

        let raw_step = (max_leverage - d_plus_1) / (d_plus_1 * (max_leverage - 1.0));
        // Near the optimum, regularization can push the largest score just below d+1,
        // giving a step slightly below 0. Anything further below means λ swamps the
        // points, and the weights would "converge" wherever they started.
        if raw_step < -config.tolerance {
            log::warn!(
                "Max leverage {max_leverage} is far below {d_plus_1} at iteration {iteration}"
            );
            return Err(NumericalError::RegularizationDominates { max_leverage }.into());
        }
        // A negative step would leave the simplex, so stop moving instead.
        let step_size = raw_step.max(0.0);

        let mut sum_sq = 0.0;
        for (i, w) in weights.iter_mut().enumerate() {
            let mut next = (1.0 - step_size) * *w;
            if i == index {
                next += step_size;
            }
            let change = next - *w;
            sum_sq += change * change;
            *w = next;
        }
        let error = libm::sqrt(sum_sq);
        last_error = error;

        log::trace!(
            "iteration {iteration}: error = {error:e}, max leverage = {max_leverage} at point {index}, step = {step_size:e}"
        );
        observer(&IterationStats {
            iteration,
            error,
            max_leverage,
            index,
            step_size,
            weight_sum: weights.iter().sum(),
            min_weight: weights.iter().copied().fold(f64::INFINITY, libm::fmin),
        });

        if error <= config.tolerance {
            return Ok(Converged {
                weights,
                iterations: iteration,
                final_error: error,
            });
        }
    }

    log::warn!(
        "Gave up after {} iterations, last error was {last_error:e}",
        config.max_iterations
    );
    Err(FitError::DidNotConverge {
        iterations: config.max_iterations,
        last_error,
    })
}
