//! Leverage scores `gᵢ = qᵢᵀ·M⁻¹·qᵢ`, and which point has the largest.
use faer::MatRef;
use rayon::prelude::*;

use super::LiftedMatrix;
use crate::NumericalError;

/// Don't hand rayon chunks smaller than this, the scheduling overhead would dominate.
const MIN_CHUNK_LEN: usize = 256;

/// Fill `scores` with every point's leverage, and return the index and value of the largest.
/// Ties go to the lowest index, whether or not the work was split across threads.
pub(super) fn most_extremal(
    lifted: &LiftedMatrix,
    gram_inv: MatRef<'_, f64>,
    scores: &mut [f64],
    parallel: bool,
) -> Result<(usize, f64), NumericalError> {
    let k = lifted.num_rows();
    debug_assert_eq!(scores.len(), lifted.num_points());
    // Row-major copy, so the closures below only share plain slices.
    let inv: Vec<f64> = (0..k * k).map(|idx| gram_inv[(idx / k, idx % k)]).collect();

    let chunk_len = if parallel {
        scores
            .len()
            .div_ceil(rayon::current_num_threads())
            .max(MIN_CHUNK_LEN)
    } else {
        scores.len().max(1)
    };

    let fill = |(chunk_idx, chunk): (usize, &mut [f64])| {
        let start = chunk_idx * chunk_len;
        for (offset, score) in chunk.iter_mut().enumerate() {
            *score = quadratic_form(&inv, lifted.column(start + offset));
        }
        largest_in(start, chunk)
    };
    let per_chunk: Vec<Option<(usize, f64)>> = if parallel {
        scores.par_chunks_mut(chunk_len).enumerate().map(fill).collect()
    } else {
        scores.chunks_mut(chunk_len).enumerate().map(fill).collect()
    };

    // Chunks are in index order, so only a strictly larger score may replace the current best.
    let mut best: Option<(usize, f64)> = None;
    for chunk_best in per_chunk {
        let (i, g) = chunk_best.ok_or(NumericalError::NonFinite {
            stage: "leverage scores",
        })?;
        if best.is_none_or(|(_, m)| g > m) {
            best = Some((i, g));
        }
    }
    best.ok_or(NumericalError::NonFinite {
        stage: "leverage scores",
    })
}

/// `qᵀ·A·q`, where `a` is a row-major square matrix.
fn quadratic_form(a: &[f64], q: &[f64]) -> f64 {
    a.chunks_exact(q.len())
        .zip(q)
        .map(|(row, qi)| qi * row.iter().zip(q).map(|(aij, qj)| aij * qj).sum::<f64>())
        .sum()
}

/// None if any score isn't finite.
fn largest_in(start: usize, chunk: &[f64]) -> Option<(usize, f64)> {
    let mut best = (start, f64::NEG_INFINITY);
    for (offset, &g) in chunk.iter().enumerate() {
        if !g.is_finite() {
            return None;
        }
        if g > best.1 {
            best = (start + offset, g);
        }
    }
    Some(best)
}
