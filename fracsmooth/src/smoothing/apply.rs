use super::padding::PaddedMagnitude;
use super::weights::SmoothingWeights;
use crate::kernel::ExecInvariantViolation;
use fracsmooth_core::num_rs::{angle, polar2cartesian};
use ndarray::{Array2, ArrayBase, ArrayView2, Data, Ix2, Zip};
use num_complex::Complex;

/// Weighted reduction over the raster axis: `sum_j padded[c, k, j] * weight[k, j]`.
///
/// The weights are shared by every channel.
pub fn reduce_weighted(
    padded: &PaddedMagnitude,
    weights: &SmoothingWeights,
) -> Result<Array2<f64>, ExecInvariantViolation> {
    let (n_channels, n_bins, size) = padded.dim();
    let w = weights.view();
    if w.dim() != (n_bins, size) {
        return Err(ExecInvariantViolation::ShapeMismatch {
            arg: "weights",
            expected: (n_bins, size),
            got: w.dim(),
        });
    }

    let padded = padded.view();
    let mut magnitude = Array2::zeros((n_channels, n_bins));
    for (block, mut smoothed) in padded.outer_iter().zip(magnitude.outer_iter_mut()) {
        Zip::from(&mut smoothed)
            .and(block.rows())
            .and(w.rows())
            .for_each(|m, x, wk| *m = x.dot(&wk));
    }
    Ok(magnitude)
}

/// Attach the phase of `original` to `magnitude`.
pub fn recombine<S>(
    magnitude: &ArrayBase<S, Ix2>,
    original: ArrayView2<'_, Complex<f64>>,
) -> Result<Array2<Complex<f64>>, ExecInvariantViolation>
where
    S: Data<Elem = f64>,
{
    let phase = angle(&original);
    Ok(polar2cartesian(magnitude, &phase)?)
}
