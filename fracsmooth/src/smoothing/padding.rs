use super::weights::SmoothingWeights;
use crate::kernel::ExecInvariantViolation;
use fracsmooth_core::num_rs::tail_mean;
use ndarray::{s, Array3, ArrayBase, ArrayView3, Data, Ix2};

/// Number of trailing magnitudes averaged into the padding of each row.
///
/// Row `k` uses the samples from its first active raster column to the end of
/// the spectrum, clamped to `[1, bins]`.
pub fn mean_spans(weights: &SmoothingWeights) -> Vec<usize> {
    let n_bins = weights.n_bins();
    (0..n_bins)
        .map(|k| {
            let start = weights.first_active(k).unwrap_or(0);
            n_bins.saturating_sub(start).clamp(1, n_bins)
        })
        .collect()
}

/// Magnitude spectrum replicated per bin and mean-padded to the raster length.
///
/// Shape `(channels, bins, raster)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedMagnitude {
    data: Array3<f64>,
}

impl PaddedMagnitude {
    /// Pad each channel of `magnitude` for every row of `weights`.
    pub fn build<S>(
        magnitude: &ArrayBase<S, Ix2>,
        weights: &SmoothingWeights,
    ) -> Result<Self, ExecInvariantViolation>
    where
        S: Data<Elem = f64>,
    {
        let (n_channels, n_bins) = magnitude.dim();
        if n_bins != weights.n_bins() {
            return Err(ExecInvariantViolation::ShapeMismatch {
                arg: "magnitude",
                expected: (n_channels, weights.n_bins()),
                got: (n_channels, n_bins),
            });
        }

        let spans = mean_spans(weights);
        let mut data = Array3::zeros((n_channels, n_bins, weights.raster_size()));
        for (channel, mut block) in magnitude.outer_iter().zip(data.outer_iter_mut()) {
            for (&span, mut row) in spans.iter().zip(block.outer_iter_mut()) {
                row.slice_mut(s![..n_bins]).assign(&channel);
                row.slice_mut(s![n_bins..]).fill(tail_mean(&channel, span)?);
            }
        }
        Ok(Self { data })
    }

    /// `(channels, bins, raster)`.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Borrow the padded tensor.
    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoothing::IntegrationLimits;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn weights(n_bins: usize, width: f64) -> SmoothingWeights {
        SmoothingWeights::from_limits(&IntegrationLimits::compute(n_bins, width).expect("limits"))
    }

    #[test]
    fn spans_follow_the_window_start() {
        assert_eq!(mean_spans(&weights(5, 1.0)), vec![5, 4, 4, 3, 2]);
    }

    #[test]
    fn spans_never_exceed_the_spectrum() {
        let w = weights(16, 8.0);
        assert!(mean_spans(&w).iter().all(|m| (1..=16).contains(m)));
    }

    #[test]
    fn pads_with_the_mean_of_the_covered_tail() {
        let w = weights(5, 1.0);
        let magnitude = array![[1.0, 2.0, 3.0, 4.0, 5.0], [2.0, 2.0, 2.0, 2.0, 2.0]];
        let padded = PaddedMagnitude::build(&magnitude, &w).expect("padding");
        assert_eq!(padded.dim(), (2, 5, 7));

        let p = padded.view();
        for k in 0..5 {
            assert_eq!(p.slice(s![0, k, ..5]), magnitude.row(0));
        }
        assert_abs_diff_eq!(p[[0, 0, 6]], 3.0);
        assert_abs_diff_eq!(p[[0, 1, 5]], 3.5);
        assert_abs_diff_eq!(p[[0, 3, 5]], 4.0);
        assert_abs_diff_eq!(p[[0, 4, 6]], 4.5);
        assert!(p.slice(s![1, .., ..]).iter().all(|v| *v == 2.0));
    }

    #[test]
    fn rejects_mismatched_bins() {
        let w = weights(5, 1.0);
        let magnitude = ndarray::Array2::<f64>::ones((1, 4));
        let err = PaddedMagnitude::build(&magnitude, &w).expect_err("bins differ");
        assert!(matches!(err, ExecInvariantViolation::ShapeMismatch { .. }));
    }
}
