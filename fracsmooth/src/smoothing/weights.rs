use super::limits::IntegrationLimits;
use ndarray::{Array2, ArrayView2, Axis};

/// Per-bin smoothing weights, shape `(bins, raster)`.
///
/// Row `k` holds the share of bin `k`'s log2-frequency window that falls into
/// each raster column. Row 0 is the identity: bin 0 is never smoothed.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingWeights {
    weights: Array2<f64>,
}

impl SmoothingWeights {
    /// `(upper - lower) / width` for every entry, then `weight[0, 0] = 1`.
    pub fn from_limits(limits: &IntegrationLimits) -> Self {
        let mut weights = (&limits.upper() - &limits.lower()) / limits.width();
        weights[[0, 0]] = 1.0;
        Self { weights }
    }

    /// Number of frequency bins.
    pub fn n_bins(&self) -> usize {
        self.weights.len_of(Axis(0))
    }

    /// Shared raster length `S`.
    pub fn raster_size(&self) -> usize {
        self.weights.len_of(Axis(1))
    }

    /// Column of the first non-zero weight in row `k`.
    pub fn first_active(&self, k: usize) -> Option<usize> {
        self.weights.row(k).iter().position(|w| *w != 0.0)
    }

    /// Borrow the weight matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }
}
