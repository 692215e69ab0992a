//! Per-bin integration limits rasterized in log2-ratio space.
//!
//! Bin `k` integrates over `[k * 2^(-W/2), k * 2^(W/2)]`. That interval is cut
//! at the half-integer bin edges `j - 0.5` so every raster column `j` receives
//! the sub-interval it overlaps. Upper and lower edges of those sub-intervals
//! are stored as `log2(f / k)`.

use crate::kernel::ExecInvariantViolation;
use fracsmooth_core::num_rs::nan_to_num;
use ndarray::{s, Array3, ArrayView2, ArrayView3, ArrayViewMut1, Axis};

/// Lower and upper cutoff of bin `k` for a window `width` octaves wide.
pub fn cutoff_pair(k: usize, width: f64) -> (f64, f64) {
    let k = k as f64;
    let half = width / 2.0;
    (k * 2f64.powf(-half), k * 2f64.powf(half))
}

/// Raster length shared by all rows: `ceil(up_{N-1}) + 1`.
///
/// Fails with [`ExecInvariantViolation::InvalidState`] when the last upper
/// cutoff does not fit in `usize`.
pub fn raster_size(n_bins: usize, width: f64) -> Result<usize, ExecInvariantViolation> {
    let (_, up) = cutoff_pair(n_bins.saturating_sub(1), width);
    let last = up.ceil();
    if !last.is_finite() || last >= usize::MAX as f64 {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "smoothing raster length overflows usize",
        });
    }
    (last as usize)
        .checked_add(1)
        .ok_or(ExecInvariantViolation::InvalidState {
            reason: "smoothing raster length overflows usize",
        })
}

/// Number of `f64` cells in a `(rows, bins, raster)` tensor, if it can be allocated.
pub(crate) fn tensor_cells(rows: usize, n_bins: usize, size: usize) -> Option<usize> {
    let cells = rows.checked_mul(n_bins)?.checked_mul(size)?;
    let bytes = cells.checked_mul(core::mem::size_of::<f64>())?;
    (bytes <= isize::MAX as usize).then_some(cells)
}

/// Rasterized integration limits, shape `(bins, 2, raster)`.
///
/// Index 0 of the middle axis holds the upper edges, index 1 the lower edges.
/// Every row is normalised by its own centre bin `k`, so a column `j` holds
/// `log2(f / k)` rather than `log2(f / j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationLimits {
    limits: Array3<f64>,
    width: f64,
}

impl IntegrationLimits {
    /// Compute the limits of `n_bins` bins for a window `width` octaves wide.
    ///
    /// Entries outside a bin's window, and the whole of row 0, are exactly 0.
    pub fn compute(n_bins: usize, width: f64) -> Result<Self, ExecInvariantViolation> {
        if n_bins == 0 {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "integration limits need at least one bin",
            });
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "width must be finite and > 0",
            });
        }

        let size = raster_size(n_bins, width)?;
        if tensor_cells(n_bins, 2, size).is_none() {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "integration limits do not fit in memory",
            });
        }
        let mut limits = Array3::zeros((n_bins, 2, size));
        for (k, mut row) in limits.axis_iter_mut(Axis(0)).enumerate() {
            let (low, up) = cutoff_pair(k, width);
            let (upper, lower) = row.multi_slice_mut((s![0, ..], s![1, ..]));
            rasterize_bounds(low, up, upper, lower)?;

            // Row 0 divides by zero and is laundered to zeros below.
            let centre = k as f64;
            row.mapv_inplace(|f| (f / centre).log2());
        }
        nan_to_num(&mut limits, 0.0, 0.0, 0.0);

        Ok(Self { limits, width })
    }

    /// Number of frequency bins.
    pub fn n_bins(&self) -> usize {
        self.limits.len_of(Axis(0))
    }

    /// Shared raster length `S`.
    pub fn raster_size(&self) -> usize {
        self.limits.len_of(Axis(2))
    }

    /// Smoothing width in octaves the limits were computed for.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Upper edges, shape `(bins, raster)`.
    pub fn upper(&self) -> ArrayView2<'_, f64> {
        self.limits.index_axis(Axis(1), 0)
    }

    /// Lower edges, shape `(bins, raster)`.
    pub fn lower(&self) -> ArrayView2<'_, f64> {
        self.limits.index_axis(Axis(1), 1)
    }

    /// The full `(bins, 2, raster)` tensor.
    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.limits.view()
    }
}

/// Write the edges of `[low, up]` cut at half-integers into `upper` and `lower`.
///
/// Layout before normalization:
/// `upper = [0, .., 0, b, b + 1, .., up, 0, ..]`,
/// `lower = [0, .., 0, low, b, b + 1, .., 0, ..]`
/// where `b` is the first half-integer edge above `low`.
fn rasterize_bounds(
    low: f64,
    up: f64,
    mut upper: ArrayViewMut1<'_, f64>,
    mut lower: ArrayViewMut1<'_, f64>,
) -> Result<(), ExecInvariantViolation> {
    let low_ceil = low.ceil();
    let up_floor = up.floor();
    let begin = if low_ceil - low > 0.5 {
        low_ceil - 0.5
    } else {
        low_ceil + 0.5
    };
    let end = if up - up_floor > 0.5 {
        up_floor + 1.0
    } else {
        up_floor
    };
    let interior = if end > begin {
        (end - begin).ceil() as usize
    } else {
        0
    };

    let first = if interior > 0 { begin } else { up };
    let offset = first as usize;
    if offset + interior >= upper.len() {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "integration window exceeds the raster",
        });
    }

    lower[offset] = low;
    for i in 0..interior {
        let edge = begin + i as f64;
        upper[offset + i] = edge;
        lower[offset + i + 1] = edge;
    }
    upper[offset + interior] = up;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    fn raw_bounds(low: f64, up: f64, size: usize) -> (Array1<f64>, Array1<f64>) {
        let mut upper = Array1::zeros(size);
        let mut lower = Array1::zeros(size);
        rasterize_bounds(low, up, upper.view_mut(), lower.view_mut()).expect("fits raster");
        (upper, lower)
    }

    #[test]
    fn cutoffs_bracket_the_bin() {
        for k in 0..32 {
            let (low, up) = cutoff_pair(k, 1.0 / 3.0);
            assert!(low <= k as f64 && k as f64 <= up);
        }
        let (low, up) = cutoff_pair(4, 2.0);
        assert_abs_diff_eq!(low, 2.0);
        assert_abs_diff_eq!(up, 8.0);
    }

    #[test]
    fn raster_size_grows_with_width() {
        assert_eq!(raster_size(5, 1.0), Ok(7));
        let mut last = 0;
        for w in [0.01, 0.1, 1.0 / 3.0, 0.5, 1.0, 2.0, 4.0] {
            let s = raster_size(64, w).expect("raster fits");
            assert!(s >= 64);
            assert!(s >= last);
            last = s;
        }
    }

    #[test]
    fn bounds_cut_at_half_integers() {
        // low = 2.3 -> first edge 2.5; up = 5.7 -> last edge 5.5.
        let (upper, lower) = raw_bounds(2.3, 5.7, 8);
        assert_eq!(upper.to_vec(), vec![0.0, 0.0, 2.5, 3.5, 4.5, 5.5, 5.7, 0.0]);
        assert_eq!(lower.to_vec(), vec![0.0, 0.0, 2.3, 2.5, 3.5, 4.5, 5.5, 0.0]);
    }

    #[test]
    fn bounds_on_a_half_integer_move_to_the_next_edge() {
        // low sits on an integer: the first edge is low + 0.5.
        let (upper, lower) = raw_bounds(3.0, 5.3, 7);
        assert_eq!(upper.to_vec(), vec![0.0, 0.0, 0.0, 3.5, 4.5, 5.3, 0.0]);
        assert_eq!(lower.to_vec(), vec![0.0, 0.0, 0.0, 3.0, 3.5, 4.5, 0.0]);
    }

    #[test]
    fn narrow_window_occupies_one_column() {
        let (upper, lower) = raw_bounds(0.9, 1.1, 3);
        assert_eq!(upper.to_vec(), vec![0.0, 1.1, 0.0]);
        assert_eq!(lower.to_vec(), vec![0.0, 0.9, 0.0]);
    }

    #[test]
    fn oversized_window_is_rejected() {
        let mut upper = Array1::zeros(3);
        let mut lower = Array1::zeros(3);
        let err = rasterize_bounds(2.3, 5.7, upper.view_mut(), lower.view_mut())
            .expect_err("window does not fit");
        assert!(matches!(err, ExecInvariantViolation::InvalidState { .. }));
    }

    #[test]
    fn limits_are_finite_and_row_zero_is_empty() {
        let limits = IntegrationLimits::compute(16, 1.0).expect("valid limits");
        assert_eq!(limits.n_bins(), 16);
        assert_eq!(limits.raster_size(), raster_size(16, 1.0).expect("raster fits"));
        assert!(limits.view().iter().all(|v| v.is_finite()));
        assert!(limits.upper().row(0).iter().all(|v| *v == 0.0));
        assert!(limits.lower().row(0).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn limits_are_log2_ratios_to_the_centre_bin() {
        let limits = IntegrationLimits::compute(5, 1.0).expect("valid limits");
        // Bin 1 spans [2^-0.5, 2^0.5] inside column 1.
        assert_abs_diff_eq!(limits.upper()[[1, 1]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(limits.lower()[[1, 1]], -0.5, epsilon = 1e-12);
        // Bin 4 ends at 4 * 2^0.5 ~ 5.66 in column 6.
        assert_abs_diff_eq!(limits.upper()[[4, 6]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(limits.lower()[[4, 6]], (5.5f64 / 4.0).log2(), epsilon = 1e-12);
    }

    #[test]
    fn limits_reject_degenerate_arguments() {
        assert!(IntegrationLimits::compute(0, 1.0).is_err());
        assert!(IntegrationLimits::compute(8, 0.0).is_err());
        assert!(IntegrationLimits::compute(8, -1.0).is_err());
        assert!(IntegrationLimits::compute(8, f64::NAN).is_err());
    }

    #[test]
    fn huge_widths_are_rejected_without_overflow() {
        // 2^100 does not fit in usize.
        assert!(matches!(
            raster_size(2, 200.0),
            Err(ExecInvariantViolation::InvalidState { .. })
        ));
        assert!(IntegrationLimits::compute(2, 200.0).is_err());
        // The raster fits in usize but the (bins, 2, raster) tensor does not.
        assert!(raster_size(1024, 100.0).is_ok());
        assert!(matches!(
            IntegrationLimits::compute(1024, 100.0),
            Err(ExecInvariantViolation::InvalidState { .. })
        ));
        assert_eq!(tensor_cells(3, 4, 5), Some(60));
        assert_eq!(tensor_cells(usize::MAX, 2, 1), None);
    }
}
