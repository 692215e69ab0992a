use crate::{Error, Result};
use ndarray::{s, ArrayBase, Data, Ix1};

/// Arithmetic mean of the last `stat_length` values of `x`.
///
/// This is the statistic `numpy.pad(..., mode="mean", stat_length=n)` uses for
/// the trailing side of a 1D array. A `stat_length` longer than `x` is clipped
/// to the whole array.
///
/// # Errors
/// [`Error::InvalidArg`] when `x` is empty or `stat_length` is zero.
pub fn tail_mean<S>(x: &ArrayBase<S, Ix1>, stat_length: usize) -> Result<f64>
where
    S: Data<Elem = f64>,
{
    if x.is_empty() {
        return Err(Error::InvalidArg {
            arg: "x".into(),
            reason: "cannot take the mean of an empty array".into(),
        });
    }
    if stat_length == 0 {
        return Err(Error::InvalidArg {
            arg: "stat_length".into(),
            reason: "stat_length must be > 0".into(),
        });
    }
    let n = stat_length.min(x.len());
    let tail = x.slice(s![x.len() - n..]);
    Ok(tail.sum() / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn tail_mean_uses_trailing_values() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(tail_mean(&x, 2).unwrap(), 4.5);
        assert_relative_eq!(tail_mean(&x, 1).unwrap(), 5.0);
        assert_relative_eq!(tail_mean(&x, 5).unwrap(), 3.0);
    }

    #[test]
    fn tail_mean_clips_long_windows() {
        let x = array![2.0, 4.0];
        assert_relative_eq!(tail_mean(&x, 10).unwrap(), 3.0);
    }

    #[test]
    fn tail_mean_rejects_degenerate_input() {
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert!(tail_mean(&empty, 1).is_err());
        assert!(tail_mean(&array![1.0], 0).is_err());
    }
}
