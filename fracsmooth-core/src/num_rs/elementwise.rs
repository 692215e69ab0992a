use ndarray::{ArrayBase, DataMut, Dimension};

/// Replace non-finite entries in place, as `numpy.nan_to_num`.
///
/// `NaN` becomes `nan`, `+inf` becomes `posinf` and `-inf` becomes `neginf`.
pub fn nan_to_num<S, D>(x: &mut ArrayBase<S, D>, nan: f64, posinf: f64, neginf: f64)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    x.mapv_inplace(|v| {
        if v.is_nan() {
            nan
        } else if v == f64::INFINITY {
            posinf
        } else if v == f64::NEG_INFINITY {
            neginf
        } else {
            v
        }
    });
}
