use crate::{Error, Result};
use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use num_complex::Complex;

/// Elementwise phase angle in radians, as `numpy.angle`.
pub fn angle<S, D>(z: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = Complex<f64>>,
    D: Dimension,
{
    z.mapv(|c| c.arg())
}

/// Elementwise magnitude, as `numpy.abs` on complex input.
pub fn abs<S, D>(z: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = Complex<f64>>,
    D: Dimension,
{
    z.mapv(|c| c.norm())
}

/// Combine amplitude and phase arrays into cartesian complex values.
///
/// Each output element is `a * (cos(p) + i sin(p))`.
///
/// # Errors
/// [`Error::ShapeMismatch`] if `amplitude` and `phase` differ in shape.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use fracsmooth_core::num_rs::polar2cartesian;
///
/// let z = polar2cartesian(&array![2.0, 1.0], &array![0.0, 0.0]).unwrap();
/// assert_eq!(z[0].re, 2.0);
/// assert_eq!(z[1].im, 0.0);
/// ```
pub fn polar2cartesian<S1, S2, D>(
    amplitude: &ArrayBase<S1, D>,
    phase: &ArrayBase<S2, D>,
) -> Result<Array<Complex<f64>, D>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    if amplitude.shape() != phase.shape() {
        return Err(Error::ShapeMismatch {
            left: amplitude.shape().to_vec(),
            right: phase.shape().to_vec(),
        });
    }
    Ok(Zip::from(amplitude)
        .and(phase)
        .map_collect(|&a, &p| Complex::from_polar(a, p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f64::consts::FRAC_PI_2;
    use ndarray::{array, Array2};

    #[test]
    fn angle_and_abs_split_polar_form() {
        let z = array![Complex::new(0.0, 2.0), Complex::new(-3.0, 0.0)];
        let a = abs(&z);
        let p = angle(&z);
        assert_abs_diff_eq!(a[0], 2.0);
        assert_abs_diff_eq!(a[1], 3.0);
        assert_abs_diff_eq!(p[0], FRAC_PI_2);
        assert_abs_diff_eq!(p[1], core::f64::consts::PI);
    }

    #[test]
    fn polar2cartesian_inverts_angle_and_abs() {
        let z = array![
            [Complex::new(1.0, -1.0), Complex::new(0.25, 4.0)],
            [Complex::new(-2.0, 0.5), Complex::new(0.0, 0.0)]
        ];
        let back = polar2cartesian(&abs(&z), &angle(&z)).expect("same shape");
        for (x, y) in z.iter().zip(back.iter()) {
            assert_abs_diff_eq!(x.re, y.re, epsilon = 1e-12);
            assert_abs_diff_eq!(x.im, y.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn polar2cartesian_rejects_shape_mismatch() {
        let amplitude = Array2::<f64>::zeros((2, 3));
        let phase = Array2::<f64>::zeros((3, 2));
        let err = polar2cartesian(&amplitude, &phase).expect_err("shapes differ");
        assert_eq!(
            err,
            Error::ShapeMismatch {
                left: vec![2, 3],
                right: vec![3, 2],
            }
        );
    }
}
