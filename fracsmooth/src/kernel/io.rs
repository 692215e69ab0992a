use super::ConfigError;

use ndarray::{ArrayBase, ArrayView2, ArrayViewMut2, Axis, Data, DataMut, Ix1, Ix2};
use num_complex::Complex;

/// Adapter trait for reading a complex spectrum laid out as `(channels, bins)`.
///
/// One-dimensional containers are promoted to a single channel.
pub trait ReadSpectrum {
    /// Borrow the underlying spectrum as a `(channels, bins)` view.
    fn read_spectrum(&self) -> Result<ArrayView2<'_, Complex<f64>>, ConfigError>;
}

/// Adapter trait for writing a complex spectrum laid out as `(channels, bins)`.
pub trait WriteSpectrum {
    /// Borrow the underlying output as a mutable `(channels, bins)` view.
    fn write_spectrum_mut(&mut self) -> Result<ArrayViewMut2<'_, Complex<f64>>, ConfigError>;
}

impl ReadSpectrum for [Complex<f64>] {
    fn read_spectrum(&self) -> Result<ArrayView2<'_, Complex<f64>>, ConfigError> {
        ArrayView2::from_shape((1, self.len()), self)
            .map_err(|_| ConfigError::Layout { arg: "slice" })
    }
}

impl WriteSpectrum for [Complex<f64>] {
    fn write_spectrum_mut(&mut self) -> Result<ArrayViewMut2<'_, Complex<f64>>, ConfigError> {
        let n = self.len();
        ArrayViewMut2::from_shape((1, n), self)
            .map_err(|_| ConfigError::Layout { arg: "slice" })
    }
}

impl<const N: usize> ReadSpectrum for [Complex<f64>; N] {
    fn read_spectrum(&self) -> Result<ArrayView2<'_, Complex<f64>>, ConfigError> {
        self.as_slice().read_spectrum()
    }
}

impl<const N: usize> WriteSpectrum for [Complex<f64>; N] {
    fn write_spectrum_mut(&mut self) -> Result<ArrayViewMut2<'_, Complex<f64>>, ConfigError> {
        self.as_mut_slice().write_spectrum_mut()
    }
}

impl ReadSpectrum for Vec<Complex<f64>> {
    fn read_spectrum(&self) -> Result<ArrayView2<'_, Complex<f64>>, ConfigError> {
        self.as_slice().read_spectrum()
    }
}

impl WriteSpectrum for Vec<Complex<f64>> {
    fn write_spectrum_mut(&mut self) -> Result<ArrayViewMut2<'_, Complex<f64>>, ConfigError> {
        self.as_mut_slice().write_spectrum_mut()
    }
}

impl<S> ReadSpectrum for ArrayBase<S, Ix1>
where
    S: Data<Elem = Complex<f64>>,
{
    fn read_spectrum(&self) -> Result<ArrayView2<'_, Complex<f64>>, ConfigError> {
        Ok(self.view().insert_axis(Axis(0)))
    }
}

impl<S> WriteSpectrum for ArrayBase<S, Ix1>
where
    S: DataMut<Elem = Complex<f64>>,
{
    fn write_spectrum_mut(&mut self) -> Result<ArrayViewMut2<'_, Complex<f64>>, ConfigError> {
        Ok(self.view_mut().insert_axis(Axis(0)))
    }
}

impl<S> ReadSpectrum for ArrayBase<S, Ix2>
where
    S: Data<Elem = Complex<f64>>,
{
    fn read_spectrum(&self) -> Result<ArrayView2<'_, Complex<f64>>, ConfigError> {
        Ok(self.view())
    }
}

impl<S> WriteSpectrum for ArrayBase<S, Ix2>
where
    S: DataMut<Elem = Complex<f64>>,
{
    fn write_spectrum_mut(&mut self) -> Result<ArrayViewMut2<'_, Complex<f64>>, ConfigError> {
        Ok(self.view_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadSpectrum, WriteSpectrum};
    use ndarray::{Array1, Array2};
    use num_complex::Complex;

    #[test]
    fn one_dimensional_inputs_become_one_channel() {
        let v = vec![Complex::new(1.0, 0.0); 4];
        assert_eq!(v.read_spectrum().expect("vec adapter").dim(), (1, 4));

        let a = [Complex::new(0.0, 1.0); 3];
        assert_eq!(a.read_spectrum().expect("array adapter").dim(), (1, 3));

        let arr = Array1::from(v.clone());
        let view = arr.read_spectrum().expect("array1 adapter");
        assert_eq!(view.dim(), (1, 4));
        assert_eq!(view[[0, 2]], Complex::new(1.0, 0.0));
    }

    #[test]
    fn two_dimensional_inputs_keep_their_layout() {
        let arr = Array2::<Complex<f64>>::zeros((3, 7));
        assert_eq!(arr.read_spectrum().expect("array2 adapter").dim(), (3, 7));

        let t = arr.t();
        assert_eq!(t.read_spectrum().expect("transposed view").dim(), (7, 3));
    }

    #[test]
    fn write_adapters_expose_mutable_views() {
        let mut out = vec![Complex::new(0.0, 0.0); 2];
        out.write_spectrum_mut()
            .expect("vec write adapter")
            .fill(Complex::new(2.0, -1.0));
        assert_eq!(out, vec![Complex::new(2.0, -1.0); 2]);

        let mut arr = Array2::<Complex<f64>>::zeros((2, 2));
        arr.write_spectrum_mut()
            .expect("array2 write adapter")
            .row_mut(1)
            .fill(Complex::new(1.0, 1.0));
        assert_eq!(arr[[1, 0]], Complex::new(1.0, 1.0));
        assert_eq!(arr[[0, 0]], Complex::new(0.0, 0.0));
    }
}
