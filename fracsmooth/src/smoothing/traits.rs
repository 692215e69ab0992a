//! Trait interfaces for spectrum smoothing capabilities.

use crate::kernel::{ExecInvariantViolation, ReadSpectrum, WriteSpectrum};
use ndarray::Array2;
use num_complex::Complex;

/// Magnitude smoothing of a `(channels, bins)` complex spectrum.
pub trait SpectrumSmooth {
    /// Run smoothing into a caller-provided output buffer of the input's shape.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: ReadSpectrum + ?Sized,
        O: WriteSpectrum + ?Sized;

    /// Run smoothing and allocate a `(channels, bins)` output.
    fn run_alloc<I>(&self, input: &I) -> Result<Array2<Complex<f64>>, ExecInvariantViolation>
    where
        I: ReadSpectrum + ?Sized;
}
