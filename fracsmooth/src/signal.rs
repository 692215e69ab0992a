//! Frequency-domain signal adapter.
//!
//! Smoothing only needs three things from a signal: its one-sided spectrum,
//! its sampling rate and its time-domain sample count. [`FrequencyDomainSignal`]
//! captures exactly that so any signal container can be smoothed, and
//! [`FreqSignal`] is a minimal container implementing it.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle};
use crate::smoothing::traits::SpectrumSmooth;
use crate::smoothing::{FracSmoothConfig, FracSmoothKernel};
use ndarray::{Array1, Array2, ArrayView2};
use num_complex::Complex;
use tracing::warn;

/// A signal whose data can be read and rebuilt in the frequency domain.
pub trait FrequencyDomainSignal: Sized {
    /// One-sided spectrum laid out as `(channels, bins)`.
    fn freq(&self) -> ArrayView2<'_, Complex<f64>>;

    /// Sampling rate in Hz.
    fn sampling_rate(&self) -> f64;

    /// Number of samples of the time-domain signal.
    fn n_samples(&self) -> usize;

    /// Build a signal from frequency-domain data.
    fn from_freq(
        data: Array2<Complex<f64>>,
        sampling_rate: f64,
        n_samples: usize,
    ) -> Result<Self, ConfigError>;
}

/// Multi-channel one-sided spectrum with its sampling metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FreqSignal {
    data: Array2<Complex<f64>>,
    sampling_rate: f64,
    n_samples: usize,
}

impl FreqSignal {
    /// Wrap `(channels, bins)` spectrum data.
    ///
    /// Without `n_samples` an even time-domain length `(bins - 1) * 2` is
    /// assumed.
    pub fn new(
        data: Array2<Complex<f64>>,
        sampling_rate: f64,
        n_samples: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "sampling_rate",
                reason: "sampling_rate must be finite and > 0",
            });
        }
        let (n_channels, n_bins) = data.dim();
        if n_channels == 0 || n_bins == 0 {
            return Err(ConfigError::EmptyInput { arg: "data" });
        }
        let n_samples = match n_samples {
            Some(n) => {
                let expected = n / 2 + 1;
                if expected != n_bins {
                    return Err(ConfigError::LengthMismatch {
                        arg: "data",
                        expected,
                        got: n_bins,
                    });
                }
                n
            }
            None => {
                let n = (n_bins - 1) * 2;
                warn!(
                    n_bins,
                    n_samples = n,
                    "number of time samples not given, assuming an even count"
                );
                n
            }
        };
        if n_samples == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "n_samples",
                reason: "n_samples must be > 0",
            });
        }
        Ok(Self {
            data,
            sampling_rate,
            n_samples,
        })
    }

    /// Number of channels.
    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    /// Number of one-sided frequency bins.
    pub fn n_bins(&self) -> usize {
        self.data.ncols()
    }

    /// Bin centre frequencies in Hz, `k * fs / n_samples`.
    pub fn frequencies(&self) -> Array1<f64> {
        let step = self.sampling_rate / self.n_samples as f64;
        Array1::from_shape_fn(self.n_bins(), |k| k as f64 * step)
    }

    /// Consume the signal and return its spectrum.
    pub fn into_freq(self) -> Array2<Complex<f64>> {
        self.data
    }
}

impl FrequencyDomainSignal for FreqSignal {
    fn freq(&self) -> ArrayView2<'_, Complex<f64>> {
        self.data.view()
    }

    fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    fn n_samples(&self) -> usize {
        self.n_samples
    }

    fn from_freq(
        data: Array2<Complex<f64>>,
        sampling_rate: f64,
        n_samples: usize,
    ) -> Result<Self, ConfigError> {
        Self::new(data, sampling_rate, Some(n_samples))
    }
}

/// Smooth a signal's magnitude spectrum over `width` octaves.
///
/// The returned signal keeps the sampling rate, sample count and phase of the
/// input.
pub fn frac_smooth_signal<T>(signal: &T, width: f64) -> Result<T, ExecInvariantViolation>
where
    T: FrequencyDomainSignal,
{
    let kernel = FracSmoothKernel::try_new(FracSmoothConfig::new(width))?;
    let data = kernel.run_alloc(&signal.freq())?;
    Ok(T::from_freq(data, signal.sampling_rate(), signal.n_samples())?)
}
