use super::apply::{recombine, reduce_weighted};
use super::limits::{raster_size, tensor_cells, IntegrationLimits};
use super::padding::PaddedMagnitude;
use super::traits::SpectrumSmooth;
use super::weights::SmoothingWeights;
use crate::kernel::{
    ConfigError, ExecInvariantViolation, KernelLifecycle, ReadSpectrum, WriteSpectrum,
};
use fracsmooth_core::num_rs::abs;
use ndarray::{Array, Array2, ArrayBase, ArrayView2, Axis, Data, Dimension, Ix1, Ix2};
use num_complex::Complex;
use tracing::debug;

/// Constructor config for [`FracSmoothKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FracSmoothConfig {
    /// Width of the smoothing window in octaves, e.g. `1.0 / 3.0`.
    pub width: f64,
    /// Largest raster length a run may allocate.
    ///
    /// The raster grows as `bins * 2^(width / 2)`; runs above the bound are
    /// rejected before any tensor is built. `None` disables the check.
    pub max_raster_size: Option<usize>,
}

impl FracSmoothConfig {
    /// Config for `width` octaves with no raster bound.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            max_raster_size: None,
        }
    }
}

/// Trait-first fractional-octave smoothing kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FracSmoothKernel {
    width: f64,
    max_raster_size: Option<usize>,
}

impl FracSmoothKernel {
    /// Configured smoothing width in octaves.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Configured raster bound, if any.
    pub fn max_raster_size(&self) -> Option<usize> {
        self.max_raster_size
    }

    fn smooth(
        &self,
        spectrum: ArrayView2<'_, Complex<f64>>,
    ) -> Result<Array2<Complex<f64>>, ExecInvariantViolation> {
        let (n_channels, n_bins) = spectrum.dim();
        if n_channels == 0 {
            return Err(ConfigError::EmptyInput { arg: "channels" }.into());
        }
        if n_bins == 0 {
            return Err(ConfigError::EmptyInput { arg: "bins" }.into());
        }
        if spectrum.iter().any(|z| !z.is_finite()) {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "spectrum must contain only finite values",
            });
        }
        let size = raster_size(n_bins, self.width)?;
        if self.max_raster_size.is_some_and(|max| size > max) {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "smoothing raster exceeds max_raster_size",
            });
        }
        // Limits are (bins, 2, raster), padded magnitudes (channels, bins, raster).
        if tensor_cells(n_channels.max(2), n_bins, size).is_none() {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "smoothing raster does not fit in memory",
            });
        }
        debug!(
            n_channels,
            n_bins,
            raster_size = size,
            width = self.width,
            "fractional octave smoothing"
        );

        let limits = IntegrationLimits::compute(n_bins, self.width)?;
        let weights = SmoothingWeights::from_limits(&limits);
        let padded = PaddedMagnitude::build(&abs(&spectrum), &weights)?;
        let magnitude = reduce_weighted(&padded, &weights)?;
        recombine(&magnitude, spectrum)
    }
}

impl KernelLifecycle for FracSmoothKernel {
    type Config = FracSmoothConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !config.width.is_finite() || config.width <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "width",
                reason: "width must be finite and > 0",
            });
        }
        if config.max_raster_size == Some(0) {
            return Err(ConfigError::InvalidArgument {
                arg: "max_raster_size",
                reason: "max_raster_size must be > 0",
            });
        }
        Ok(Self {
            width: config.width,
            max_raster_size: config.max_raster_size,
        })
    }
}

impl SpectrumSmooth for FracSmoothKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: ReadSpectrum + ?Sized,
        O: WriteSpectrum + ?Sized,
    {
        let spectrum = input.read_spectrum()?;
        let mut out = out.write_spectrum_mut()?;
        if out.dim() != spectrum.dim() {
            return Err(ExecInvariantViolation::ShapeMismatch {
                arg: "out",
                expected: spectrum.dim(),
                got: out.dim(),
            });
        }
        let smoothed = self.smooth(spectrum)?;
        out.assign(&smoothed);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Array2<Complex<f64>>, ExecInvariantViolation>
    where
        I: ReadSpectrum + ?Sized,
    {
        self.smooth(input.read_spectrum()?)
    }
}

/// Smooth the magnitude of a complex spectrum over fractions of an octave.
///
/// `spectrum` is either one channel of bins (1D) or `(channels, bins)` (2D);
/// the result has the same shape. Bin `k` is replaced by a weighted average of
/// the magnitudes between `k * 2^(-width/2)` and `k * 2^(width/2)` while its
/// phase is kept as is. Bin 0 is returned unchanged. Near the end of the
/// spectrum the window is completed with the mean of the covered tail.
///
/// # Errors
/// - [`ConfigError::InvalidArgument`] for a non-finite or non-positive `width`,
///   or a spectrum that is neither 1D nor 2D.
/// - [`ConfigError::EmptyInput`] for a spectrum without channels or bins.
/// - [`ExecInvariantViolation::InvalidState`] for non-finite spectrum values,
///   or a `width` so large that the smoothing raster cannot be allocated.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use num_complex::Complex;
/// use fracsmooth::smoothing::frac_smooth;
///
/// let spectrum = array![
///     Complex::new(1.0, 0.0),
///     Complex::new(2.0, 0.0),
///     Complex::new(3.0, 0.0),
///     Complex::new(4.0, 0.0),
///     Complex::new(5.0, 0.0),
/// ];
/// let smoothed = frac_smooth(&spectrum, 1.0).unwrap();
/// assert_eq!(smoothed.len(), 5);
/// assert_eq!(smoothed[0], Complex::new(1.0, 0.0));
/// assert!((smoothed[2].re - 3.0931094043914813).abs() < 1e-12);
/// ```
pub fn frac_smooth<S, D>(
    spectrum: &ArrayBase<S, D>,
    width: f64,
) -> Result<Array<Complex<f64>, D>, ExecInvariantViolation>
where
    S: Data<Elem = Complex<f64>>,
    D: Dimension,
{
    let kernel = FracSmoothKernel::try_new(FracSmoothConfig::new(width))?;
    let view = spectrum.view().into_dyn();
    let smoothed = match view.ndim() {
        1 => {
            let bins = view
                .into_dimensionality::<Ix1>()
                .map_err(|_| ConfigError::Layout { arg: "spectrum" })?;
            kernel
                .run_alloc(&bins)?
                .index_axis_move(Axis(0), 0)
                .into_dyn()
        }
        2 => {
            let channels = view
                .into_dimensionality::<Ix2>()
                .map_err(|_| ConfigError::Layout { arg: "spectrum" })?;
            kernel.run_alloc(&channels)?.into_dyn()
        }
        _ => {
            return Err(ConfigError::InvalidArgument {
                arg: "spectrum",
                reason: "spectrum must be 1D (bins) or 2D (channels, bins)",
            }
            .into())
        }
    };
    Ok(smoothed
        .into_dimensionality::<D>()
        .map_err(|_| ConfigError::Layout { arg: "spectrum" })?)
}
