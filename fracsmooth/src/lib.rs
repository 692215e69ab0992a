//! Fractional-octave smoothing for complex spectra.
//!
//! Smoothing widens the averaging window in proportion to frequency, which
//! keeps a constant relative bandwidth (constant-Q) across the spectrum. This
//! is the usual way to make measured transfer functions such as head-related
//! or room transfer functions readable without touching their phase.
//!
//! ```
//! use ndarray::Array2;
//! use num_complex::Complex;
//! use fracsmooth::kernel::KernelLifecycle;
//! use fracsmooth::smoothing::traits::SpectrumSmooth;
//! use fracsmooth::smoothing::{FracSmoothConfig, FracSmoothKernel};
//!
//! let kernel = FracSmoothKernel::try_new(FracSmoothConfig::new(1.0 / 3.0)).unwrap();
//! let spectrum = Array2::from_elem((2, 257), Complex::new(0.5, 0.5));
//! let smoothed = kernel.run_alloc(&spectrum).unwrap();
//! assert_eq!(smoothed.dim(), (2, 257));
//! ```

#![deny(missing_docs)]

pub mod kernel;
pub mod signal;
pub mod smoothing;

pub use fracsmooth_core::num_rs;
