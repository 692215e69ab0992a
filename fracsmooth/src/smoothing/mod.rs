//! Fractional-octave smoothing of complex spectra.
//!
//! The magnitude of every bin is averaged over a window that spans a fixed
//! fraction of an octave, so the window widens in proportion to frequency.
//! Phase is left untouched.
//!
//! The pipeline runs in four stages, each producing a new immutable value:
//!
//! 1. [`IntegrationLimits::compute`] cuts each bin's window at the raster
//!    columns and stores the edges as log2 frequency ratios.
//! 2. [`SmoothingWeights::from_limits`] turns the edges into weight rows.
//! 3. [`PaddedMagnitude::build`] extends each magnitude row past the last bin
//!    with the mean of the tail the window covers.
//! 4. [`reduce_weighted`] and [`recombine`] sum the weighted magnitudes and
//!    reattach the original phase.
//!
//! [`FracSmoothKernel`] and [`frac_smooth`] sequence the stages.

mod apply;
mod frac_smooth;
mod limits;
mod padding;
pub mod traits;
mod weights;

pub use apply::*;
pub use frac_smooth::*;
pub use limits::*;
pub use padding::*;
pub use weights::*;
