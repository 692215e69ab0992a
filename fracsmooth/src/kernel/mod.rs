//! Shared trait-first kernel substrate.
//!
//! This module defines the constructor validation lifecycle, the error model
//! and the spectrum buffer adapters used by the smoothing kernels.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;
