//! Array helpers shared by the `fracsmooth` kernels.
//!
//! The [`num_rs`] module mirrors the small slice of numpy behaviour the
//! smoothing pipeline leans on: polar/cartesian conversion, `nan_to_num`
//! laundering and tail means.

#![deny(missing_docs)]

mod error;
pub mod num_rs;

pub use error::*;
