//! numpy-flavoured element helpers.

mod elementwise;
mod polar;
mod reduce;

pub use elementwise::*;
pub use polar::*;
pub use reduce::*;
