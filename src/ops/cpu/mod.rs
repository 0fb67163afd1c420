//! CPU implementation of the operation traits.

pub mod diagnostics;
pub mod newton_schulz;

pub use newton_schulz::{orthogonalize, orthogonalize_trajectory};
