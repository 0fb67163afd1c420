//! Operation traits.
//!
//! This module contains the trait definitions for the public operations.
//! Implementations live in the backend module (cpu/).

mod diagnostics;
mod newton_schulz;

pub use diagnostics::DiagnosticsOps;
pub use newton_schulz::NewtonSchulzOps;
