//! Algorithm cores shared by the operations
//!
//! The operation traits in [`crate::ops`] decide precision, orientation and
//! batch dispatch. Everything that defines the mathematics lives here, once:
//!
//! - [`newton_schulz`] - coefficients, options and the per-matrix iteration
//! - [`analysis`] - singular value and Gram diagnostics of a trajectory
//!
//! ```text
//! orthogonalize (bf16) ─────────┐
//!                               ├──> prepare ──> normalize ──> iterate
//! orthogonalize_trajectory (f32)┘                               │
//!                                                     observe(k, X_k)
//! ```

pub mod analysis;
pub mod newton_schulz;

pub use analysis::{
    StepDiagnostics, TrajectoryAnalysis, ValueRange, analyze_trajectory, max_deviation_from_one,
};
pub use newton_schulz::{
    DEFAULT_STEPS, NORM_EPS, NewtonSchulzCoefficients, NewtonSchulzOptions, NewtonSchulzWorkspace,
};
