//! Tensor operations
//!
//! This module defines the operation traits and their CPU implementations.
//!
//! # Design
//!
//! Operations are defined as traits implemented by the client, which owns the
//! parallelism policy used to dispatch batch elements.
//!
//! ```text
//! CpuClient
//!   ├── implements NewtonSchulzOps
//!   │     ├── orthogonalize                  (bf16, final iterate)
//!   │     ├── orthogonalize_trajectory       (f32, steps + 1 snapshots)
//!   │     └── *_with::<T, W>(options)        (explicit working type and options)
//!   └── implements DiagnosticsOps
//!         ├── singular_values                (one-sided Jacobi, f64)
//!         └── gram                           (M @ M^T per batch element)
//! ```
//!
//! Callers that need no configuration can use the free functions
//! [`orthogonalize`] and [`orthogonalize_trajectory`], which run on a default
//! client.

pub(crate) mod cpu;
mod traits;

pub use cpu::{orthogonalize, orthogonalize_trajectory};
pub use traits::{DiagnosticsOps, NewtonSchulzOps};
