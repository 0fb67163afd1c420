//! # zeropow
//!
//! **Newton-Schulz orthogonalization of matrices and batches of matrices.**
//!
//! Given a matrix G, zeropow computes an approximately orthogonal matrix with
//! the same row and column spaces by running a fixed number of quintic
//! Newton-Schulz steps. Each step pushes every singular value toward 1 without
//! ever computing a decomposition, which makes it a cheap replacement for the
//! polar factor `U V^T` inside optimizer inner loops.
//!
//! ## Two entry points, one iteration
//!
//! - [`orthogonalize`](ops::NewtonSchulzOps::orthogonalize): bf16, final result only
//! - [`orthogonalize_trajectory`](ops::NewtonSchulzOps::orthogonalize_trajectory):
//!   f32, every intermediate iterate for inspection
//!
//! Both share the iteration in [`algorithm::newton_schulz`]; only working
//! precision and snapshot retention differ.
//!
//! ## Quick Start
//!
//! ```
//! use zeropow::prelude::*;
//!
//! let client = CpuClient::new();
//! let g = Tensor::<f32>::randn_seeded(&[8, 16], 42);
//!
//! let x = client.orthogonalize(&g, 5)?;
//! assert_eq!(x.shape(), &[8, 16]);
//!
//! let trajectory = client.orthogonalize_trajectory(&g, 5)?;
//! assert_eq!(trajectory.len(), 6);
//!
//! let analysis = analyze_trajectory(&client, &trajectory)?;
//! assert!(analysis.is_contracting());
//! # Ok::<(), zeropow::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): dispatch batch elements across threads

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod algorithm;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

pub use half::{bf16, f16};
pub use ops::{orthogonalize, orthogonalize_trajectory};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::{
        NewtonSchulzCoefficients, NewtonSchulzOptions, TrajectoryAnalysis, analyze_trajectory,
    };
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::ops::{DiagnosticsOps, NewtonSchulzOps};
    pub use crate::runtime::cpu::{CpuClient, ParallelismConfig};
    pub use crate::tensor::Tensor;
    pub use half::{bf16, f16};
}
