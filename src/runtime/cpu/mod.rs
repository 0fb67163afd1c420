//! CPU runtime implementation
//!
//! The CPU runtime works on owned, contiguous row-major buffers. Batched
//! input is split into independent matrices that the client may dispatch
//! across a rayon pool (feature `rayon`, on by default).

mod client;
pub mod jacobi;
pub(crate) mod kernels;

pub use crate::tensor::Tensor;
pub use client::{CpuClient, ParallelismConfig};
