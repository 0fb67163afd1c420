//! CPU kernel implementations
//!
//! This module provides low-level compute kernels for CPU operations.
//! Kernels are generic over `T: Element`, work on contiguous row-major
//! slices and never allocate more than one row of scratch space.

pub mod matmul;
pub mod memory;
pub mod norm;

// Re-export all kernel functions for convenient access
pub use matmul::{gram_kernel, matmul_axpby_kernel};
pub use memory::{cast_kernel, randn_kernel, transpose_kernel};
pub use norm::frobenius_normalize_kernel;
