//! Matrix diagnostics used to inspect orthogonalization results

use crate::dtype::Element;
use crate::error::Result;
use crate::tensor::Tensor;

/// Diagnostics over matrices and batches of matrices
pub trait DiagnosticsOps {
    /// Singular values of every batch element, sorted descending
    ///
    /// Computed in f64 by one-sided Jacobi regardless of the element type.
    /// Each inner vector has `min(rows, cols)` entries; the outer vector has
    /// one entry per batch element.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `t` has fewer than 2 dimensions
    fn singular_values<T: Element>(&self, t: &Tensor<T>) -> Result<Vec<Vec<f64>>>;

    /// Gram matrix `M @ M^T` of every batch element
    ///
    /// For input `[..., rows, cols]` the result is `[..., rows, rows]`.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `t` has fewer than 2 dimensions
    fn gram<T: Element>(&self, t: &Tensor<T>) -> Result<Tensor<T>>;
}
