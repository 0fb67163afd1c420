//! Newton-Schulz orthogonalization operations trait

use crate::algorithm::newton_schulz::NewtonSchulzOptions;
use crate::dtype::Element;
use crate::error::Result;
use crate::tensor::Tensor;
use half::bf16;

/// Approximate orthogonalization by a fixed number of Newton-Schulz steps
///
/// Both entry points run the same iteration (see
/// [`crate::algorithm::newton_schulz`]) and differ only in working precision
/// and in whether intermediate iterates are kept:
///
/// | Method | Working type | Returns |
/// |--------|--------------|---------|
/// | `orthogonalize` | bf16 | final iterate only |
/// | `orthogonalize_trajectory` | f32 | `steps + 1` snapshots |
///
/// Inputs are matrices `[rows, cols]` or batches `[..., rows, cols]`. Each batch
/// element is normalized by its own Frobenius norm and iterated independently.
/// Tall matrices (rows > cols) are iterated in transposed form and transposed
/// back, so every output has the input's shape.
///
/// The default polynomial does not converge to an exactly orthogonal matrix:
/// singular values end up spread over roughly [0.68, 1.2].
pub trait NewtonSchulzOps {
    /// Orthogonalize `g` in bf16, returning only the final iterate
    ///
    /// Meant for optimizer inner loops: it keeps no history and never logs.
    ///
    /// # Arguments
    ///
    /// * `g` - Matrix `[rows, cols]` or batch `[..., rows, cols]` of any element type
    /// * `steps` - Number of update steps; 0 returns the normalized input
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `g` has fewer than 2 dimensions
    ///
    /// # Example
    ///
    /// ```
    /// use zeropow::prelude::*;
    ///
    /// let client = CpuClient::new();
    /// let g = Tensor::<f32>::randn_seeded(&[4, 8], 0);
    /// let x = client.orthogonalize(&g, 5)?;
    /// assert_eq!(x.shape(), &[4, 8]);
    /// assert_eq!(x.dtype(), DType::BF16);
    /// # Ok::<(), zeropow::error::Error>(())
    /// ```
    fn orthogonalize<T: Element>(&self, g: &Tensor<T>, steps: usize) -> Result<Tensor<bf16>> {
        self.orthogonalize_with::<T, bf16>(g, &NewtonSchulzOptions::new(steps))
    }

    /// Orthogonalize `g` in f32, returning every iterate `X_0 ..= X_steps`
    ///
    /// `X_0` is the normalized input in the caller's orientation. Every
    /// snapshot is an independent tensor with the input's shape.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `g` has fewer than 2 dimensions
    fn orthogonalize_trajectory<T: Element>(
        &self,
        g: &Tensor<T>,
        steps: usize,
    ) -> Result<Vec<Tensor<f32>>> {
        self.orthogonalize_trajectory_with::<T, f32>(g, &NewtonSchulzOptions::new(steps))
    }

    /// Orthogonalize in working type `W` with explicit options
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `g` has fewer than 2 dimensions
    /// - `InvalidArgument` if `options` fail [`NewtonSchulzOptions::validate`]
    fn orthogonalize_with<T: Element, W: Element>(
        &self,
        g: &Tensor<T>,
        options: &NewtonSchulzOptions,
    ) -> Result<Tensor<W>>;

    /// Record the trajectory in working type `W` with explicit options
    ///
    /// Returns `options.steps + 1` snapshots.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if `g` has fewer than 2 dimensions
    /// - `InvalidArgument` if `options` fail [`NewtonSchulzOptions::validate`]
    fn orthogonalize_trajectory_with<T: Element, W: Element>(
        &self,
        g: &Tensor<T>,
        options: &NewtonSchulzOptions,
    ) -> Result<Vec<Tensor<W>>>;
}
