//! Core Tensor type

use super::{Layout, Shape};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::cpu::kernels;
use std::fmt;

/// Dense matrix, or batch of matrices, stored row-major on the host
///
/// `Tensor` is the fundamental data structure in zeropow. It consists of:
/// - **Data**: an owned, contiguous buffer of `T`
/// - **Layout**: shape and row-major strides
///
/// A tensor with shape `[b0, .., bk, rows, cols]` is read as a batch of
/// `b0 * .. * bk` independent `rows x cols` matrices. Every tensor owns its
/// buffer: operations such as `transpose` and `cast` materialize new data, so a
/// tensor handed to a caller can never be changed through another tensor.
///
/// # Example
///
/// ```
/// use zeropow::tensor::Tensor;
///
/// let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
/// let t = a.mt()?;
/// assert_eq!(t.shape(), &[3, 2]);
/// assert_eq!(t.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// # Ok::<(), zeropow::error::Error>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct Tensor<T: Element> {
    data: Vec<T>,
    layout: Layout,
}

impl<T: Element> Tensor<T> {
    /// Create a tensor from an owned buffer and a shape without checking lengths
    pub(crate) fn from_parts(data: Vec<T>, shape: &[usize]) -> Self {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        Self {
            data,
            layout: Layout::contiguous(shape),
        }
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice(data: &[T], shape: &[usize]) -> Self {
        Self::try_from_slice(data, shape).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions.
    pub fn try_from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::try_from_vec(data.to_vec(), shape)
    }

    /// Create a tensor taking ownership of `data`
    pub fn try_from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Self::from_parts(data, shape))
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize]) -> Self {
        let len: usize = shape.iter().product();
        Self::from_parts(vec![T::zero(); len], shape)
    }

    /// Stack equally-shaped matrices into a batch of shape `[n, rows, cols]`
    pub fn from_matrices(matrices: &[Tensor<T>]) -> Result<Self> {
        let first = matrices
            .first()
            .ok_or_else(|| Error::invalid_argument("matrices", "cannot stack an empty list"))?;
        let (rows, cols) = first.matrix_dims()?;
        if first.ndim() != 2 {
            return Err(Error::invalid_shape(
                first.shape(),
                "only 2-D matrices can be stacked",
            ));
        }

        let mut data = Vec::with_capacity(matrices.len() * rows * cols);
        for m in matrices {
            if m.shape() != first.shape() {
                return Err(Error::shape_mismatch(first.shape(), m.shape()));
            }
            data.extend_from_slice(&m.data);
        }
        Ok(Self::from_parts(data, &[matrices.len(), rows, cols]))
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// `(rows, cols)` of the trailing matrix
    ///
    /// Returns `Error::InvalidShape` for tensors with fewer than 2 dimensions.
    pub fn matrix_dims(&self) -> Result<(usize, usize)> {
        self.layout.shape_ref().matrix_dims().ok_or_else(|| {
            Error::invalid_shape(
                self.shape(),
                format!(
                    "expected a matrix or a batch of matrices (at least 2 dimensions), got {}",
                    self.ndim()
                ),
            )
        })
    }

    /// Number of matrices in the batch (1 for a plain matrix)
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.layout.shape_ref().batch_size()
    }

    /// Borrow the row-major buffer
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutably borrow the row-major buffer
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Copy the data out as a row-major `Vec`
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Consume the tensor, returning its row-major buffer
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// View the buffer as raw bytes (native endianness)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Iterate over the batch as row-major matrix slices
    pub fn matrices(&self) -> Result<std::slice::Chunks<'_, T>> {
        let (rows, cols) = self.matrix_dims()?;
        // chunks() rejects a zero size; empty matrices yield no chunks anyway
        Ok(self.data.chunks((rows * cols).max(1)))
    }

    /// Copy batch element `index` out as a 2-D tensor
    pub fn matrix(&self, index: usize) -> Result<Self> {
        let (rows, cols) = self.matrix_dims()?;
        let batch = self.batch_size();
        if index >= batch {
            return Err(Error::invalid_argument(
                "index",
                format!("matrix index {index} out of bounds for batch of {batch}"),
            ));
        }
        let len = rows * cols;
        let start = index * len;
        Ok(Self::from_parts(
            self.data[start..start + len].to_vec(),
            &[rows, cols],
        ))
    }

    /// Convert to another element type (round to nearest)
    pub fn cast<U: Element>(&self) -> Tensor<U> {
        let mut out = vec![U::zero(); self.data.len()];
        kernels::cast_kernel(&self.data, &mut out);
        Tensor::from_parts(out, self.shape())
    }

    /// Swap two dimensions, materializing the result
    ///
    /// Supports negative indexing: -1 is the last dimension.
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Result<Self> {
        let view = self
            .layout
            .transpose(dim0, dim1)
            .ok_or_else(|| Error::InvalidDimension {
                dim: if self.layout.normalize_dim(dim0).is_none() {
                    dim0
                } else {
                    dim1
                },
                ndim: self.ndim(),
            })?;

        let data: Vec<T> = view.offsets().map(|offset| self.data[offset]).collect();
        Ok(Self::from_parts(data, view.shape()))
    }

    /// Transpose of the last two dimensions of every batch element (`X^T`)
    pub fn mt(&self) -> Result<Self> {
        let (rows, cols) = self.matrix_dims()?;
        let mut out = vec![T::zero(); self.data.len()];
        kernels::transpose_kernel(&self.data, &mut out, self.batch_size(), rows, cols);

        let mut shape = Shape::from(self.shape());
        let n = shape.ndim();
        shape.swap(n - 2, n - 1);
        Ok(Self::from_parts(out, &shape))
    }

    /// Create a tensor of standard normal samples from a seeded generator
    ///
    /// The same `(shape, seed)` always produces the same values.
    pub fn randn_seeded(shape: &[usize], seed: u64) -> Self {
        let len: usize = shape.iter().product();
        let mut out = vec![T::zero(); len];
        kernels::randn_kernel(&mut out, seed);
        Self::from_parts(out, shape)
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::bf16;

    #[test]
    fn test_from_slice_shape_mismatch() {
        let err = Tensor::<f32>::try_from_slice(&[1.0, 2.0, 3.0], &[2, 2]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_matrix_dims_requires_rank_two() {
        let v = Tensor::<f32>::from_slice(&[1.0, 2.0], &[2]);
        assert!(matches!(v.matrix_dims(), Err(Error::InvalidShape { .. })));

        let b = Tensor::<f32>::zeros(&[3, 2, 5]);
        assert_eq!(b.matrix_dims().unwrap(), (2, 5));
        assert_eq!(b.batch_size(), 3);
    }

    #[test]
    fn test_mt_batched() {
        let data: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let t = Tensor::from_slice(&data, &[2, 2, 3]);
        let tt = t.mt().unwrap();
        assert_eq!(tt.shape(), &[2, 3, 2]);
        assert_eq!(
            tt.to_vec(),
            vec![
                0.0, 3.0, 1.0, 4.0, 2.0, 5.0, //
                6.0, 9.0, 7.0, 10.0, 8.0, 11.0
            ]
        );
        assert_eq!(tt.mt().unwrap(), t);
    }

    #[test]
    fn test_transpose_matches_mt() {
        let t = Tensor::<f64>::randn_seeded(&[3, 4, 2], 7);
        assert_eq!(t.transpose(-1, -2).unwrap(), t.mt().unwrap());
        assert!(matches!(
            t.transpose(0, 3),
            Err(Error::InvalidDimension { dim: 3, ndim: 3 })
        ));
    }

    #[test]
    fn test_cast_rounds_to_bf16() {
        let t = Tensor::from_slice(&[1.0f32, 0.1, -2.5, 3.0e-3], &[2, 2]);
        let b = t.cast::<bf16>();
        assert_eq!(b.dtype(), DType::BF16);
        let back: Vec<f32> = b.cast::<f32>().to_vec();
        for (x, y) in t.as_slice().iter().zip(back.iter()) {
            assert!((x - y).abs() <= x.abs() / 128.0);
        }
    }

    #[test]
    fn test_randn_seeded_is_deterministic() {
        let a = Tensor::<f32>::randn_seeded(&[4, 4], 42);
        let b = Tensor::<f32>::randn_seeded(&[4, 4], 42);
        let c = Tensor::<f32>::randn_seeded(&[4, 4], 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_from_matrices_and_matrix() {
        let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2]);
        let b = Tensor::from_slice(&[5.0f32, 6.0, 7.0, 8.0], &[2, 2]);
        let batch = Tensor::from_matrices(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(batch.shape(), &[2, 2, 2]);
        assert_eq!(batch.matrix(1).unwrap(), b);
        assert_eq!(batch.matrices().unwrap().count(), 2);
        assert!(batch.matrix(2).is_err());

        let wrong = Tensor::<f32>::zeros(&[2, 3]);
        assert!(matches!(
            Tensor::from_matrices(&[a, wrong]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_as_bytes_length() {
        let t = Tensor::<bf16>::zeros(&[3, 5]);
        assert_eq!(t.as_bytes().len(), 15 * DType::BF16.size_in_bytes());
    }
}
