//! Layout: shape and strides for tensor memory layout

use super::shape::{STACK_DIMS, Shape};
use smallvec::SmallVec;

/// Strides type: element offsets between consecutive elements along each dimension
/// NOTE: Strides are in ELEMENTS, not bytes
pub type Strides = SmallVec<[usize; STACK_DIMS]>;

/// Layout describes how a tensor's indices map onto its buffer
///
/// Address of element at indices [i0, i1, ..., in]:
///   i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
///
/// Tensors always own a row-major buffer; a non-contiguous layout only exists
/// transiently as the read side of a materializing copy (see `transpose`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Shape: size along each dimension
    shape: Shape,
    /// Strides: offset (in elements) between consecutive elements along each dimension
    strides: Strides,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use zeropow::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape = Shape::from(shape);
        let strides = Self::compute_contiguous_strides(&shape);
        Self { shape, strides }
    }

    /// Compute contiguous strides for a given shape (row-major order)
    fn compute_contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::with_capacity(shape.len());
        let mut stride = 1usize;

        // Compute strides from last dimension to first
        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim;
        }

        strides.reverse();
        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the shape as a [`Shape`]
    #[inline]
    pub(crate) fn shape_ref(&self) -> &Shape {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Check if memory is contiguous (row-major order)
    pub fn is_contiguous(&self) -> bool {
        self.strides == Self::compute_contiguous_strides(&self.shape)
    }

    /// Normalize a dimension index (handle negative indices)
    pub fn normalize_dim(&self, d: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let idx = if d < 0 { ndim + d } else { d };
        if idx >= 0 && idx < ndim {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Create a transposed view (swap two dimensions), sharing the same buffer
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Option<Self> {
        let d0 = self.normalize_dim(dim0)?;
        let d1 = self.normalize_dim(dim1)?;

        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();

        shape.swap(d0, d1);
        strides.swap(d0, d1);

        Some(Self { shape, strides })
    }

    /// Buffer offsets of every element, visited in row-major order of `shape`
    pub(crate) fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        let ndim = self.ndim();
        let total = self.elem_count();
        let mut index: SmallVec<[usize; STACK_DIMS]> = SmallVec::from_elem(0, ndim);
        let mut offset = 0usize;
        let mut emitted = 0usize;

        std::iter::from_fn(move || {
            if emitted == total {
                return None;
            }
            let current = offset;
            emitted += 1;

            // Odometer increment from the innermost dimension outwards
            for d in (0..ndim).rev() {
                index[d] += 1;
                offset += self.strides[d];
                if index[d] < self.shape[d] {
                    break;
                }
                offset -= self.strides[d] * self.shape[d];
                index[d] = 0;
            }

            Some(current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_strides() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        assert_eq!(layout.strides(), &[12, 4, 1]);
        assert!(layout.is_contiguous());
    }

    #[test]
    fn test_transpose_view() {
        let layout = Layout::contiguous(&[2, 3]);
        let t = layout.transpose(-1, -2).unwrap();
        assert_eq!(t.shape(), &[3, 2]);
        assert_eq!(t.strides(), &[1, 3]);
        assert!(!t.is_contiguous());
        assert!(layout.transpose(0, 2).is_none());
    }

    #[test]
    fn test_offsets_follow_transposed_order() {
        let layout = Layout::contiguous(&[2, 3]).transpose(0, 1).unwrap();
        let offsets: Vec<usize> = layout.offsets().collect();
        assert_eq!(offsets, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_offsets_scalar_and_empty() {
        let scalar = Layout::contiguous(&[]);
        assert_eq!(scalar.offsets().collect::<Vec<_>>(), vec![0]);

        let empty = Layout::contiguous(&[0, 3]);
        assert_eq!(empty.offsets().count(), 0);
    }
}
