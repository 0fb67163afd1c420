//! Shape type: dimensions of a tensor

use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Stack allocation threshold for dimensions
/// A batch of matrices rarely has more than two leading dims, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Swap two dimensions.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.0.swap(a, b);
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements described by this shape.
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.0.iter().product()
    }

    /// `(rows, cols)` of the trailing matrix, if the shape has at least two dims.
    #[inline]
    pub fn matrix_dims(&self) -> Option<(usize, usize)> {
        let n = self.0.len();
        if n < 2 {
            return None;
        }
        Some((self.0[n - 2], self.0[n - 1]))
    }

    /// Product of the leading (batch) dimensions; 1 for a plain matrix.
    #[inline]
    pub fn batch_size(&self) -> usize {
        let n = self.0.len();
        self.0[..n.saturating_sub(2)].iter().product()
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_dims_and_batch() {
        let s = Shape::from([2, 3, 4, 5]);
        assert_eq!(s.matrix_dims(), Some((4, 5)));
        assert_eq!(s.batch_size(), 6);
        assert_eq!(s.elem_count(), 120);

        let m = Shape::from([4, 5]);
        assert_eq!(m.batch_size(), 1);

        let v = Shape::from([7]);
        assert_eq!(v.matrix_dims(), None);
    }
}
