//! Memory operation kernels (cast, transpose, random)

use crate::dtype::Element;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

/// Cast elements from one type to another.
///
/// Converts by going through f64 as an intermediate representation, which is
/// exact for every supported source type and rounds to nearest on the way down.
#[inline]
pub fn cast_kernel<S: Element, D: Element>(src: &[S], dst: &mut [D]) {
    debug_assert_eq!(src.len(), dst.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = D::from_f64(s.to_f64());
    }
}

/// Transpose the trailing two dimensions of a batch of matrices.
///
/// # Arguments
/// * `src` - `batch` matrices of shape (rows × cols), row-major
/// * `dst` - `batch` matrices of shape (cols × rows), row-major
#[inline]
pub fn transpose_kernel<T: Element>(
    src: &[T],
    dst: &mut [T],
    batch: usize,
    rows: usize,
    cols: usize,
) {
    debug_assert_eq!(src.len(), batch * rows * cols);
    debug_assert_eq!(dst.len(), src.len());

    let len = rows * cols;
    for b in 0..batch {
        let s = &src[b * len..(b + 1) * len];
        let d = &mut dst[b * len..(b + 1) * len];
        for i in 0..rows {
            for j in 0..cols {
                d[j * rows + i] = s[i * cols + j];
            }
        }
    }
}

/// Fill output with standard normal random values (mean=0, std=1)
///
/// Draws from a `StdRng` seeded with `seed`, so a given seed always yields the
/// same sequence on the same platform and rand version.
#[inline]
pub fn randn_kernel<T: Element>(out: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = StandardNormal;

    for elem in out.iter_mut() {
        let val: f64 = normal.sample(&mut rng);
        *elem = T::from_f64(val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::bf16;

    #[test]
    fn test_transpose_kernel_rectangular() {
        let src = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut dst = [0.0f32; 6];
        transpose_kernel(&src, &mut dst, 1, 2, 3);
        assert_eq!(dst, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_cast_kernel_bf16() {
        let src = [1.0f32, -0.5, 256.0];
        let mut dst = [bf16::ZERO; 3];
        cast_kernel(&src, &mut dst);
        assert_eq!(dst[0].to_f32(), 1.0);
        assert_eq!(dst[1].to_f32(), -0.5);
        assert_eq!(dst[2].to_f32(), 256.0);
    }

    #[test]
    fn test_randn_statistics() {
        let mut out = vec![0.0f64; 4096];
        randn_kernel(&mut out, 123);
        let mean = out.iter().sum::<f64>() / out.len() as f64;
        let var = out.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / out.len() as f64;
        assert!(mean.abs() < 0.1, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.15, "var = {var}");
    }
}
