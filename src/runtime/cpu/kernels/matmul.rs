//! Matrix multiplication kernels
//!
//! All kernels operate on contiguous row-major matrices, accumulate dot
//! products in f64 and round once per output element to `T`. For reduced
//! precision element types this keeps the error of a product at a single
//! rounding, the same contract as a mixed-precision GEMM.

use crate::dtype::Element;

/// Gram matrix: C = X @ X^T
///
/// Only the upper triangle is computed; the lower triangle is mirrored so the
/// result is exactly symmetric.
///
/// # Arguments
/// * `x` - Matrix X (m × k), row-major
/// * `out` - Output matrix C (m × m), row-major
#[inline]
pub fn gram_kernel<T: Element>(x: &[T], out: &mut [T], m: usize, k: usize) {
    debug_assert_eq!(x.len(), m * k);
    debug_assert_eq!(out.len(), m * m);

    for i in 0..m {
        let row_i = &x[i * k..(i + 1) * k];
        for j in i..m {
            let row_j = &x[j * k..(j + 1) * k];
            let dot: f64 = row_i
                .iter()
                .zip(row_j)
                .map(|(&p, &q)| p.to_f64() * q.to_f64())
                .sum();
            let v = T::from_f64(dot);
            out[i * m + j] = v;
            out[j * m + i] = v;
        }
    }
}

/// Fused multiply-add: C = alpha * (A @ B) + beta * D
///
/// Single-pass GEMM with the scaled addend folded into the epilogue, the
/// same shape as a bias-fused matmul but with a full matrix addend.
///
/// # Arguments
/// * `alpha` - Scale of the product
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `beta` - Scale of the addend
/// * `d` - Addend D (m × n), row-major
/// * `out` - Output matrix C (m × n), row-major; must not alias `a`, `b` or `d`
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn matmul_axpby_kernel<T: Element>(
    alpha: f64,
    a: &[T],
    b: &[T],
    beta: f64,
    d: &[T],
    out: &mut [T],
    m: usize,
    n: usize,
    k: usize,
) {
    debug_assert_eq!(a.len(), m * k);
    debug_assert_eq!(b.len(), k * n);
    debug_assert_eq!(d.len(), m * n);
    debug_assert_eq!(out.len(), m * n);

    let mut row_acc = vec![0.0f64; n];

    for i in 0..m {
        row_acc.fill(0.0);
        for kk in 0..k {
            let a_val = a[i * k + kk].to_f64();
            let b_row = &b[kk * n..(kk + 1) * n];
            for (acc, &b_val) in row_acc.iter_mut().zip(b_row) {
                *acc += a_val * b_val.to_f64();
            }
        }

        // Epilogue: scale the product and fold in the addend
        let d_row = &d[i * n..(i + 1) * n];
        for ((dst, &acc), &d_val) in out[i * n..(i + 1) * n]
            .iter_mut()
            .zip(row_acc.iter())
            .zip(d_row)
        {
            *dst = T::from_f64(alpha * acc + beta * d_val.to_f64());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axpby_plain_product() {
        let a = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [7.0f32, 8.0, 9.0, 10.0, 11.0, 12.0];
        let zeros = [0.0f32; 4];
        let mut out = [0.0f32; 4];
        matmul_axpby_kernel(1.0, &a, &b, 0.0, &zeros, &mut out, 2, 2, 3);
        assert_eq!(out, [58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_gram_is_symmetric() {
        let x = [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = [0.0f64; 4];
        gram_kernel(&x, &mut out, 2, 3);
        assert_eq!(out, [14.0, 32.0, 32.0, 77.0]);
    }

    #[test]
    fn test_axpby_folds_addend() {
        // A @ B = [[4.5, -0.5], [9.5, -2.0]]
        let a = [1.0f64, 2.0, 3.0, 4.0];
        let b = [0.5f64, -1.0, 2.0, 0.25];
        let d = [1.0f64, 1.0, -1.0, 2.0];
        let prod = [4.5f64, -0.5, 9.5, -2.0];

        let mut out = [0.0f64; 4];
        matmul_axpby_kernel(2.0, &a, &b, -3.0, &d, &mut out, 2, 2, 2);
        for i in 0..4 {
            assert!((out[i] - (2.0 * prod[i] - 3.0 * d[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_axpby_empty_inner_dim() {
        let d = [1.0f32, 2.0, 3.0, 4.0];
        let mut out = [0.0f32; 4];
        matmul_axpby_kernel::<f32>(1.0, &[], &[], 0.5, &d, &mut out, 2, 2, 0);
        assert_eq!(out, [0.5, 1.0, 1.5, 2.0]);
    }
}
