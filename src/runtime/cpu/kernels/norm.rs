//! Normalization kernels

use crate::dtype::Element;

/// Frobenius norm of a matrix: sqrt(sum(x^2)), accumulated in f64
#[inline]
pub fn frobenius_norm_kernel<T: Element>(x: &[T]) -> f64 {
    x.iter()
        .map(|&v| {
            let v = v.to_f64();
            v * v
        })
        .sum::<f64>()
        .sqrt()
}

/// Frobenius normalization in place: x = x / (||x||_F + eps)
///
/// `eps` keeps the denominator positive for an all-zero matrix, which then
/// stays all-zero instead of turning into NaN.
///
/// Returns the norm before scaling.
#[inline]
pub fn frobenius_normalize_kernel<T: Element>(x: &mut [T], eps: f64) -> f64 {
    let norm = frobenius_norm_kernel(x);
    let denom = norm + eps;
    for v in x.iter_mut() {
        *v = T::from_f64(v.to_f64() / denom);
    }
    norm
}
