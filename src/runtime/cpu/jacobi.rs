//! One-sided Jacobi singular values
//!
//! Singular values are a diagnostic of the orthogonalizers, never part of the
//! iteration itself, so everything here works on an f64 copy of the matrix
//! regardless of the element type it came from. The rotation parameters use
//! the numerically stable LAPACK formula to avoid catastrophic cancellation.

/// Maximum number of Jacobi sweeps before giving up on further refinement
const MAX_SWEEPS: usize = 60;

/// Jacobi rotation parameters (cosine and sine of rotation angle).
///
/// These parameters define a Givens rotation matrix:
/// ```text
/// J = [ c  -s ]
///     [ s   c ]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JacobiRotation {
    /// Cosine of rotation angle
    pub c: f64,
    /// Sine of rotation angle
    pub s: f64,
}

impl JacobiRotation {
    /// Rotation that zeroes `a_pq` in the symmetric block `[[a_pp, a_pq], [a_pq, a_qq]]`.
    ///
    /// Takes the smaller root of `t^2 + 2 zeta t - 1 = 0` with
    /// `zeta = (a_qq - a_pp) / (2 a_pq)`, so the angle stays within 45 degrees.
    #[inline]
    pub fn compute(a_pp: f64, a_qq: f64, a_pq: f64) -> Self {
        if a_pq.abs() < 1e-300 {
            return Self { c: 1.0, s: 0.0 };
        }

        let zeta = (a_qq - a_pp) / (2.0 * a_pq);
        let t = zeta.signum() / (zeta.abs() + zeta.hypot(1.0));
        let c = t.hypot(1.0).recip();
        Self { c, s: t * c }
    }
}

/// Apply Jacobi rotation to two columns of a matrix.
///
/// Computes: `[col_p', col_q'] = [col_p, col_q] @ [[c, s], [-s, c]]`
#[inline]
pub fn apply_rotation_to_columns(
    data: &mut [f64],
    rows: usize,
    cols: usize,
    p: usize,
    q: usize,
    rot: &JacobiRotation,
) {
    let JacobiRotation { c, s } = *rot;

    for i in 0..rows {
        let idx_p = i * cols + p;
        let idx_q = i * cols + q;

        let val_p = data[idx_p];
        let val_q = data[idx_q];

        data[idx_p] = c * val_p - s * val_q;
        data[idx_q] = s * val_p + c * val_q;
    }
}

/// Compute Gram matrix elements for two columns.
///
/// Returns `(a_pp, a_qq, a_pq)` where:
/// - `a_pp = B[:,p] · B[:,p]`
/// - `a_qq = B[:,q] · B[:,q]`
/// - `a_pq = B[:,p] · B[:,q]`
#[inline]
pub fn compute_gram_elements(
    b: &[f64],
    rows: usize,
    cols: usize,
    p: usize,
    q: usize,
) -> (f64, f64, f64) {
    let mut a_pp = 0.0;
    let mut a_qq = 0.0;
    let mut a_pq = 0.0;

    for i in 0..rows {
        let bp = b[i * cols + p];
        let bq = b[i * cols + q];
        a_pp += bp * bp;
        a_qq += bq * bq;
        a_pq += bp * bq;
    }

    (a_pp, a_qq, a_pq)
}

/// Singular values of an (m × n) row-major matrix, sorted descending.
///
/// Algorithm: One-Sided Jacobi
/// 1. If m < n: work on A^T (same singular values), so columns ≤ rows
/// 2. REPEAT (max 60 sweeps):
///    FOR each column pair (p, q), p < q:
///      - Gram elements a_pp, a_qq, a_pq
///      - If |a_pq| is significant: rotate columns p and q
///    until no pair needed a rotation
/// 3. S[j] = ||B[:,j]||, sorted descending
///
/// Returns `min(m, n)` values. Non-finite input yields non-finite output.
pub fn singular_values_kernel(a: &[f64], m: usize, n: usize) -> Vec<f64> {
    debug_assert_eq!(a.len(), m * n);
    if m == 0 || n == 0 {
        return Vec::new();
    }

    // Work on the tall orientation so every column pair is rotated
    let transpose = m < n;
    let (work_m, work_n) = if transpose { (n, m) } else { (m, n) };
    let mut b: Vec<f64> = if transpose {
        let mut bt = vec![0.0; work_m * work_n];
        for i in 0..m {
            for j in 0..n {
                bt[j * work_n + i] = a[i * n + j];
            }
        }
        bt
    } else {
        a.to_vec()
    };

    let tol = (work_m as f64) * f64::EPSILON;

    for _sweep in 0..MAX_SWEEPS {
        let mut rotated = false;

        for p in 0..work_n {
            for q in (p + 1)..work_n {
                let (a_pp, a_qq, a_pq) = compute_gram_elements(&b, work_m, work_n, p, q);

                // Skip if columns are already orthogonal to working precision
                if a_pq.abs() <= tol * (a_pp * a_qq).sqrt() || a_pq == 0.0 {
                    continue;
                }

                let rot = JacobiRotation::compute(a_pp, a_qq, a_pq);
                apply_rotation_to_columns(&mut b, work_m, work_n, p, q, &rot);
                rotated = true;
            }
        }

        if !rotated {
            break;
        }
    }

    let mut s: Vec<f64> = (0..work_n)
        .map(|j| {
            (0..work_m)
                .map(|i| b[i * work_n + j] * b[i * work_n + j])
                .sum::<f64>()
                .sqrt()
        })
        .collect();
    s.sort_by(|x, y| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal));
    s
}
