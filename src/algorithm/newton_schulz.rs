//! Newton-Schulz iteration core
//!
//! This module holds the single implementation of the iteration shared by both
//! orthogonalizers. It operates on one normalized, wide (rows ≤ cols) row-major
//! matrix at a time; orientation, casting and batch dispatch live in the
//! callers.
//!
//! # Algorithm
//!
//! ```text
//! X_0 = G / (||G||_F + eps)          // G in wide orientation
//! For k = 1..=steps:
//!     A = X @ X^T
//!     B = b * A + c * (A @ A)
//!     X = a * X + B @ X
//! ```
//!
//! Writing X = U Σ V^T, one step maps every singular value σ to
//! `p(σ) = aσ + bσ³ + cσ⁵` and leaves U and V untouched. The default quintic
//! coefficients make p(σ) ≈ 3.44σ for small σ, so tiny singular values grow
//! quickly, and p maps the band [0.6, 1.25] into itself. p(1) = a + b + c =
//! 0.7015, so singular values settle into an oscillation inside
//! roughly [0.68, 1.2] rather than converging to exactly 1.
//!
//! The iteration is only locally convergent: p diverges for σ > ~1.4. Frobenius
//! normalization guarantees σ ≤ 1 at the start.

use crate::error::{Error, Result};
use crate::dtype::Element;
use crate::runtime::cpu::kernels::{frobenius_normalize_kernel, gram_kernel, matmul_axpby_kernel};
use crate::tensor::Tensor;

/// Additive guard in the normalization denominator
pub const NORM_EPS: f64 = 1e-7;

/// Step count used by [`NewtonSchulzOptions::default`]
pub const DEFAULT_STEPS: usize = 5;

/// Coefficients `(a, b, c)` of the update `X' = aX + (bA + cA²)X`, `A = XXᵀ`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSchulzCoefficients {
    /// Linear term
    pub a: f64,
    /// Cubic term
    pub b: f64,
    /// Quintic term
    pub c: f64,
}

impl NewtonSchulzCoefficients {
    /// Quintic coefficients tuned for fast growth of small singular values
    pub const QUINTIC: Self = Self {
        a: 3.4445,
        b: -4.7750,
        c: 2.0315,
    };

    /// Create a coefficient set
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// The scalar polynomial `p(σ) = aσ + bσ³ + cσ⁵` one step applies to each singular value
    #[inline]
    pub fn apply_scalar(&self, sigma: f64) -> f64 {
        let s2 = sigma * sigma;
        sigma * (self.a + s2 * (self.b + s2 * self.c))
    }

    /// True when all three coefficients are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

impl Default for NewtonSchulzCoefficients {
    fn default() -> Self {
        Self::QUINTIC
    }
}

/// Per-call configuration of a Newton-Schulz run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSchulzOptions {
    /// Number of update steps (fixed; there is no residual-based stopping)
    pub steps: usize,
    /// Polynomial coefficients
    pub coefficients: NewtonSchulzCoefficients,
    /// Additive guard in the normalization denominator
    pub eps: f64,
}

impl NewtonSchulzOptions {
    /// Options for `steps` updates with the default coefficients and epsilon
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            coefficients: NewtonSchulzCoefficients::QUINTIC,
            eps: NORM_EPS,
        }
    }

    /// Options from a signed step count, as received from an untyped caller
    ///
    /// Returns `Error::InvalidArgument` for negative counts.
    pub fn try_from_steps(steps: i64) -> Result<Self> {
        let steps = usize::try_from(steps).map_err(|_| {
            Error::invalid_argument("steps", format!("must be non-negative, got {steps}"))
        })?;
        Ok(Self::new(steps))
    }

    /// Replace the polynomial coefficients
    pub fn with_coefficients(mut self, coefficients: NewtonSchulzCoefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Replace the normalization epsilon
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Check the options before any computation starts
    pub fn validate(&self) -> Result<()> {
        if !self.coefficients.is_finite() {
            return Err(Error::invalid_argument(
                "coefficients",
                format!("must be finite, got {:?}", self.coefficients),
            ));
        }
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(Error::invalid_argument(
                "eps",
                format!("must be finite and positive, got {}", self.eps),
            ));
        }
        Ok(())
    }
}

impl Default for NewtonSchulzOptions {
    fn default() -> Self {
        Self::new(DEFAULT_STEPS)
    }
}

/// Normalize one matrix in place: x = x / (||x||_F + eps)
///
/// Returns the Frobenius norm before scaling.
#[inline]
pub fn normalize_matrix<W: Element>(x: &mut [W], eps: f64) -> f64 {
    frobenius_normalize_kernel(x, eps)
}

/// Bring an input into working form: working element type, wide orientation.
///
/// Returns the wide tensor and whether it was transposed (rows > cols). The
/// flag belongs to the caller's invocation and is used once to restore the
/// caller's orientation. Normalization is left to the per-matrix workers.
///
/// Returns `Error::InvalidShape` for tensors of rank < 2.
pub fn prepare<T: Element, W: Element>(g: &Tensor<T>) -> Result<(Tensor<W>, bool)> {
    let (rows, cols) = g.matrix_dims()?;
    let x = g.cast::<W>();
    if rows > cols {
        Ok((x.mt()?, true))
    } else {
        Ok((x, false))
    }
}

/// Rolling buffers for iterating one wide `rows × cols` matrix.
///
/// Holds the running iterate, the next iterate, `A = XXᵀ` and `B = bA + cA²`.
/// The running and next iterates swap roles every step, so a run of any length
/// touches exactly these four buffers.
pub struct NewtonSchulzWorkspace<W: Element> {
    rows: usize,
    cols: usize,
    current: Vec<W>,
    next: Vec<W>,
    gram: Vec<W>,
    poly: Vec<W>,
}

impl<W: Element> NewtonSchulzWorkspace<W> {
    /// Allocate buffers for a wide `rows × cols` matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        debug_assert!(rows <= cols, "workspace expects wide orientation");
        Self {
            rows,
            cols,
            current: vec![W::zero(); rows * cols],
            next: vec![W::zero(); rows * cols],
            gram: vec![W::zero(); rows * rows],
            poly: vec![W::zero(); rows * rows],
        }
    }

    /// The running iterate
    #[inline]
    pub fn current(&self) -> &[W] {
        &self.current
    }

    /// Load a normalized wide matrix as the running iterate
    pub fn load(&mut self, x: &[W]) {
        self.current.copy_from_slice(x);
    }

    /// Apply one update to the running iterate
    pub fn step(&mut self, coefficients: &NewtonSchulzCoefficients) {
        let (m, n) = (self.rows, self.cols);
        let NewtonSchulzCoefficients { a, b, c } = *coefficients;

        // A = X @ X^T
        gram_kernel(&self.current, &mut self.gram, m, n);
        // B = b * A + c * (A @ A)
        matmul_axpby_kernel(c, &self.gram, &self.gram, b, &self.gram, &mut self.poly, m, m, m);
        // X' = a * X + B @ X
        matmul_axpby_kernel(
            1.0,
            &self.poly,
            &self.current,
            a,
            &self.current,
            &mut self.next,
            m,
            n,
            m,
        );

        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Run `options.steps` updates on `x` in place.
    ///
    /// `x` must already be normalized and in wide orientation. `observe(k, X_k)`
    /// is called for k = 0 (the loaded matrix) through k = steps; callers that
    /// only need the result pass a no-op and nothing is retained.
    pub fn iterate<F>(&mut self, x: &mut [W], options: &NewtonSchulzOptions, mut observe: F)
    where
        F: FnMut(usize, &[W]),
    {
        self.load(x);
        observe(0, &self.current);

        for k in 1..=options.steps {
            self.step(&options.coefficients);
            observe(k, &self.current);
        }

        x.copy_from_slice(&self.current);
    }
}
