//! Trajectory diagnostics
//!
//! Summaries of a recorded Newton-Schulz trajectory: how far each snapshot is
//! from orthogonal, its Gram matrix, and value ranges shared by all snapshots
//! so that snapshots can be compared on one scale.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::ops::DiagnosticsOps;
use crate::tensor::Tensor;

/// Closed value interval `[min, max]`
///
/// NaN is sticky: once a NaN is included both bounds are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Smallest value seen
    pub min: f64,
    /// Largest value seen
    pub max: f64,
}

impl ValueRange {
    /// Range covering exactly one value
    pub fn point(v: f64) -> Self {
        Self { min: v, max: v }
    }

    /// Extend the range to include `v`
    pub fn include(&mut self, v: f64) {
        self.min = nan_min(self.min, v);
        self.max = nan_max(self.max, v);
    }

    /// Smallest range covering both
    pub fn union(self, other: Self) -> Self {
        Self {
            min: nan_min(self.min, other.min),
            max: nan_max(self.max, other.max),
        }
    }

    /// Range of a slice, `None` when it is empty
    pub fn of<T: Element>(values: &[T]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        let mut range = Self::point(first.to_f64());
        for v in rest {
            range.include(v.to_f64());
        }
        Some(range)
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Diagnostics of one snapshot `X_k`
#[derive(Debug, Clone)]
pub struct StepDiagnostics<T: Element> {
    /// Step index k (0 is the normalized input)
    pub step: usize,
    /// Singular values per batch element, descending
    pub singular_values: Vec<Vec<f64>>,
    /// `max |σ - 1|` over every singular value of every batch element
    pub max_deviation: f64,
    /// `X_k @ X_k^T` per batch element
    pub gram: Tensor<T>,
}

/// Diagnostics of a whole trajectory
#[derive(Debug, Clone)]
pub struct TrajectoryAnalysis<T: Element> {
    /// One entry per snapshot, in step order
    pub steps: Vec<StepDiagnostics<T>>,
    /// Range of matrix entries over all snapshots (`None` for empty matrices)
    pub matrix_range: Option<ValueRange>,
    /// Range of Gram entries over all snapshots (`None` for empty matrices)
    pub gram_range: Option<ValueRange>,
}

impl<T: Element> TrajectoryAnalysis<T> {
    /// Max deviation of every snapshot, in step order
    pub fn max_deviations(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.max_deviation).collect()
    }

    /// True when the final snapshot is closer to orthogonal than the first
    pub fn is_contracting(&self) -> bool {
        match (self.steps.first(), self.steps.last()) {
            (Some(first), Some(last)) => last.max_deviation < first.max_deviation,
            _ => false,
        }
    }
}

/// `max |σ - 1|` over a batch of singular value lists (0 when there are none, NaN if any is NaN)
pub fn max_deviation_from_one(singular_values: &[Vec<f64>]) -> f64 {
    singular_values
        .iter()
        .flatten()
        .map(|s| (s - 1.0).abs())
        .fold(0.0, nan_max)
}

/// Analyze a recorded trajectory snapshot by snapshot.
///
/// # Errors
///
/// - `InvalidArgument` if `trajectory` is empty
/// - `ShapeMismatch` if snapshots do not all share the first snapshot's shape
/// - `InvalidShape` if snapshots have fewer than 2 dimensions
pub fn analyze_trajectory<C, T>(client: &C, trajectory: &[Tensor<T>]) -> Result<TrajectoryAnalysis<T>>
where
    C: DiagnosticsOps,
    T: Element,
{
    let first = trajectory
        .first()
        .ok_or_else(|| Error::invalid_argument("trajectory", "must contain at least one snapshot"))?;

    let mut steps = Vec::with_capacity(trajectory.len());
    let mut matrix_range: Option<ValueRange> = None;
    let mut gram_range: Option<ValueRange> = None;

    for (step, snapshot) in trajectory.iter().enumerate() {
        if snapshot.shape() != first.shape() {
            return Err(Error::shape_mismatch(first.shape(), snapshot.shape()));
        }

        let singular_values = client.singular_values(snapshot)?;
        let max_deviation = max_deviation_from_one(&singular_values);
        let gram = client.gram(snapshot)?;

        matrix_range = merge(matrix_range, ValueRange::of(snapshot.as_slice()));
        gram_range = merge(gram_range, ValueRange::of(gram.as_slice()));

        tracing::debug!(step, max_deviation, "analyzed snapshot");

        steps.push(StepDiagnostics {
            step,
            singular_values,
            max_deviation,
            gram,
        });
    }

    Ok(TrajectoryAnalysis {
        steps,
        matrix_range,
        gram_range,
    })
}

fn merge(acc: Option<ValueRange>, next: Option<ValueRange>) -> Option<ValueRange> {
    match (acc, next) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, b) => a.or(b),
    }
}
