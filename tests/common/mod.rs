//! Common test utilities
#![allow(dead_code)]

use zeropow::runtime::cpu::{CpuClient, ParallelismConfig};

/// Create a CPU client with default parallelism for testing
pub fn create_cpu_client() -> CpuClient {
    CpuClient::new()
}

/// Create a CPU client with a dedicated pool of `threads` threads
pub fn create_cpu_client_with_threads(threads: usize, min_len: usize) -> CpuClient {
    CpuClient::new().with_parallelism(ParallelismConfig::new(Some(threads), Some(min_len)))
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert every value is finite
pub fn assert_all_finite(values: &[f32], msg: &str) {
    for (i, v) in values.iter().enumerate() {
        assert!(v.is_finite(), "{}: element {} is {}", msg, i, v);
    }
}
