#![allow(dead_code)]

use fluxbench::{Bencher, flux};
use std::hint::black_box;

use zeropow::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn randn(shape: &[usize]) -> Tensor<f32> {
    Tensor::<f32>::randn_seeded(shape, 0)
}

fn client_with_threads(threads: usize) -> CpuClient {
    CpuClient::new().with_parallelism(ParallelismConfig::new(Some(threads), None))
}

// ---------------------------------------------------------------------------
// Fast path: square matrices (parameterized)
// ---------------------------------------------------------------------------

#[flux::bench(group = "orthogonalize_bf16", args = [32, 64, 128, 256])]
fn orthogonalize_square(b: &mut Bencher, size: usize) {
    let client = CpuClient::new();
    let g = randn(&[size, size]);
    b.iter(|| black_box(client.orthogonalize(&g, 5).unwrap()));
}

// ---------------------------------------------------------------------------
// Fast path vs trajectory path at the same size
// ---------------------------------------------------------------------------

#[flux::bench(group = "paths_128x256")]
fn fast_path_128x256(b: &mut Bencher) {
    let client = CpuClient::new();
    let g = randn(&[128, 256]);
    b.iter(|| black_box(client.orthogonalize(&g, 5).unwrap()));
}

#[flux::bench(group = "paths_128x256")]
fn trajectory_path_128x256(b: &mut Bencher) {
    let client = CpuClient::new();
    let g = randn(&[128, 256]);
    b.iter(|| black_box(client.orthogonalize_trajectory(&g, 5).unwrap()));
}

#[flux::bench(group = "paths_128x256")]
fn tall_fast_path_256x128(b: &mut Bencher) {
    let client = CpuClient::new();
    let g = randn(&[256, 128]);
    b.iter(|| black_box(client.orthogonalize(&g, 5).unwrap()));
}

// ---------------------------------------------------------------------------
// Batch thread scaling (16 x 64x64)
// ---------------------------------------------------------------------------

#[flux::bench(group = "batch_threads_16x64x64")]
fn batch_1thread(b: &mut Bencher) {
    let client = client_with_threads(1);
    let g = randn(&[16, 64, 64]);
    b.iter(|| black_box(client.orthogonalize(&g, 5).unwrap()));
}

#[flux::bench(group = "batch_threads_16x64x64")]
fn batch_2threads(b: &mut Bencher) {
    let client = client_with_threads(2);
    let g = randn(&[16, 64, 64]);
    b.iter(|| black_box(client.orthogonalize(&g, 5).unwrap()));
}

#[flux::bench(group = "batch_threads_16x64x64")]
fn batch_4threads(b: &mut Bencher) {
    let client = client_with_threads(4);
    let g = randn(&[16, 64, 64]);
    b.iter(|| black_box(client.orthogonalize(&g, 5).unwrap()));
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[flux::bench(group = "diagnostics", args = [16, 64])]
fn singular_values(b: &mut Bencher, size: usize) {
    let client = CpuClient::new();
    let g = randn(&[size, size]);
    b.iter(|| black_box(client.singular_values(&g).unwrap()));
}

fn main() {
    fluxbench::run().unwrap();
}
