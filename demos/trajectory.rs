//! Record and summarize a Newton-Schulz trajectory.
//!
//! Seeds a 4x4 standard-normal matrix, runs 5 steps on the instrumented path
//! and prints the singular values of every snapshot next to their largest
//! deviation from 1.
//!
//! ```text
//! cargo run --example trajectory
//! RUST_LOG=zeropow=trace cargo run --example trajectory
//! ```

use zeropow::prelude::*;

const SIZE: usize = 4;
const STEPS: usize = 5;
const SEED: u64 = 42;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let client = CpuClient::new();
    let g = Tensor::<f32>::randn_seeded(&[SIZE, SIZE], SEED);

    let trajectory = client.orthogonalize_trajectory(&g, STEPS)?;
    let analysis = analyze_trajectory(&client, &trajectory)?;

    println!(
        "{SIZE}x{SIZE} matrix, seed {SEED}, {STEPS} steps ({} working precision)",
        trajectory[0].dtype()
    );
    println!("{:>4}  {:<40}  {:>9}", "step", "singular values", "max |s-1|");
    for step in &analysis.steps {
        let values: Vec<String> = step
            .singular_values
            .iter()
            .flatten()
            .map(|s| format!("{s:.4}"))
            .collect();
        println!(
            "{:>4}  {:<40}  {:>9.4}",
            step.step,
            values.join(" "),
            step.max_deviation
        );
    }

    if let (Some(m), Some(g)) = (analysis.matrix_range, analysis.gram_range) {
        println!("matrix entries in [{:.4}, {:.4}]", m.min, m.max);
        println!("M M^T entries in  [{:.4}, {:.4}]", g.min, g.max);
    }

    let fast = client.orthogonalize(&g, STEPS)?;
    let fast_dev = zeropow::algorithm::max_deviation_from_one(&client.singular_values(&fast)?);
    println!("{} fast path: max |s-1| = {fast_dev:.4}", fast.dtype());

    if analysis.is_contracting() {
        tracing::info!("trajectory contracted toward orthogonal");
    } else {
        tracing::warn!("trajectory did not contract");
    }
    Ok(())
}
