//! CPU implementation of Newton-Schulz orthogonalization.

use crate::algorithm::newton_schulz::{
    NewtonSchulzOptions, NewtonSchulzWorkspace, normalize_matrix, prepare,
};
use crate::dtype::Element;
use crate::error::Result;
use crate::ops::NewtonSchulzOps;
use crate::runtime::cpu::CpuClient;
use crate::tensor::Tensor;
use half::bf16;

/// NewtonSchulzOps implementation for the CPU client.
impl NewtonSchulzOps for CpuClient {
    fn orthogonalize_with<T: Element, W: Element>(
        &self,
        g: &Tensor<T>,
        options: &NewtonSchulzOptions,
    ) -> Result<Tensor<W>> {
        options.validate()?;
        let (mut x, transposed) = prepare::<T, W>(g)?;
        let (rows, cols) = x.matrix_dims()?;
        let options = *options;

        self.for_each_matrix_init(
            x.as_mut_slice(),
            rows * cols,
            || NewtonSchulzWorkspace::<W>::new(rows, cols),
            |workspace, _, matrix| {
                normalize_matrix(matrix, options.eps);
                workspace.iterate(matrix, &options, |_, _| {});
            },
        );

        if transposed { x.mt() } else { Ok(x) }
    }

    fn orthogonalize_trajectory_with<T: Element, W: Element>(
        &self,
        g: &Tensor<T>,
        options: &NewtonSchulzOptions,
    ) -> Result<Vec<Tensor<W>>> {
        options.validate()?;
        let (x, transposed) = prepare::<T, W>(g)?;
        let (rows, cols) = x.matrix_dims()?;
        let options = *options;

        tracing::debug!(
            shape = ?g.shape(),
            steps = options.steps,
            transposed,
            dtype = %W::DTYPE,
            "recording Newton-Schulz trajectory"
        );

        // per_matrix[b][k] = snapshot k of batch element b, wide orientation
        let per_matrix: Vec<Vec<Vec<W>>> =
            self.map_matrices(x.as_slice(), rows * cols, |index, matrix| {
                let mut current = matrix.to_vec();
                let norm = normalize_matrix(&mut current, options.eps);
                tracing::trace!(index, norm, "normalized batch element");

                let mut workspace = NewtonSchulzWorkspace::<W>::new(rows, cols);
                let mut snapshots = Vec::with_capacity(options.steps + 1);
                workspace.iterate(&mut current, &options, |step, iterate| {
                    tracing::trace!(index, step, "recorded snapshot");
                    snapshots.push(iterate.to_vec());
                });
                snapshots
            });

        let mut trajectory = Vec::with_capacity(options.steps + 1);
        for step in 0..=options.steps {
            let mut data = Vec::with_capacity(x.numel());
            for snapshots in &per_matrix {
                data.extend_from_slice(&snapshots[step]);
            }
            let snapshot = Tensor::try_from_vec(data, x.shape())?;
            trajectory.push(if transposed { snapshot.mt()? } else { snapshot });
        }
        Ok(trajectory)
    }
}

/// Orthogonalize `g` in bf16 on a default CPU client
///
/// Shorthand for [`NewtonSchulzOps::orthogonalize`] on [`CpuClient::new`].
pub fn orthogonalize<T: Element>(g: &Tensor<T>, steps: usize) -> Result<Tensor<bf16>> {
    CpuClient::new().orthogonalize(g, steps)
}

/// Record the f32 trajectory of `g` on a default CPU client
///
/// Shorthand for [`NewtonSchulzOps::orthogonalize_trajectory`] on [`CpuClient::new`].
pub fn orthogonalize_trajectory<T: Element>(g: &Tensor<T>, steps: usize) -> Result<Vec<Tensor<f32>>> {
    CpuClient::new().orthogonalize_trajectory(g, steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::newton_schulz::NORM_EPS;
    use crate::error::Error;

    #[test]
    fn test_zero_steps_returns_normalized_input() {
        let g = Tensor::from_slice(&[3.0f32, 0.0, 0.0, 4.0], &[2, 2]);
        let client = CpuClient::new();
        let traj = client.orthogonalize_trajectory(&g, 0).unwrap();
        assert_eq!(traj.len(), 1);

        let scale = (5.0 + NORM_EPS) as f32;
        let expected = [3.0 / scale, 0.0, 0.0, 4.0 / scale];
        for (got, want) in traj[0].as_slice().iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn test_trajectory_final_matches_with_same_precision() {
        let g = Tensor::<f64>::randn_seeded(&[2, 3, 5], 11);
        let client = CpuClient::new();
        let options = NewtonSchulzOptions::new(3);
        let traj = client
            .orthogonalize_trajectory_with::<f64, f32>(&g, &options)
            .unwrap();
        let fast = client.orthogonalize_with::<f64, f32>(&g, &options).unwrap();
        assert_eq!(traj.last().unwrap(), &fast);
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let g = Tensor::<f32>::zeros(&[2, 2]);
        let options = NewtonSchulzOptions::new(1).with_eps(-1.0);
        let client = CpuClient::new();
        assert!(matches!(
            client.orthogonalize_with::<f32, f32>(&g, &options),
            Err(Error::InvalidArgument { arg: "eps", .. })
        ));
    }

    #[test]
    fn test_empty_matrix_keeps_shape() {
        let g = Tensor::<f32>::zeros(&[0, 3]);
        let x = orthogonalize(&g, 5).unwrap();
        assert_eq!(x.shape(), &[0, 3]);

        let traj = orthogonalize_trajectory(&Tensor::<f32>::zeros(&[2, 4, 0]), 2).unwrap();
        assert_eq!(traj.len(), 3);
        assert!(traj.iter().all(|t| t.shape() == &[2, 4, 0]));
    }
}
