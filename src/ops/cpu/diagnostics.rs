//! CPU implementation of matrix diagnostics.

use crate::dtype::Element;
use crate::error::Result;
use crate::ops::DiagnosticsOps;
use crate::runtime::cpu::CpuClient;
use crate::runtime::cpu::jacobi::singular_values_kernel;
use crate::runtime::cpu::kernels::gram_kernel;
use crate::tensor::{Shape, Tensor};

/// DiagnosticsOps implementation for the CPU client.
impl DiagnosticsOps for CpuClient {
    fn singular_values<T: Element>(&self, t: &Tensor<T>) -> Result<Vec<Vec<f64>>> {
        let (rows, cols) = t.matrix_dims()?;
        let len = rows * cols;
        if len == 0 {
            return Ok(vec![Vec::new(); t.batch_size()]);
        }

        Ok(self.map_matrices(t.as_slice(), len, |_, matrix| {
            let a: Vec<f64> = matrix.iter().map(|v| v.to_f64()).collect();
            singular_values_kernel(&a, rows, cols)
        }))
    }

    fn gram<T: Element>(&self, t: &Tensor<T>) -> Result<Tensor<T>> {
        let (rows, cols) = t.matrix_dims()?;

        let n = t.ndim();
        let shape: Shape = t.shape()[..n - 1]
            .iter()
            .copied()
            .chain(std::iter::once(rows))
            .collect();
        let mut out = Tensor::<T>::zeros(&shape);

        let input = t.as_slice();
        let in_len = rows * cols;
        self.for_each_matrix_init(
            out.as_mut_slice(),
            rows * rows,
            || (),
            |_, index, matrix| {
                let x = &input[index * in_len..(index + 1) * in_len];
                gram_kernel(x, matrix, rows, cols);
            },
        );
        Ok(out)
    }
}
