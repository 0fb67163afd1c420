//! Runtime backends for matrix computation
//!
//! Only a host (CPU) backend exists. It is organised the same way a device
//! backend would be:
//!
//! ```text
//! cpu
//! ├── CpuClient (dispatches operations, owns the parallelism policy)
//! ├── kernels   (slice-level compute: matmul, norms, casts, random)
//! └── jacobi    (singular values for diagnostics)
//! ```

pub mod cpu;
