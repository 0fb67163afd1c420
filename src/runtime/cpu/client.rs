//! CPU client and parallelism configuration

use crate::error::Result;
#[cfg(feature = "rayon")]
use crate::error::Error;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Parallelism settings for batch dispatch on the CPU client.
///
/// - `max_threads`: size of a dedicated thread pool; `None` uses rayon's global pool
/// - `min_len`: minimum number of batch elements handed to one rayon task
///
/// Results never depend on these settings; only scheduling does.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParallelismConfig {
    max_threads: Option<usize>,
    min_len: Option<usize>,
}

impl ParallelismConfig {
    /// Create a parallelism configuration
    pub const fn new(max_threads: Option<usize>, min_len: Option<usize>) -> Self {
        Self {
            max_threads,
            min_len,
        }
    }

    /// Dedicated pool size, if any
    #[inline]
    pub fn max_threads(&self) -> Option<usize> {
        self.max_threads
    }

    /// Minimum number of batch elements per task (at least 1)
    #[inline]
    pub fn min_len(&self) -> usize {
        self.min_len.unwrap_or(1).max(1)
    }
}

/// CPU client for operation dispatch
///
/// The client owns the parallelism policy. Independent matrices of a batch are
/// spread across threads; the steps of one matrix always run sequentially
/// because each step depends on the previous iterate.
#[derive(Clone, Debug, Default)]
pub struct CpuClient {
    parallelism: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a new CPU client using the global rayon pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a client with the given parallelism settings
    ///
    /// If a dedicated pool of `max_threads` threads cannot be built, the client
    /// logs a warning and keeps dispatching on the global pool.
    pub fn with_parallelism(self, config: ParallelismConfig) -> Self {
        match Self::try_with_parallelism(config) {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(
                    threads = ?config.max_threads(),
                    error = %err,
                    "using global thread pool"
                );
                Self {
                    parallelism: config,
                    ..Self::default()
                }
            }
        }
    }

    /// Create a client with the given parallelism settings
    ///
    /// Returns `Error::Backend` if the dedicated thread pool cannot be built.
    pub fn try_with_parallelism(config: ParallelismConfig) -> Result<Self> {
        #[cfg(feature = "rayon")]
        {
            let pool = match config.max_threads() {
                Some(threads) => Some(Arc::new(
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|e| Error::Backend(format!("thread pool: {e}")))?,
                )),
                None => None,
            };
            Ok(Self {
                parallelism: config,
                pool,
            })
        }

        #[cfg(not(feature = "rayon"))]
        {
            Ok(Self {
                parallelism: config,
            })
        }
    }

    /// Current parallelism settings
    #[inline]
    pub fn parallelism(&self) -> ParallelismConfig {
        self.parallelism
    }

    /// Minimum number of batch elements per rayon task
    #[inline]
    pub fn rayon_min_len(&self) -> usize {
        self.parallelism.min_len()
    }

    /// Run `op` inside the dedicated pool when one is configured
    #[cfg(feature = "rayon")]
    fn install_parallelism<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Apply `f` to every `chunk_len`-sized matrix of `data` in place.
    ///
    /// `init` builds per-task scratch state (one per rayon split, one in total
    /// without rayon), so scratch allocations scale with threads, not batch size.
    pub(crate) fn for_each_matrix_init<T, S, I, F>(
        &self,
        data: &mut [T],
        chunk_len: usize,
        init: I,
        f: F,
    ) where
        T: Send,
        I: Fn() -> S + Send + Sync,
        F: Fn(&mut S, usize, &mut [T]) + Send + Sync,
    {
        if chunk_len == 0 || data.is_empty() {
            return;
        }

        #[cfg(feature = "rayon")]
        {
            let min_len = self.rayon_min_len();
            self.install_parallelism(|| {
                data.par_chunks_mut(chunk_len)
                    .enumerate()
                    .with_min_len(min_len)
                    .for_each_init(&init, |state, (index, matrix)| f(state, index, matrix));
            });
        }

        #[cfg(not(feature = "rayon"))]
        {
            let mut state = init();
            for (index, matrix) in data.chunks_mut(chunk_len).enumerate() {
                f(&mut state, index, matrix);
            }
        }
    }

    /// Map every `chunk_len`-sized matrix of `data`, preserving batch order.
    pub(crate) fn map_matrices<T, R, F>(&self, data: &[T], chunk_len: usize, f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(usize, &[T]) -> R + Send + Sync,
    {
        if chunk_len == 0 || data.is_empty() {
            return Vec::new();
        }

        #[cfg(feature = "rayon")]
        {
            let min_len = self.rayon_min_len();
            self.install_parallelism(|| {
                data.par_chunks(chunk_len)
                    .enumerate()
                    .with_min_len(min_len)
                    .map(|(index, matrix)| f(index, matrix))
                    .collect()
            })
        }

        #[cfg(not(feature = "rayon"))]
        {
            data.chunks(chunk_len)
                .enumerate()
                .map(|(index, matrix)| f(index, matrix))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallelism_config_defaults() {
        let cfg = ParallelismConfig::default();
        assert_eq!(cfg.max_threads(), None);
        assert_eq!(cfg.min_len(), 1);
        assert_eq!(ParallelismConfig::new(None, Some(0)).min_len(), 1);
    }

    #[test]
    fn test_try_with_parallelism() {
        let client = CpuClient::try_with_parallelism(ParallelismConfig::new(Some(2), Some(4))).unwrap();
        assert_eq!(client.parallelism().max_threads(), Some(2));
        assert_eq!(client.rayon_min_len(), 4);
    }

    #[test]
    fn test_map_matrices_preserves_order() {
        let client = CpuClient::new().with_parallelism(ParallelismConfig::new(Some(2), Some(1)));
        let data: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let sums = client.map_matrices(&data, 4, |index, m| (index, m.iter().sum::<f32>()));
        assert_eq!(sums, vec![(0, 6.0), (1, 22.0), (2, 38.0)]);
    }

    #[test]
    fn test_for_each_matrix_init_visits_every_matrix() {
        let client = CpuClient::new();
        let mut data = vec![1.0f64; 20];
        client.for_each_matrix_init(
            &mut data,
            5,
            || 0usize,
            |calls, index, m| {
                *calls += 1;
                for v in m.iter_mut() {
                    *v += index as f64;
                }
            },
        );
        for (index, chunk) in data.chunks(5).enumerate() {
            assert!(chunk.iter().all(|&v| v == 1.0 + index as f64));
        }
    }
}
