//! Parallel processing strategies

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Processing mode for algorithms
///
/// Every mode produces identical results; only the scheduling differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProcessingMode {
    /// Single-threaded processing on the calling thread
    #[default]
    Sequential,
    /// Parallel processing on the global Rayon pool
    Parallel,
    /// Parallel with a dedicated pool of the given number of threads
    ParallelWith(usize),
}

/// Strategy for parallel execution
pub trait ParallelStrategy {
    /// Run `f(chunk_index, chunk)` over consecutive `chunk_len`-sized chunks of `data`
    fn for_each_chunk_mut<T, F>(&self, data: &mut [T], chunk_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send;
}

impl ParallelStrategy for ProcessingMode {
    fn for_each_chunk_mut<T, F>(&self, data: &mut [T], chunk_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        let chunk_len = chunk_len.max(1);
        match self {
            ProcessingMode::Sequential => data
                .chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk)),
            ProcessingMode::Parallel => data
                .par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk)),
            ProcessingMode::ParallelWith(threads) => {
                let run = |data: &mut [T]| {
                    data.par_chunks_mut(chunk_len)
                        .enumerate()
                        .for_each(|(i, chunk)| f(i, chunk))
                };
                match rayon::ThreadPoolBuilder::new().num_threads(*threads).build() {
                    Ok(pool) => pool.install(|| run(data)),
                    Err(_) => run(data),
                }
            }
        }
    }
}

/// Get the number of available CPU cores
pub fn num_cpus() -> usize {
    rayon::current_num_threads()
}
