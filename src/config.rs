//! Generator configuration.

use std::thread;

use crate::error::GenError;

pub const DEFAULT_LINES: u64 = 1_000_000;

pub const DEFAULT_SEED: u64 = 2002;

/// Lines per chunk, bounds the memory a single chunk holds.
pub const DEFAULT_CHUNK_SIZE: u64 = 100_000;

/// In-flight chunks allowed per worker before senders block.
pub const DEFAULT_BUFFER_FACTOR: usize = 2;

pub const MAX_BUFFER_FACTOR: usize = 1024;

/// Upper bound of chunks in flight, the channel allocates its slots up front.
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 16;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GeneratorConfig {
    pub lines: u64,
    pub seed: u64,
    pub chunk_size: u64,
    pub buffer_factor: usize,
    /// Worker threads, `None` uses the available parallelism.
    pub workers: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> GeneratorConfig {
        GeneratorConfig {
            lines: DEFAULT_LINES,
            seed: DEFAULT_SEED,
            chunk_size: DEFAULT_CHUNK_SIZE,
            buffer_factor: DEFAULT_BUFFER_FACTOR,
            workers: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_lines(mut self, lines: u64) -> GeneratorConfig {
        self.lines = lines;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> GeneratorConfig {
        self.seed = seed;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> GeneratorConfig {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_buffer_factor(mut self, buffer_factor: usize) -> GeneratorConfig {
        self.buffer_factor = buffer_factor;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> GeneratorConfig {
        self.workers = Some(workers);
        self
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.chunk_size == 0 {
            return Err(GenError::InvalidConfig(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if self.buffer_factor == 0 || self.buffer_factor > MAX_BUFFER_FACTOR {
            return Err(GenError::InvalidConfig(format!(
                "buffer factor must be within 1..={}",
                MAX_BUFFER_FACTOR
            )));
        }
        if self.workers == Some(0) {
            return Err(GenError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Channel slots for `workers` workers, at most `MAX_CHANNEL_CAPACITY`.
    pub fn channel_capacity(&self, workers: usize) -> Result<usize, GenError> {
        workers
            .max(1)
            .checked_mul(self.buffer_factor)
            .filter(|&capacity| capacity <= MAX_CHANNEL_CAPACITY)
            .ok_or_else(|| {
                GenError::InvalidConfig(format!(
                    "{} workers with buffer factor {} exceed {} channel slots",
                    workers, self.buffer_factor, MAX_CHANNEL_CAPACITY
                ))
            })
    }

    /// Requested parallelism before clamping to the line count.
    pub fn parallelism(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
