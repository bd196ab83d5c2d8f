//! Producer/consumer pipeline.
//!
//! The workflow is illustrated as following:
//!
//! ```text
//!  worker 0 ──┐
//!  worker 1 ──┼──> bounded channel ──> ordering writer ──> output
//!  worker N ──┘
//! ```
//!
//! Each worker owns a contiguous range of line indices and sends chunks tagged
//! with their first line index. The writer restores the global order.

use std::io::Write;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use failure::Error;

use crate::city::CityList;
use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::partition::{self, WorkRange};
use crate::record::Synthesizer;

mod worker;
mod writer;

pub use worker::Worker;
pub use writer::{OrderingWriter, WriterStats};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub lines: u64,
    pub workers: usize,
    pub chunks: u64,
    pub bytes: u64,
    pub max_pending: usize,
    pub elapsed: Duration,
}

impl Summary {
    pub fn million_lines_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.lines as f64 / secs / 1_000_000.0
        } else {
            0.0
        }
    }
}

pub struct Pipeline {
    config: GeneratorConfig,
    synthesizer: Arc<Synthesizer>,
}

impl Pipeline {
    /// Validate the configuration and build the city profiles, before any
    /// thread exists.
    pub fn new(config: GeneratorConfig, cities: CityList) -> Result<Pipeline, GenError> {
        config.validate()?;

        if cities.is_empty() {
            return Err(GenError::EmptyCityList);
        }

        let synthesizer = Arc::new(Synthesizer::new(config.seed, cities));

        Ok(Pipeline {
            config,
            synthesizer,
        })
    }

    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[inline]
    pub fn synthesizer(&self) -> &Arc<Synthesizer> {
        &self.synthesizer
    }

    pub fn ranges(&self) -> Vec<WorkRange> {
        let workers = partition::worker_count(self.config.parallelism(), self.config.lines);
        partition::partition(self.config.lines, workers)
    }

    pub fn worker(&self, range: WorkRange) -> Worker {
        Worker::new(
            range,
            self.config.seed,
            self.config.chunk_size,
            self.config.lines,
            Arc::clone(&self.synthesizer),
        )
    }

    /// Run every worker and the writer to completion, handing `out` back once
    /// it's flushed.
    pub fn run<W: Write + Send + 'static>(&self, out: W) -> Result<(W, Summary), Error> {
        let started = Instant::now();
        let ranges = self.ranges();
        let workers = ranges.len();
        let capacity = self.config.channel_capacity(workers)?;

        log::info!(
            "Generate {} lines with {} workers, chunk size {}, channel capacity {}",
            self.config.lines,
            workers,
            self.config.chunk_size,
            capacity
        );

        let (tx, rx) = mpsc::sync_channel(capacity);

        let writer = thread::spawn(move || writer::run(out, rx));

        let handles: Vec<_> = ranges
            .into_iter()
            .map(|range| {
                let worker = self.worker(range);
                let tx = tx.clone();
                (range.worker_id, thread::spawn(move || worker.run(tx)))
            })
            .collect();

        // Dropping the last sender closes the channel once every worker is done.
        drop(tx);

        let mut worker_error = None;
        let mut sent = 0;

        for (worker_id, handle) in handles {
            match handle.join() {
                Ok(Ok(chunks)) => sent += chunks,
                Ok(Err(err)) => {
                    log::error!("Worker {} failed: {}", worker_id, err);
                    worker_error.get_or_insert(err);
                }
                Err(_) => {
                    worker_error.get_or_insert(GenError::ThreadPanicked(format!(
                        "worker-{}",
                        worker_id
                    )));
                }
            }
        }

        log::debug!("All workers done, {} chunks sent", sent);

        // A writer failure is the root cause of any disconnected worker.
        let (out, stats) = writer
            .join()
            .map_err(|_| GenError::ThreadPanicked("writer".to_string()))??;

        if let Some(err) = worker_error {
            return Err(err.into());
        }

        if stats.lines != self.config.lines {
            return Err(GenError::Incomplete {
                expected: self.config.lines,
                written: stats.lines,
            }
            .into());
        }

        let summary = Summary {
            lines: stats.lines,
            workers,
            chunks: stats.chunks,
            bytes: stats.bytes,
            max_pending: stats.max_pending,
            elapsed: started.elapsed(),
        };

        log::info!(
            "Wrote {} lines, {} bytes in {} chunks, at most {} chunks pending",
            summary.lines,
            summary.bytes,
            summary.chunks,
            summary.max_pending
        );

        Ok((out, summary))
    }
}
