//! Split the global line index space into contiguous worker ranges.

use std::convert::TryFrom;
use std::ops::Range;

/// Lines `[start, end)` owned by one worker.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WorkRange {
    pub start: u64,
    pub end: u64,
    pub worker_id: usize,
}

impl WorkRange {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sub-ranges of at most `chunk_size` lines, in increasing order.
    ///
    /// A chunk size past the range length yields the whole range at once.
    pub fn chunks(&self, chunk_size: u64) -> impl Iterator<Item = Range<u64>> {
        let end = self.end;
        let step = chunk_size.max(1).min(self.len().max(1));

        (self.start..end)
            .step_by(usize::try_from(step).unwrap_or(usize::MAX))
            .map(move |start| start..start.saturating_add(step).min(end))
    }
}

/// Number of workers for a run, never more than lines to produce.
pub fn worker_count(parallelism: usize, total_lines: u64) -> usize {
    let parallelism = parallelism.max(1) as u64;
    parallelism.min(total_lines) as usize
}

/// Partition `[0, total_lines)` over `workers` ranges.
///
/// Every worker gets `max(total_lines / workers, 1)` lines and the last one
/// also takes the remainder. Workers past the end get empty ranges.
pub fn partition(total_lines: u64, workers: usize) -> Vec<WorkRange> {
    if workers == 0 {
        return Vec::new();
    }

    let per_worker = (total_lines / workers as u64).max(1);

    (0..workers)
        .map(|worker_id| {
            let start = (worker_id as u64 * per_worker).min(total_lines);
            let end = if worker_id == workers - 1 {
                total_lines
            } else {
                (start + per_worker).min(total_lines)
            };

            WorkRange {
                start,
                end,
                worker_id,
            }
        })
        .collect()
}
