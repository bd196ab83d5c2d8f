//! The unit of work flowing from workers to the ordering writer.

use std::convert::TryFrom;

use bytes::Bytes;

/// Approximate size of one encoded record, used to pre-size chunk buffers.
pub const RECORD_SIZE_HINT: usize = 24;

/// Chunk buffers are never pre-sized past this, larger chunks grow on demand.
pub const MAX_PRESIZE: usize = 64 * 1024 * 1024;

/// Initial buffer capacity for a chunk of `line_count` lines.
#[inline]
pub fn presize(line_count: u64) -> usize {
    usize::try_from(line_count)
        .unwrap_or(usize::MAX)
        .saturating_mul(RECORD_SIZE_HINT)
        .min(MAX_PRESIZE)
}

/// A contiguous run of formatted records.
///
/// `key` is the global index of the first line, so keys are unique across
/// workers and the next chunk in order starts at `key + line_count`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Chunk {
    pub key: u64,
    pub line_count: u64,
    pub payload: Bytes,
}

impl Chunk {
    pub fn new(key: u64, line_count: u64, payload: Bytes) -> Chunk {
        Chunk {
            key,
            line_count,
            payload,
        }
    }

    /// Key of the chunk that follows this one.
    #[inline]
    pub fn next_key(&self) -> u64 {
        self.key + self.line_count
    }
}
