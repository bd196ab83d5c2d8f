//! Ordering writer, the single consumer of the chunk channel.
//!
//! Chunks arrive in whatever order workers finish them. The writer emits a
//! chunk only when its key equals the next expected line index, anything that
//! arrives early waits in the pending map until its predecessors are written.

use std::collections::HashMap;
use std::io::Write;
use std::sync::mpsc;

use failure::{Error, ResultExt};

use crate::chunk::Chunk;
use crate::error::GenError;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct WriterStats {
    pub lines: u64,
    pub chunks: u64,
    pub bytes: u64,
    /// High-water mark of the pending map.
    pub max_pending: usize,
}

pub struct OrderingWriter<W: Write> {
    out: W,
    next_expected: u64,
    pending: HashMap<u64, Chunk>,
    stats: WriterStats,
}

impl<W: Write> OrderingWriter<W> {
    pub fn new(out: W) -> OrderingWriter<W> {
        OrderingWriter {
            out,
            next_expected: 0,
            pending: HashMap::new(),
            stats: WriterStats::default(),
        }
    }

    #[inline]
    pub fn next_expected(&self) -> u64 {
        self.next_expected
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn accept(&mut self, chunk: Chunk) -> Result<(), Error> {
        if chunk.key < self.next_expected || self.pending.contains_key(&chunk.key) {
            return Err(GenError::Ordering {
                expected: self.next_expected,
                actual: chunk.key,
            }
            .into());
        }

        if chunk.key != self.next_expected {
            log::trace!(
                "Hold chunk {} while waiting for {}",
                chunk.key,
                self.next_expected
            );

            self.pending.insert(chunk.key, chunk);
            self.stats.max_pending = self.stats.max_pending.max(self.pending.len());
            return Ok(());
        }

        self.emit(chunk)?;

        // Drain the contiguous run that was waiting on this chunk.
        while let Some(chunk) = self.pending.remove(&self.next_expected) {
            self.emit(chunk)?;
        }

        Ok(())
    }

    fn emit(&mut self, chunk: Chunk) -> Result<(), Error> {
        self.out
            .write_all(&chunk.payload)
            .with_context(|_| format!("Failed to write chunk {}", chunk.key))?;

        self.next_expected = chunk.next_key();
        self.stats.lines += chunk.line_count;
        self.stats.chunks += 1;
        self.stats.bytes += chunk.payload.len() as u64;

        Ok(())
    }

    /// Check nothing is left behind and flush the output.
    pub fn finish(mut self) -> Result<(W, WriterStats), Error> {
        if let Some(&first_pending) = self.pending.keys().min() {
            return Err(GenError::PendingAtClose {
                expected: self.next_expected,
                pending: self.pending.len(),
                first_pending,
            }
            .into());
        }

        self.out.flush().context("Failed to flush output")?;

        Ok((self.out, self.stats))
    }
}

/// Drain `rx` until every sender is gone.
pub fn run<W: Write>(out: W, rx: mpsc::Receiver<Chunk>) -> Result<(W, WriterStats), Error> {
    let mut writer = OrderingWriter::new(out);

    for chunk in rx {
        writer.accept(chunk)?;
    }

    let (out, stats) = writer.finish()?;

    log::debug!(
        "Writer done, {} chunks, {} bytes, at most {} pending",
        stats.chunks,
        stats.bytes,
        stats.max_pending
    );

    Ok((out, stats))
}
