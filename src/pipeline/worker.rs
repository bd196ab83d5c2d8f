//! Worker synthesizing one contiguous range of lines.

use std::ops::Range;
use std::sync::mpsc;
use std::sync::Arc;

use bytes::BytesMut;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chunk::{self, Chunk};
use crate::error::GenError;
use crate::partition::WorkRange;
use crate::record::Synthesizer;

pub struct Worker {
    range: WorkRange,
    seed: u64,
    chunk_size: u64,
    total_lines: u64,
    synthesizer: Arc<Synthesizer>,
}

impl Worker {
    pub fn new(
        range: WorkRange,
        seed: u64,
        chunk_size: u64,
        total_lines: u64,
        synthesizer: Arc<Synthesizer>,
    ) -> Worker {
        Worker {
            range,
            seed,
            chunk_size,
            total_lines,
            synthesizer,
        }
    }

    /// Private stream of this worker, only depends on the seed and worker id.
    pub fn rng(seed: u64, worker_id: usize) -> StdRng {
        StdRng::seed_from_u64(seed.wrapping_add(worker_id as u64))
    }

    /// Send the range chunk by chunk, blocking while the channel is full.
    /// Returns the number of chunks sent.
    pub fn run(self, tx: mpsc::SyncSender<Chunk>) -> Result<u64, GenError> {
        let worker_id = self.range.worker_id;

        if self.range.is_empty() {
            log::debug!("Worker {} has nothing to do", worker_id);
            return Ok(0);
        }

        log::debug!(
            "Worker {} generates lines {}..{}",
            worker_id,
            self.range.start,
            self.range.end
        );

        let mut rng = Worker::rng(self.seed, worker_id);
        let mut sent = 0;

        for lines in self.range.chunks(self.chunk_size) {
            let chunk = self.build_chunk(lines, &mut rng);

            log::trace!(
                "Worker {} sends chunk {} ({} lines)",
                worker_id,
                chunk.key,
                chunk.line_count
            );

            tx.send(chunk)
                .map_err(|_| GenError::WriterDisconnected { worker_id })?;
            sent += 1;
        }

        Ok(sent)
    }

    fn build_chunk(&self, lines: Range<u64>, rng: &mut StdRng) -> Chunk {
        let line_count = lines.end - lines.start;
        let mut buf = BytesMut::with_capacity(chunk::presize(line_count));

        for line in lines.clone() {
            self.synthesizer.write_record(line, rng, &mut buf);

            // The last line of the whole output has no terminator.
            if line + 1 < self.total_lines {
                buf.extend_from_slice(b"\n");
            }
        }

        Chunk::new(lines.start, line_count, buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityList;
    use std::thread;

    fn synthesizer() -> Arc<Synthesizer> {
        let cities = CityList::from_names(vec!["A", "B", "C"]).unwrap();
        Arc::new(Synthesizer::new(1, cities))
    }

    fn collect(worker: Worker) -> Vec<Chunk> {
        let (tx, rx) = mpsc::sync_channel(1);
        let handle = thread::spawn(move || worker.run(tx));

        let chunks: Vec<_> = rx.iter().collect();
        let sent = handle.join().unwrap().unwrap();

        assert_eq!(sent, chunks.len() as u64);
        chunks
    }

    #[test]
    fn test_chunks_keyed_by_start_line() {
        let range = WorkRange {
            start: 10,
            end: 35,
            worker_id: 2,
        };
        let chunks = collect(Worker::new(range, 1, 10, 100, synthesizer()));

        let keys: Vec<_> = chunks.iter().map(|chunk| chunk.key).collect();
        let counts: Vec<_> = chunks.iter().map(|chunk| chunk.line_count).collect();

        assert_eq!(keys, vec![10, 20, 30]);
        assert_eq!(counts, vec![10, 10, 5]);

        for chunk in &chunks {
            let newlines = chunk.payload.iter().filter(|&&b| b == b'\n').count();
            assert_eq!(newlines as u64, chunk.line_count);
        }
    }

    #[test]
    fn test_last_line_has_no_terminator() {
        let range = WorkRange {
            start: 90,
            end: 100,
            worker_id: 3,
        };
        let chunks = collect(Worker::new(range, 1, 4, 100, synthesizer()));
        let last = chunks.last().unwrap();

        assert_eq!(last.key, 98);
        assert!(!last.payload.ends_with(b"\n"));
        assert_eq!(last.payload.iter().filter(|&&b| b == b'\n').count(), 1);
        assert!(chunks[0].payload.ends_with(b"\n"));
    }

    #[test]
    fn test_empty_range() {
        let range = WorkRange {
            start: 5,
            end: 5,
            worker_id: 0,
        };

        assert!(collect(Worker::new(range, 1, 4, 5, synthesizer())).is_empty());
    }

    #[test]
    fn test_same_seed_same_chunks() {
        let range = WorkRange {
            start: 0,
            end: 50,
            worker_id: 1,
        };

        let chunks0 = collect(Worker::new(range, 7, 16, 50, synthesizer()));
        let chunks1 = collect(Worker::new(range, 7, 16, 50, synthesizer()));

        assert_eq!(chunks0, chunks1);
    }

    #[test]
    fn test_writer_gone() {
        let range = WorkRange {
            start: 0,
            end: 10,
            worker_id: 4,
        };
        let (tx, rx) = mpsc::sync_channel(1);
        drop(rx);

        match Worker::new(range, 1, 2, 10, synthesizer()).run(tx) {
            Err(GenError::WriterDisconnected { worker_id }) => assert_eq!(worker_id, 4),
            other => panic!("Unexpected result {:?}", other),
        }
    }
}
