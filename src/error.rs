//! Error taxonomy of the generator.

use std::path::PathBuf;

use failure::Fail;

#[derive(Debug, Fail)]
pub enum GenError {
    /// The output destination can't be created, nothing is generated.
    #[fail(display = "Can't create output destination {:?}: {}", path, reason)]
    Destination { path: PathBuf, reason: String },

    /// The ordering writer saw a key below the next expected one, or a key
    /// already pending.
    #[fail(
        display = "Ordering violation, expected key {} but got {}",
        expected, actual
    )]
    Ordering { expected: u64, actual: u64 },

    #[fail(
        display = "Channel closed at key {} with {} chunks pending, first pending key {}",
        expected, pending, first_pending
    )]
    PendingAtClose {
        expected: u64,
        pending: usize,
        first_pending: u64,
    },

    #[fail(display = "Expected {} lines but {} were written", expected, written)]
    Incomplete { expected: u64, written: u64 },

    #[fail(display = "City list is empty")]
    EmptyCityList,

    #[fail(display = "Malformed city name {:?} at line {}", name, line)]
    MalformedCity { line: usize, name: String },

    #[fail(display = "Invalid configuration: {}", _0)]
    InvalidConfig(String),

    #[fail(display = "Writer went away before worker {} finished", worker_id)]
    WriterDisconnected { worker_id: usize },

    #[fail(display = "Thread {} panicked", _0)]
    ThreadPanicked(String),
}
