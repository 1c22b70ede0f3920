//! Error types for building a cave and configuring a search.

use std::num::ParseIntError;

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("unexpected line format: {line}")]
    MalformedLine { line: String },

    #[error("invalid flow rate '{value}' for valve {valve}: {source}")]
    InvalidFlowRate {
        valve: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("valve {valve} is declared more than once")]
    DuplicateValve { valve: String },

    #[error("valve {valve} has a tunnel to undeclared valve {neighbor}")]
    UnknownNeighbor { valve: String, neighbor: String },

    #[error("start valve {valve} is not declared")]
    UnknownStart { valve: String },

    #[error("too many rooms: {count} (at most {max} are supported)")]
    TooManyRooms { count: usize, max: usize },

    #[error("too many rooms left after compaction: {count} (at most {max} are supported)")]
    TooManyValves { count: usize, max: usize },

    #[error("invalid budget: {message}")]
    InvalidBudget { message: String },

    #[error("pressure released by {searchers} searcher(s) over {minutes} minutes is too large to count")]
    PressureOverflow { minutes: usize, searchers: u8 },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
