//! Error types for engine operations
//!
//! Engine errors never cross the boundary as values: the C-ABI layer renders
//! them into the error buffer of a failure envelope.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// A required argument pointer was null
    #[error("Null pointer passed for {0}")]
    NullArgument(&'static str),

    /// An argument buffer was not valid UTF-8
    #[error("Invalid UTF-8 in {arg}: {detail}")]
    InvalidUtf8 { arg: &'static str, detail: String },

    /// An argument could not be parsed into the expected shape
    #[error("Failed to parse {what} JSON: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("Failed to serialize {what}: {detail}")]
    Serialize { what: &'static str, detail: String },

    #[error("Day index {0} out of bounds")]
    DayOutOfBounds(usize),

    #[error("Segment index {0} out of bounds")]
    SegmentOutOfBounds(usize),

    /// The move would take the segment past either end of its day
    #[error("Segment {segment} cannot move by {offset}")]
    InvalidMove { segment: usize, offset: i32 },

    #[error("Failed to read file: {0}")]
    Read(String),

    #[error("Failed to write file: {0}")]
    Write(String),

    #[error("Could not determine {0} directory")]
    NoPlatformDir(&'static str),

    /// Generated text cannot be handed out as a C string
    #[error("Result for {0} contains an interior NUL byte")]
    InteriorNul(&'static str),

    /// Internal failure that unwound out of an operation (indicates a bug)
    #[error("Internal engine error during {0}")]
    Panic(&'static str),
}

pub type EngineResult<T> = Result<T, EngineError>;
