use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("invalid stock length '{0}', expected a positive whole number")]
    InvalidCapacity(String),

    #[error("piece length {length} is invalid for stock length {capacity}")]
    InvalidPieceLength { length: u32, capacity: u32 },

    #[error("piece length '{0}' is not a positive whole number")]
    InvalidPieceToken(String),

    #[error("no valid lengths to cut")]
    EmptyInput,

    #[error("too many pieces: {count} (max {max})")]
    InputTooLarge { count: usize, max: usize },
}
