use thiserror::Error;

/// Errors reported by board construction and spawning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid direction code: {0}")]
    InvalidDirection(u8),

    #[error("no empty cell")]
    BoardFull,

    #[error("tile exponent {0} outside 1..=15")]
    InvalidTile(u8),

    #[error("cell {index} holds exponent {value}, above 15")]
    InvalidCell { index: usize, value: u8 },

    #[error("invalid board text: {0}")]
    Parse(String),
}

/// Convenience Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;
