use thiserror::Error;

/// Failures of the rule engine. Wall hits and self-collision are not errors;
/// they end the game through [`GameStatus::GameOver`](crate::GameStatus).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("no free cell for food on a {field_size}x{field_size} field ({occupied} occupied)")]
    NoFreeCell { field_size: i32, occupied: usize },
}
