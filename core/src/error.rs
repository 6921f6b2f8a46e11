use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Nothing to pick up there")]
    NothingToPick,
    #[error("Illegal move")]
    IllegalMove,
}

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error("Game not found: {0}")]
    UnknownGame(String),
}
