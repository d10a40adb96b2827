use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid hole index")]
    InvalidHole,
    #[error("Session is not playing, no actions are accepted")]
    NotPlaying,
    #[error("Session is already playing")]
    AlreadyPlaying,
}

pub type Result<T> = core::result::Result<T, GameError>;
