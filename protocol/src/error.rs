use chordsweep_core::GameError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Malformed command {0:?}, expected `<o|c|f> <x> <y>`")]
    MalformedCommand(String),
    #[error("Invalid coordinate {0:?}")]
    InvalidCoordinate(String),
    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),
    #[error("API url {0:?} cannot be used as a base")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;
