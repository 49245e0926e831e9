//! Wire contract with the game server: JSON payloads, socket commands and
//! the REST/WebSocket URL layout.

pub use command::*;
pub use endpoint::*;
pub use error::*;
pub use update::*;

mod command;
mod endpoint;
mod error;
mod update;
