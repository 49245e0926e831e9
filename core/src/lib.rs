#![no_std]

extern crate alloc;

pub use cell::*;
pub use chord::*;
pub use error::*;
pub use grid::*;
pub use preset::*;
pub use session::*;
pub use types::*;

mod cell;
mod chord;
mod error;
mod grid;
mod preset;
mod session;
mod types;
