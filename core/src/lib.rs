#![no_std]

extern crate alloc;

pub use board::*;
pub use error::*;
pub use session::*;
pub use snapshot::*;
pub use transcript::*;
pub use types::*;

mod board;
mod error;
mod session;
mod snapshot;
mod transcript;
mod types;
