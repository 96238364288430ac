//! HTTP request handlers.

mod game;
mod health;
mod ranking;

pub use game::*;
pub use health::*;
pub use ranking::*;
