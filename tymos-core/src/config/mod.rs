//! Configuration types
//!
//! Hardware constants, board-agnostic configuration structures and the
//! parser for the `clock.toml` format.

pub mod hardware;
pub mod parse;
pub mod types;

pub use hardware::*;
pub use parse::{parse_config, ParseError};
pub use types::*;
