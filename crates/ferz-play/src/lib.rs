//! Line-oriented text driver for ferz.

pub mod command;
pub mod error;
pub mod session;

pub use command::{Command, Setting, parse_command};
pub use error::PlayError;
pub use session::Session;
