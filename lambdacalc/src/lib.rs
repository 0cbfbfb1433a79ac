//! Interactive evaluator for the untyped lambda calculus with named definitions.

pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod hygiene;
pub mod parser;
pub mod reduce;
pub mod session;
pub mod term;

pub use command::Command;
pub use config::Config;
pub use error::{Error, ParseError};
pub use session::Session;
pub use term::{Name, Term};
