//! Terminal front-end over the notes use cases.

pub mod args;
pub mod commands;

pub use args::{Args, Command};
pub use commands::run;
