//! CLI module for the bento timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `session`: Interactive session driving one timer block
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
pub use session::{Flow, Session, SessionCommand};
