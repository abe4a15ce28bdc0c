//! Noor Control - terminal front end for the Noor prayer times app
//!
//! The binary in main.rs only parses arguments and dispatches; everything it
//! calls lives here so integration tests can reach it.

pub mod app;
pub mod cli;
pub mod commands;
pub mod errors;
pub mod logging;
pub mod output;
pub mod tui;
