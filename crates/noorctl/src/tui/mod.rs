//! Dashboard TUI
//!
//! Structure:
//! - event_loop.rs: terminal setup, background fetches, main loop
//! - state.rs: dashboard model fed by messages and clock ticks
//! - render.rs: drawing
//! - layout.rs: grid computation

mod event_loop;
pub mod layout;
pub mod render;
pub mod state;

pub use event_loop::run;
