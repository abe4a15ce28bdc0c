//! Noor Common - prayer schedule core shared by the Noor front ends
//!
//! Resolves the six daily prayer events for a coordinate, selects the next
//! one for a reference instant, and fetches the daily reflection. Astronomy
//! and Hijri conversion come from external crates behind the oracle traits.

pub mod clock;
pub mod config;
pub mod error;
pub mod labels;
pub mod location;
pub mod oracle;
pub mod reflection;
pub mod schedule;
pub mod session;
pub mod types;

pub use error::*;
pub use types::*;
