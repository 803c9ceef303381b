//! CLI command implementations.

pub mod check;
pub mod render;
pub mod serve;
pub mod sync;
