//! # docsync Testkit
//!
//! Test utilities for docsync.
//!
//! This crate provides:
//! - Record and configuration fixtures
//! - Temporary static directories holding a page template
//! - Property-based generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docsync_testkit::prelude::*;
//!
//! #[test]
//! fn syncs_everything() {
//!     let records = numbered_records(250);
//!     // ... feed them to a MemorySource
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
