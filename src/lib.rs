//! Internal library crate for myls.
//!
//! The shipped application is the `myls` binary (`src/main.rs`).
//!
//! This library exists to share code between targets (binary, tests) and to keep modules organized.
//! This API is only used to build the `myls` binary and is not considered a library for external use.

pub mod app;
pub mod config;
pub mod core;
pub mod utils;
