//! Configuration for myls.
//!
//! Settings are layered: built-in defaults, then `myls.toml` (see [Config::default_path]), then
//! the `MYLS_*` environment variables, then command line flags ([Options::resolve]).

pub mod display;
pub mod general;
pub mod load;
pub mod options;

pub use display::Display;
pub use general::{General, InternalGeneral};
pub use load::{Config, RawConfig};
pub use options::Options;
