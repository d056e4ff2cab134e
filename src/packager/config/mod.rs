//! Layered configuration for packaging operations.
//!
//! Raw configuration arrives as an ordered stack of [`ConfigLayer`] value
//! trees (defaults, project file, per-invocation overrides). The stack is
//! merged field by field and resolved into typed, validated records before
//! any target pipeline work begins.

mod layers;
mod package;
mod resolve;
mod win;

pub use layers::{ConfigLayer, ConfigStack};
pub use package::PackageSettings;
pub use resolve::{resolve_package_settings, resolve_win_options, resolve_win_options_for_host};
pub use win::{SquirrelOptions, WinOptions};
