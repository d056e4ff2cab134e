//! Windows packaging core.
//!
//! The pipeline per target:
//!
//! 1. Resolve the layered configuration into validated [`WinOptions`]
//! 2. Validate the icon asset ([`IconAsset`])
//! 3. Resolve signing credentials and sign (or skip when unconfigured)
//! 4. Compute the per-format [`EffectiveDistOptions`]
//! 5. Invoke the registered [`FormatBuilder`]
//! 6. Drain the target's deferred tasks
//!
//! Targets are independent: a failure in one (format, architecture) pair
//! never aborts its siblings.

pub mod builder;
pub mod config;
pub mod error;
pub mod fs;
pub mod icon;
pub mod pipeline;
pub mod sign;
pub mod squirrel;
pub mod target;

pub use builder::{BuildRequest, BuilderRegistry, DeferredTasks, DirBuilder, FormatBuilder, ZipBuilder};
pub use config::{
    ConfigLayer, ConfigStack, PackageSettings, SquirrelOptions, WinOptions,
    resolve_package_settings, resolve_win_options, resolve_win_options_for_host,
};
pub use error::{Context, Error, ErrorExt, Result};
pub use icon::{IconAsset, resolve_icon, validate_icon};
pub use pipeline::{WinPackager, WinPackagerBuilder};
pub use sign::{BoxFuture, ResolvedSigningCredentials, SignTool, SigntoolSign, resolve_signing_credentials};
pub use squirrel::{EffectiveDistOptions, compute_effective_dist_options};
pub use target::{Arch, PackageFormat, PackagingTarget, TargetReport, TargetState};
