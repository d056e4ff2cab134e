//! Windows installer packaging core.
//!
//! Packages a built desktop application into Windows-native installer
//! formats (Squirrel-style self-updating installer, NSIS, MSI, plain
//! directory, zip) from a single project tree. The crate owns the target
//! configuration resolver and code-signing orchestration; byte-level
//! installer construction is delegated to [`packager::FormatBuilder`]
//! implementations.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod packager;

// Re-export commonly used types
pub use error::{Result, WinpackError};
pub use packager::{
    Arch, BuilderRegistry, ConfigLayer, ConfigStack, EffectiveDistOptions, IconAsset,
    PackageFormat, PackagingTarget, ResolvedSigningCredentials, SignTool, TargetReport,
    WinOptions, WinPackager,
};
