//! Packaging targets: formats, architectures, and per-target lifecycle.

use crate::packager::error::Error;
use serde::Deserialize;
use std::fmt;

/// Installer format produced by one target build.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
    /// Squirrel-style self-updating installer with a remote release feed.
    Squirrel,
    /// NSIS installer executable.
    Nsis,
    /// MSI package.
    Msi,
    /// Plain directory output.
    Dir,
    /// Zip archive of the directory output.
    Zip,
}

impl PackageFormat {
    /// Parses a user-supplied format name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "squirrel" => Some(Self::Squirrel),
            "nsis" => Some(Self::Nsis),
            "msi" => Some(Self::Msi),
            "dir" => Some(Self::Dir),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }

    /// Stable lowercase name, matching the CLI spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Squirrel => "squirrel",
            Self::Nsis => "nsis",
            Self::Msi => "msi",
            Self::Dir => "dir",
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// CPU architecture for target binaries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// x86 / i686 (32-bit)
    #[serde(rename = "ia32")]
    Ia32,
    /// x86_64 / AMD64 (64-bit)
    X64,
    /// AArch64 / ARM64 (64-bit)
    Arm64,
}

impl Arch {
    /// Parses a user-supplied architecture name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ia32" | "x86" => Some(Self::Ia32),
            "x64" | "x86_64" => Some(Self::X64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            _ => None,
        }
    }

    /// Stable name used in output paths and artifact names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ia32 => "ia32",
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One scheduled (format, architecture) build unit.
///
/// Created when a build is requested; its lifecycle ends when the builder
/// invocation and all of its deferred tasks have completed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PackagingTarget {
    pub format: PackageFormat,
    pub arch: Arch,
}

impl PackagingTarget {
    pub fn new(format: PackageFormat, arch: Arch) -> Self {
        Self { format, arch }
    }
}

impl fmt::Display for PackagingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.format, self.arch)
    }
}

/// Pipeline state of one target.
///
/// Transitions are strictly sequential; `Failed` is reachable from any
/// non-terminal state and terminal for that target only.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum TargetState {
    Configured,
    AssetsValidated,
    Signed,
    OptionsComputed,
    Built,
    Done,
    Failed,
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configured => "configured",
            Self::AssetsValidated => "assets-validated",
            Self::Signed => "signed",
            Self::OptionsComputed => "options-computed",
            Self::Built => "built",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of one target's pipeline run.
#[derive(Debug)]
pub struct TargetReport {
    /// The target this report describes.
    pub target: PackagingTarget,
    /// Final state: `Done` on success, `Failed` otherwise.
    pub state: TargetState,
    /// The error that aborted the target, if any.
    pub error: Option<Error>,
    /// Artifact paths produced by the format builder.
    pub artifacts: Vec<std::path::PathBuf>,
}

impl TargetReport {
    /// Whether the target completed its builder call and drained its
    /// deferred tasks.
    pub fn succeeded(&self) -> bool {
        self.state == TargetState::Done
    }
}
