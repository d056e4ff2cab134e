//! Windows platform-specific options.

use std::path::PathBuf;
use url::Url;

/// Validated Windows packaging options.
///
/// Produced by [`resolve_win_options`](super::resolve_win_options) from the
/// merged raw configuration tree. All type and platform constraints have
/// been enforced by the time a value of this type exists.
///
/// # Configuration
///
/// ```json
/// {
///   "win": {
///     "certificateFile": "secrets/app.pfx",
///     "certificatePassword": "...",
///     "icon": "customIcon",
///     "msi": true,
///     "squirrel": {
///       "remoteReleases": "https://example.com/releases",
///       "loadingGif": "build/install-spinner.gif"
///     }
///   }
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct WinOptions {
    /// Path to the code-signing certificate (.pfx / .p12).
    ///
    /// Default: None (unsigned, unless a subject name is given)
    pub certificate_file: Option<PathBuf>,

    /// Password for the certificate file.
    ///
    /// A call-time override (e.g. a secret injected by the environment)
    /// always wins over this value.
    ///
    /// Default: None
    pub certificate_password: Option<String>,

    /// Certificate subject name for OS certificate-store lookup.
    ///
    /// Windows-only: the store lookup mechanism does not exist elsewhere,
    /// so configuring this on another host fails validation.
    ///
    /// Default: None
    pub certificate_subject_name: Option<String>,

    /// Icon name, with or without the `.ico` extension.
    ///
    /// Resolved against the project root and the build-resources directory;
    /// falls back to the conventional `icon.ico`.
    ///
    /// Default: None
    pub icon: Option<String>,

    /// Whether to additionally generate an MSI package.
    ///
    /// Strictly boolean-typed: a string value fails validation.
    ///
    /// Default: None (false)
    pub msi: Option<bool>,

    /// Explicit path to the signing executable.
    ///
    /// Default: None (looked up on PATH)
    pub sign_tool_path: Option<PathBuf>,

    /// Squirrel installer sub-options.
    pub squirrel: SquirrelOptions,
}

/// Squirrel self-updating installer sub-options.
#[derive(Clone, Debug, Default)]
pub struct SquirrelOptions {
    /// Remote release feed used for delta update computation.
    ///
    /// Default: None
    pub remote_releases: Option<Url>,

    /// MSI generation flag at the Squirrel level.
    ///
    /// Falls back to the win-level `msi` flag when unset.
    ///
    /// Default: None
    pub msi: Option<bool>,

    /// Explicit install spinner path.
    ///
    /// When unset, `install-spinner.gif` in the build-resources directory
    /// is picked up if present.
    ///
    /// Default: None
    pub loading_gif: Option<PathBuf>,
}

impl WinOptions {
    /// Effective MSI flag for a Squirrel build: the squirrel-level value,
    /// falling back to the win-level value, defaulting to false.
    pub fn effective_msi(&self) -> bool {
        self.squirrel.msi.or(self.msi).unwrap_or(false)
    }
}
