//! Error types for packaging operations.
//!
//! Validation errors carry the exact user-visible message for the offending
//! field so callers and external tooling can match on them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for packager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving configuration, validating assets, signing,
/// or invoking a format builder.
///
/// Every error aborts only the [`PackagingTarget`](crate::packager::PackagingTarget)
/// that raised it; the pipeline reports per-target outcomes independently.
#[derive(Error, Debug)]
pub enum Error {
    /// A boolean-typed configuration field received a string value.
    ///
    /// The value is rendered as its JSON literal, so a raw `"false"` appears
    /// as `'"false"'` in the message.
    #[error("{field} expected to be boolean value, but string '{value}' was specified")]
    BoolExpected {
        /// Configuration field name (e.g. "msi")
        field: String,
        /// Offending value as a JSON literal
        value: String,
    },

    /// An option valid only on Windows hosts was used elsewhere.
    #[error("{0} supported only on Windows")]
    PlatformRestriction(&'static str),

    /// A configuration field has the wrong shape (non-boolean type errors,
    /// malformed URLs, malformed versions).
    #[error("invalid value for {field}: {message}")]
    InvalidConfig {
        /// Configuration field name
        field: String,
        /// What was wrong with the value
        message: String,
    },

    /// The icon file is not a structurally valid ICO container.
    #[error("Windows icon is not valid ico file, please fix '{}'", .0.display())]
    IconNotValid(PathBuf),

    /// The largest image embedded in the icon is smaller than 256x256.
    #[error("Windows icon size must be at least 256x256, please fix '{}'", .0.display())]
    IconTooSmall(PathBuf),

    /// The external signing tool failed. The tool's diagnostic text is
    /// passed through unmodified.
    #[error("failed to sign {}: {message}", .path.display())]
    Signing {
        /// Binary or directory that was being signed
        path: PathBuf,
        /// Diagnostic output of the signing tool, verbatim
        message: String,
    },

    /// A format builder reported a failure. Opaque to this core.
    #[error("{format} builder failed: {message}")]
    Builder {
        /// Installer format name
        format: String,
        /// Builder diagnostic
        message: String,
    },

    /// No builder is registered for the requested installer format.
    #[error("no builder registered for format '{0}'")]
    BuilderUnavailable(String),

    /// External command could not be executed
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Underlying IO error
        #[source]
        error: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors from raw configuration trees
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A deferred task panicked or was aborted before completion
    #[error("deferred task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Generic errors
    #[error("{0}")]
    GenericError(String),
}

/// Bail out of the current function with a [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::packager::Error::GenericError(format!($($arg)*)))
    };
}

/// Attach a static message to `Option`/`Result` values, in the shape of
/// `anyhow::Context` but producing [`enum@Error`].
pub trait Context<T> {
    /// Replace the failure with a `GenericError` carrying `msg`.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

/// Extension for IO results that records the action and path being touched.
pub trait ErrorExt<T> {
    /// Wrap an IO failure with the filesystem action and path it occurred on.
    fn fs_context(self, action: &str, path: &std::path::Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, action: &str, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| {
            Error::GenericError(format!("error {action} at {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_expected_message_quotes_json_literal() {
        let err = Error::BoolExpected {
            field: "msi".into(),
            value: serde_json::Value::String("false".into()).to_string(),
        };
        assert_eq!(
            err.to_string(),
            "msi expected to be boolean value, but string '\"false\"' was specified"
        );
    }

    #[test]
    fn platform_restriction_message() {
        let err = Error::PlatformRestriction("certificateSubjectName");
        assert_eq!(err.to_string(), "certificateSubjectName supported only on Windows");
    }

    #[test]
    fn icon_messages_name_the_path() {
        let path = PathBuf::from("/project/build/icon.ico");
        assert_eq!(
            Error::IconTooSmall(path.clone()).to_string(),
            "Windows icon size must be at least 256x256, please fix '/project/build/icon.ico'"
        );
        assert_eq!(
            Error::IconNotValid(path).to_string(),
            "Windows icon is not valid ico file, please fix '/project/build/icon.ico'"
        );
    }
}
