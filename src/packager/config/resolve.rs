//! Raw configuration tree validation.
//!
//! Turns the merged raw tree produced by [`ConfigStack::merged`] into typed,
//! validated records. All type and platform constraints are enforced here,
//! before any signing or builder work starts, so configuration mistakes
//! surface without waiting for a build.
//!
//! [`ConfigStack::merged`]: super::ConfigStack::merged

use super::{PackageSettings, SquirrelOptions, WinOptions};
use crate::packager::error::{Error, Result};
use serde_json::Value;
use std::path::PathBuf;
use url::Url;

/// Resolves and validates the `win` section of the merged configuration.
///
/// `windows_host` gates options that depend on Windows-only mechanisms and
/// defaults to the compile-time host via [`resolve_win_options`].
///
/// # Errors
///
/// - [`Error::BoolExpected`] when a boolean-typed field (`msi`, at either
///   level) holds a string
/// - [`Error::PlatformRestriction`] when `certificateSubjectName` is set on
///   a non-Windows host
/// - [`Error::InvalidConfig`] for other shape mismatches and malformed URLs
pub fn resolve_win_options_for_host(merged: &Value, windows_host: bool) -> Result<WinOptions> {
    let win = merged.get("win").unwrap_or(&Value::Null);

    let certificate_subject_name = optional_string(win, "certificateSubjectName")?;
    if certificate_subject_name.is_some() && !windows_host {
        return Err(Error::PlatformRestriction("certificateSubjectName"));
    }

    let squirrel_value = win.get("squirrel").unwrap_or(&Value::Null);
    let squirrel = SquirrelOptions {
        remote_releases: optional_url(squirrel_value, "remoteReleases")?,
        msi: optional_bool(squirrel_value, "msi")?,
        loading_gif: optional_path(squirrel_value, "loadingGif")?,
    };

    Ok(WinOptions {
        certificate_file: optional_path(win, "certificateFile")?,
        certificate_password: optional_string(win, "certificatePassword")?,
        certificate_subject_name,
        icon: optional_string(win, "icon")?,
        msi: optional_bool(win, "msi")?,
        sign_tool_path: optional_path(win, "signToolPath")?,
        squirrel,
    })
}

/// [`resolve_win_options_for_host`] against the current host.
pub fn resolve_win_options(merged: &Value) -> Result<WinOptions> {
    resolve_win_options_for_host(merged, cfg!(windows))
}

/// Resolves package metadata from the merged configuration, validating the
/// version string against semver.
pub fn resolve_package_settings(merged: &Value) -> Result<PackageSettings> {
    let settings: PackageSettings = serde_json::from_value(merged.clone())?;

    if !settings.version.is_empty() {
        settings
            .version
            .parse::<semver::Version>()
            .map_err(|e| Error::InvalidConfig {
                field: "version".into(),
                message: e.to_string(),
            })?;
    }

    Ok(settings)
}

/// Extracts an optional boolean field, rejecting string values with the
/// exact type-mismatch message. The offending value is quoted as its JSON
/// literal, never coerced.
fn optional_bool(value: &Value, field: &str) -> Result<Option<bool>> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other @ Value::String(_)) => Err(Error::BoolExpected {
            field: field.to_string(),
            value: other.to_string(),
        }),
        Some(other) => Err(Error::InvalidConfig {
            field: field.to_string(),
            message: format!("expected boolean, got {other}"),
        }),
    }
}

fn optional_string(value: &Value, field: &str) -> Result<Option<String>> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::InvalidConfig {
            field: field.to_string(),
            message: format!("expected string, got {other}"),
        }),
    }
}

fn optional_path(value: &Value, field: &str) -> Result<Option<PathBuf>> {
    Ok(optional_string(value, field)?.map(PathBuf::from))
}

fn optional_url(value: &Value, field: &str) -> Result<Option<Url>> {
    match optional_string(value, field)? {
        None => Ok(None),
        Some(raw) => Url::parse(&raw)
            .map(Some)
            .map_err(|e| Error::InvalidConfig {
                field: field.to_string(),
                message: format!("'{raw}' is not a valid URL: {e}"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn msi_string_is_rejected_verbatim() {
        let merged = json!({"win": {"msi": "false"}});
        let err = resolve_win_options_for_host(&merged, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "msi expected to be boolean value, but string '\"false\"' was specified"
        );
    }

    #[test]
    fn msi_boolean_is_accepted() {
        let merged = json!({"win": {"msi": true}});
        let options = resolve_win_options_for_host(&merged, true).unwrap();
        assert_eq!(options.msi, Some(true));
    }

    #[test]
    fn squirrel_msi_is_boolean_typed_too() {
        let merged = json!({"win": {"squirrel": {"msi": "true"}}});
        let err = resolve_win_options_for_host(&merged, true).unwrap_err();
        assert!(matches!(err, Error::BoolExpected { .. }));
    }

    #[test]
    fn subject_name_requires_windows_host() {
        let merged = json!({"win": {"certificateSubjectName": "ev"}});
        let err = resolve_win_options_for_host(&merged, false).unwrap_err();
        assert_eq!(err.to_string(), "certificateSubjectName supported only on Windows");

        let options = resolve_win_options_for_host(&merged, true).unwrap();
        assert_eq!(options.certificate_subject_name.as_deref(), Some("ev"));
    }

    #[test]
    fn remote_releases_must_be_a_url() {
        let merged = json!({"win": {"squirrel": {"remoteReleases": "not a url"}}});
        let err = resolve_win_options_for_host(&merged, true).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref field, .. } if field == "remoteReleases"));
    }

    #[test]
    fn missing_win_section_resolves_to_defaults() {
        let options = resolve_win_options_for_host(&json!({}), false).unwrap();
        assert!(options.certificate_file.is_none());
        assert!(options.msi.is_none());
        assert!(!options.effective_msi());
    }

    #[test]
    fn bad_version_is_a_config_error() {
        let merged = json!({"productName": "App", "version": "not-semver"});
        let err = resolve_package_settings(&merged).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref field, .. } if field == "version"));
    }
}
