//! Signing credential resolution and the code-signing seam.
//!
//! Credential resolution is separate from signing itself: the resolver
//! applies override precedence and decides whether signing happens at all,
//! while [`SignTool`] is the capability the pipeline invokes. Tests inject a
//! recording implementation instead of shelling out to a real tool.

use crate::packager::config::WinOptions;
use crate::packager::error::{Error, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// Boxed future used by capability traits so the pipeline can hold
/// `Arc<dyn SignTool>` / `Arc<dyn FormatBuilder>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fully resolved signing credentials.
///
/// Never partially applied: either a value of this type exists and signing
/// runs with it, or resolution returned `None` and signing is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSigningCredentials {
    /// Certificate file path. `None` means store lookup by subject name,
    /// which resolution only permits on Windows hosts.
    pub cert_path: Option<PathBuf>,

    /// Certificate password, after override precedence.
    pub password: Option<String>,

    /// Certificate subject name for OS store lookup.
    pub subject_name: Option<String>,
}

/// Resolves the effective signing credentials.
///
/// `password_override` is a call-time secret (e.g. injected through the
/// environment rather than the versioned project file) and always wins over
/// the configured password, even when configuration declares one.
///
/// Returns `None` when neither a certificate file nor a subject name is
/// configured; downstream signing is then a no-op, not an error.
pub fn resolve_signing_credentials(
    options: &WinOptions,
    password_override: Option<&str>,
) -> Option<ResolvedSigningCredentials> {
    if options.certificate_file.is_none() && options.certificate_subject_name.is_none() {
        log::debug!("no certificate configured, signing will be skipped");
        return None;
    }

    let password = password_override
        .map(str::to_string)
        .or_else(|| options.certificate_password.clone());

    Some(ResolvedSigningCredentials {
        cert_path: options.certificate_file.clone(),
        password,
        subject_name: options.certificate_subject_name.clone(),
    })
}

/// Code-signing capability.
///
/// The pipeline never calls this when credentials are absent, so
/// implementations may assume they hold something signable.
pub trait SignTool: Send + Sync {
    /// Signs the binary or output directory at `path`.
    ///
    /// Failures surface as [`Error::Signing`] with the tool's diagnostic
    /// text unmodified.
    fn sign<'a>(
        &'a self,
        path: &'a Path,
        credentials: &'a ResolvedSigningCredentials,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Production [`SignTool`] shelling out to `signtool`.
pub struct SigntoolSign {
    tool_path: Option<PathBuf>,
}

impl SigntoolSign {
    /// Creates a signer, optionally pinned to an explicit tool path.
    /// Without one, `signtool` is looked up on PATH at sign time.
    pub fn new(tool_path: Option<PathBuf>) -> Self {
        Self { tool_path }
    }

    fn locate_tool(&self) -> Result<PathBuf> {
        match &self.tool_path {
            Some(path) => Ok(path.clone()),
            None => match which::which("signtool") {
                Ok(path) => Ok(path),
                Err(e) => crate::bail!("signtool not found on PATH: {e}"),
            },
        }
    }
}

impl SignTool for SigntoolSign {
    fn sign<'a>(
        &'a self,
        path: &'a Path,
        credentials: &'a ResolvedSigningCredentials,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let tool = self.locate_tool()?;

            let mut command = tokio::process::Command::new(&tool);
            command.args(["sign", "/fd", "sha256", "/tr", "http://timestamp.digicert.com"]);

            if let Some(cert) = &credentials.cert_path {
                command.arg("/f").arg(cert);
            }
            if let Some(password) = &credentials.password {
                command.arg("/p").arg(password);
            }
            if let Some(subject) = &credentials.subject_name {
                command.arg("/n").arg(subject);
            }
            command.arg(path);

            log::info!("signing {}", path.display());
            let output = command.output().await.map_err(|e| Error::CommandFailed {
                command: tool.display().to_string(),
                error: e,
            })?;

            if !output.status.success() {
                // Surface the tool diagnostic verbatim.
                let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
                return Err(Error::Signing {
                    path: path.to_path_buf(),
                    message,
                });
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_with_password(password: &str) -> WinOptions {
        WinOptions {
            certificate_file: Some(PathBuf::from("secretFile")),
            certificate_password: Some(password.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn call_time_override_beats_configured_password() {
        let options = options_with_password("mustBeOverridden");
        let credentials = resolve_signing_credentials(&options, Some("pass")).expect("resolved");
        assert_eq!(credentials.cert_path.as_deref(), Some(Path::new("secretFile")));
        assert_eq!(credentials.password.as_deref(), Some("pass"));
    }

    #[test]
    fn configured_password_is_used_without_override() {
        let options = options_with_password("fromConfig");
        let credentials = resolve_signing_credentials(&options, None).expect("resolved");
        assert_eq!(credentials.password.as_deref(), Some("fromConfig"));
    }

    #[test]
    fn absent_certificate_resolves_to_none() {
        let options = WinOptions::default();
        assert!(resolve_signing_credentials(&options, Some("pass")).is_none());
    }

    #[test]
    fn subject_name_without_cert_path_still_resolves() {
        let options = WinOptions {
            certificate_subject_name: Some("ev".into()),
            ..Default::default()
        };
        let credentials = resolve_signing_credentials(&options, None).expect("resolved");
        assert!(credentials.cert_path.is_none());
        assert_eq!(credentials.subject_name.as_deref(), Some("ev"));
    }
}
