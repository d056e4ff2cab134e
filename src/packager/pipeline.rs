//! Per-target packaging pipeline.
//!
//! Each [`PackagingTarget`] runs its own strictly sequential pipeline:
//! resolve configuration, validate assets, sign, compute effective options,
//! invoke the format builder, drain deferred tasks. Targets execute
//! concurrently; they share no mutable state once configuration is
//! resolved, and a failure aborts only the target that raised it.

use crate::packager::builder::{BuildRequest, BuilderRegistry, DeferredTasks};
use crate::packager::config::{
    ConfigStack, resolve_package_settings, resolve_win_options_for_host,
};
use crate::packager::error::{Context, Result};
use crate::packager::icon::resolve_icon;
use crate::packager::sign::{SignTool, SigntoolSign, resolve_signing_credentials};
use crate::packager::squirrel::compute_effective_dist_options;
use crate::packager::target::{PackagingTarget, TargetReport, TargetState};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Windows packaging pipeline.
///
/// Built via [`WinPackager::builder`]. Holds the ordered configuration
/// stack, project layout, and the injected signing/builder capabilities.
///
/// # Examples
///
/// ```no_run
/// use winpack::packager::{
///     Arch, ConfigLayer, ConfigStack, PackageFormat, PackagingTarget, WinPackager,
/// };
///
/// # async fn example() -> winpack::packager::Result<()> {
/// let config = ConfigStack::new()
///     .push(ConfigLayer::new("project", serde_json::json!({
///         "productName": "MyApp",
///         "version": "1.0.0",
///         "win": { "msi": true }
///     })));
///
/// let packager = WinPackager::builder()
///     .config(config)
///     .project_dir("path/to/project")
///     .app_dir("path/to/built-app")
///     .out_dir("dist")
///     .build()?;
///
/// let reports = packager
///     .pack(vec![PackagingTarget::new(PackageFormat::Dir, Arch::X64)])
///     .await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WinPackager {
    config: ConfigStack,
    project_dir: PathBuf,
    build_resources_dir: PathBuf,
    app_dir: PathBuf,
    out_dir: PathBuf,
    password_override: Option<String>,
    windows_host: bool,
    sign_tool: Arc<dyn SignTool>,
    builders: BuilderRegistry,
    /// App directories already signed in this invocation. Shared across
    /// target clones: one sign per distinct directory, concurrent targets
    /// for the same arch wait instead of rewriting the same binaries.
    signed_dirs: Arc<Mutex<HashSet<PathBuf>>>,
}

impl WinPackager {
    /// Creates a builder for the pipeline.
    pub fn builder() -> WinPackagerBuilder {
        WinPackagerBuilder::default()
    }

    /// Runs the pipeline for every requested target.
    ///
    /// Targets run concurrently. The returned reports are in the same order
    /// as `targets`; each carries the final state and, on failure, the
    /// error that aborted that target.
    pub async fn pack(&self, targets: Vec<PackagingTarget>) -> Vec<TargetReport> {
        let mut handles = Vec::with_capacity(targets.len());
        for target in targets {
            let packager = self.clone();
            handles.push((target, tokio::spawn(async move {
                packager.run_target(target).await
            })));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (target, handle) in handles {
            let report = match handle.await {
                Ok(report) => report,
                Err(join_error) => TargetReport {
                    target,
                    state: TargetState::Failed,
                    error: Some(join_error.into()),
                    artifacts: Vec::new(),
                },
            };
            match &report.error {
                None => log::info!("{target}: done"),
                Some(e) => log::error!("{target}: failed: {e}"),
            }
            reports.push(report);
        }
        reports
    }

    /// Runs one target's pipeline to completion.
    ///
    /// Deferred tasks dispatched by the builder are drained even when an
    /// earlier step failed, so already-started side effects are never
    /// silently dropped.
    async fn run_target(&self, target: PackagingTarget) -> TargetReport {
        let mut state = TargetState::Configured;
        let mut deferred = DeferredTasks::new();

        let result = self.drive_target(target, &mut state, &mut deferred).await;
        let drained = deferred.drain().await;

        match (result, drained) {
            (Ok(artifacts), Ok(())) => TargetReport {
                target,
                state: TargetState::Done,
                error: None,
                artifacts,
            },
            (Ok(_), Err(e)) => TargetReport {
                target,
                state: TargetState::Failed,
                error: Some(e),
                artifacts: Vec::new(),
            },
            // The pipeline error wins over a drain error when both occur.
            (Err(e), _) => TargetReport {
                target,
                state: TargetState::Failed,
                error: Some(e),
                artifacts: Vec::new(),
            },
        }
    }

    /// Sequential pipeline steps for one target. `state` records the last
    /// state reached for reporting.
    async fn drive_target(
        &self,
        target: PackagingTarget,
        state: &mut TargetState,
        deferred: &mut DeferredTasks,
    ) -> Result<Vec<PathBuf>> {
        log::debug!("{target}: {state}");
        let merged = self.config.merged();
        let package = resolve_package_settings(&merged)?;
        let win = resolve_win_options_for_host(&merged, self.windows_host)?;

        let icon = resolve_icon(
            &self.project_dir,
            &self.build_resources_dir,
            win.icon.as_deref(),
        )
        .await?;
        *state = TargetState::AssetsValidated;
        log::debug!("{target}: {state}");

        match resolve_signing_credentials(&win, self.password_override.as_deref()) {
            Some(credentials) => {
                // The lock is held across the sign call so a sibling target
                // sharing this directory waits for the result.
                let mut signed = self.signed_dirs.lock().await;
                if signed.contains(&self.app_dir) {
                    log::debug!("{target}: {} already signed", self.app_dir.display());
                } else {
                    self.sign_tool.sign(&self.app_dir, &credentials).await?;
                    signed.insert(self.app_dir.clone());
                }
            }
            None => log::info!("{target}: no signing credentials, skipping signing"),
        }
        *state = TargetState::Signed;
        log::debug!("{target}: {state}");

        let options = compute_effective_dist_options(
            &package,
            &win,
            icon.as_ref(),
            &self.project_dir,
            &self.build_resources_dir,
        );
        *state = TargetState::OptionsComputed;
        log::debug!("{target}: {state}");

        let builder = self.builders.get(target.format)?;
        let request = BuildRequest {
            target,
            options,
            app_out_dir: self.app_dir.clone(),
            out_dir: self.out_dir.clone(),
        };
        let artifacts = builder.build(&request, deferred).await?;
        *state = TargetState::Built;
        log::debug!("{target}: {state}");

        Ok(artifacts)
    }
}

/// Builder for [`WinPackager`].
#[derive(Default)]
pub struct WinPackagerBuilder {
    config: ConfigStack,
    project_dir: Option<PathBuf>,
    build_resources_dir: Option<PathBuf>,
    app_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    password_override: Option<String>,
    windows_host: Option<bool>,
    sign_tool: Option<Arc<dyn SignTool>>,
    builders: Option<BuilderRegistry>,
}

impl WinPackagerBuilder {
    /// Sets the ordered configuration stack.
    pub fn config(mut self, config: ConfigStack) -> Self {
        self.config = config;
        self
    }

    /// Sets the project root directory.
    ///
    /// # Required
    pub fn project_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the build-resources directory.
    ///
    /// Default: `<project_dir>/build`
    pub fn build_resources_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_resources_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the staged application output directory (the signing and
    /// builder input).
    ///
    /// # Required
    pub fn app_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.app_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the artifact output directory.
    ///
    /// # Required
    pub fn out_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets a call-time certificate password override. Always wins over the
    /// configured password.
    pub fn certificate_password_override(mut self, password: impl Into<String>) -> Self {
        self.password_override = Some(password.into());
        self
    }

    /// Overrides host platform detection for Windows-only options.
    ///
    /// Default: `cfg!(windows)`
    pub fn windows_host(mut self, windows_host: bool) -> Self {
        self.windows_host = Some(windows_host);
        self
    }

    /// Injects the signing capability.
    ///
    /// Default: [`SigntoolSign`] looking up `signtool` on PATH.
    pub fn sign_tool(mut self, sign_tool: Arc<dyn SignTool>) -> Self {
        self.sign_tool = Some(sign_tool);
        self
    }

    /// Injects the format builder registry.
    ///
    /// Default: [`BuilderRegistry::with_defaults`] (dir and zip only).
    pub fn builders(mut self, builders: BuilderRegistry) -> Self {
        self.builders = Some(builders);
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if `project_dir`, `app_dir`, or `out_dir` is missing.
    pub fn build(self) -> Result<WinPackager> {
        let project_dir = self.project_dir.context("project_dir is required")?;
        let build_resources_dir = self
            .build_resources_dir
            .unwrap_or_else(|| project_dir.join("build"));

        Ok(WinPackager {
            config: self.config,
            build_resources_dir,
            project_dir,
            app_dir: self.app_dir.context("app_dir is required")?,
            out_dir: self.out_dir.context("out_dir is required")?,
            password_override: self.password_override,
            windows_host: self.windows_host.unwrap_or(cfg!(windows)),
            sign_tool: self
                .sign_tool
                .unwrap_or_else(|| Arc::new(SigntoolSign::new(None))),
            builders: self.builders.unwrap_or_else(BuilderRegistry::with_defaults),
            signed_dirs: Arc::new(Mutex::new(HashSet::new())),
        })
    }
}
