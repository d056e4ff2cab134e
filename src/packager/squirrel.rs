//! Effective distribution options for the Squirrel installer build.

use crate::packager::config::{PackageSettings, WinOptions};
use crate::packager::icon::IconAsset;
use std::path::{Path, PathBuf};
use url::Url;

/// Install spinner picked up by convention when none is configured.
const DEFAULT_LOADING_GIF: &str = "install-spinner.gif";

/// Final, fully-resolved options one Squirrel builder invocation consumes.
///
/// A read-only snapshot: computed once per target after configuration
/// layering and asset validation, then passed verbatim to the builder and
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveDistOptions {
    /// Product name shown by the installer.
    pub product_name: String,
    /// Application version string.
    pub version: String,
    /// Application description.
    pub description: String,
    /// Company string derived from the configured authors.
    pub company: Option<String>,
    /// Validated application icon, when one exists.
    pub icon: Option<PathBuf>,
    /// Install spinner shown while the installer runs.
    pub loading_gif: Option<PathBuf>,
    /// Remote release feed used for delta update computation.
    pub remote_releases: Option<Url>,
    /// Whether to additionally generate an MSI package.
    pub msi: bool,
}

/// Computes the effective distribution options for a Squirrel build.
///
/// Deterministic for a given configuration and project tree. The loading
/// gif is the explicitly configured path (resolved against the project
/// root) or the conventional `install-spinner.gif` in the build-resources
/// directory, if present.
pub fn compute_effective_dist_options(
    package: &PackageSettings,
    options: &WinOptions,
    icon: Option<&IconAsset>,
    project_dir: &Path,
    build_resources_dir: &Path,
) -> EffectiveDistOptions {
    let loading_gif = match &options.squirrel.loading_gif {
        Some(configured) => {
            let path = if configured.is_absolute() {
                configured.clone()
            } else {
                project_dir.join(configured)
            };
            Some(path)
        }
        None => {
            let conventional = build_resources_dir.join(DEFAULT_LOADING_GIF);
            conventional.is_file().then_some(conventional)
        }
    };

    EffectiveDistOptions {
        product_name: package.product_name.clone(),
        version: package.version.clone(),
        description: package.description.clone(),
        company: package.company_name(),
        icon: icon.map(|asset| asset.path().to_path_buf()),
        loading_gif,
        remote_releases: options.squirrel.remote_releases.clone(),
        msi: options.effective_msi(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::config::SquirrelOptions;

    fn package() -> PackageSettings {
        PackageSettings {
            product_name: "TestApp".into(),
            version: "1.1.0".into(),
            description: "test app".into(),
            authors: Some(vec!["Foo Bar".into()]),
            ..Default::default()
        }
    }

    #[test]
    fn conventional_spinner_is_detected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let build = dir.path().join("build");
        std::fs::create_dir_all(&build).expect("mkdir");
        let spinner = build.join("install-spinner.gif");
        std::fs::write(&spinner, b"GIF89a").expect("write spinner");

        let effective = compute_effective_dist_options(
            &package(),
            &WinOptions::default(),
            None,
            dir.path(),
            &build,
        );
        assert_eq!(effective.loading_gif.as_deref(), Some(spinner.as_path()));
    }

    #[test]
    fn explicit_spinner_wins_over_convention() {
        let dir = tempfile::tempdir().expect("tempdir");
        let build = dir.path().join("build");
        std::fs::create_dir_all(&build).expect("mkdir");
        std::fs::write(build.join("install-spinner.gif"), b"GIF89a").expect("write spinner");

        let options = WinOptions {
            squirrel: SquirrelOptions {
                loading_gif: Some(PathBuf::from("assets/spin.gif")),
                ..Default::default()
            },
            ..Default::default()
        };

        let effective =
            compute_effective_dist_options(&package(), &options, None, dir.path(), &build);
        assert_eq!(
            effective.loading_gif.as_deref(),
            Some(dir.path().join("assets/spin.gif").as_path())
        );
    }

    #[test]
    fn msi_flag_falls_through_to_win_level() {
        let options = WinOptions {
            msi: Some(true),
            ..Default::default()
        };
        let dir = tempfile::tempdir().expect("tempdir");
        let effective =
            compute_effective_dist_options(&package(), &options, None, dir.path(), dir.path());
        assert!(effective.msi);
        assert_eq!(effective.company.as_deref(), Some("Foo Bar"));
    }
}
