//! Command line argument parsing and validation.

use crate::packager::{Arch, PackageFormat, PackagingTarget};
use clap::Parser;
use std::path::PathBuf;

/// Windows installer packager
#[derive(Parser, Debug)]
#[command(
    name = "winpack",
    version,
    about = "Windows installer packager",
    long_about = "Packages a built desktop application into Windows installer formats.

Resolves layered configuration, validates icon assets, code-signs the
application output, and drives per-format builders.

Usage:
  winpack --project . --app-dir out/app --format dir --format zip --out-dir dist
  winpack --project . --config winpack.json --format squirrel --arch x64 --arch ia32

Exit code 0 = every requested (format, arch) target built successfully."
)]
pub struct Args {
    /// Project root directory
    #[arg(short = 'p', long, value_name = "DIR", default_value = ".")]
    pub project: PathBuf,

    /// Project configuration file (JSON), relative to the project root
    #[arg(short = 'c', long, value_name = "FILE", default_value = "winpack.json")]
    pub config: PathBuf,

    /// Staged application directory to package
    #[arg(long, value_name = "DIR")]
    pub app_dir: PathBuf,

    /// Output directory for artifacts
    #[arg(short = 'o', long, value_name = "DIR", default_value = "dist")]
    pub out_dir: PathBuf,

    /// Installer formats to build: squirrel, nsis, msi, dir, zip
    #[arg(short = 'f', long = "format", value_name = "FORMAT", required = true)]
    pub formats: Vec<String>,

    /// Target architectures: ia32, x64, arm64
    #[arg(short = 'a', long = "arch", value_name = "ARCH", default_value = "x64")]
    pub archs: Vec<String>,

    /// Certificate password override, beats any configured password
    #[arg(long, value_name = "PASSWORD", env = "WIN_CSC_KEY_PASSWORD", hide_env_values = true)]
    pub certificate_password: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments and expand them into the requested target list
    pub fn targets(&self) -> Result<Vec<PackagingTarget>, String> {
        let mut formats = Vec::with_capacity(self.formats.len());
        for name in &self.formats {
            let format = PackageFormat::parse(name).ok_or_else(|| {
                format!("Invalid format: {name}. Valid formats: squirrel, nsis, msi, dir, zip")
            })?;
            formats.push(format);
        }

        let mut archs = Vec::with_capacity(self.archs.len());
        for name in &self.archs {
            let arch = Arch::parse(name)
                .ok_or_else(|| format!("Invalid arch: {name}. Valid archs: ia32, x64, arm64"))?;
            archs.push(arch);
        }

        let mut targets = Vec::with_capacity(formats.len() * archs.len());
        for format in &formats {
            for arch in &archs {
                targets.push(PackagingTarget::new(*format, *arch));
            }
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["winpack", "--app-dir", "out/app"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn formats_cross_archs() {
        let args = args(&["--format", "dir", "--format", "zip", "--arch", "x64", "--arch", "ia32"]);
        let targets = args.targets().expect("valid targets");
        assert_eq!(targets.len(), 4);
        assert_eq!(targets[0], PackagingTarget::new(PackageFormat::Dir, Arch::X64));
        assert_eq!(targets[3], PackagingTarget::new(PackageFormat::Zip, Arch::Ia32));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let args = args(&["--format", "dmg"]);
        assert!(args.targets().is_err());
    }
}
