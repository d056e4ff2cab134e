//! Command line interface for winpack.

mod args;

pub use args::Args;

use crate::error::{Result, WinpackError};
use crate::packager::{
    ConfigLayer, ConfigStack, SigntoolSign, WinPackager, resolve_win_options,
};
use std::sync::Arc;

/// Main CLI entry point. Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let targets = args.targets().map_err(WinpackError::Cli)?;

    let config_path = args.project.join(&args.config);
    let mut stack = ConfigStack::new();
    if config_path.is_file() {
        let raw = tokio::fs::read_to_string(&config_path).await?;
        stack = stack.push(ConfigLayer::new("project", serde_json::from_str(&raw)?));
    } else {
        log::warn!("no configuration file at {}, using defaults", config_path.display());
    }

    // Fail fast on configuration mistakes, and pick up an explicit sign
    // tool path before the pipeline starts.
    let win = resolve_win_options(&stack.merged())?;
    let sign_tool = Arc::new(SigntoolSign::new(win.sign_tool_path.clone()));

    let mut builder = WinPackager::builder()
        .config(stack)
        .project_dir(&args.project)
        .app_dir(&args.app_dir)
        .out_dir(&args.out_dir)
        .sign_tool(sign_tool);
    if let Some(password) = &args.certificate_password {
        builder = builder.certificate_password_override(password.clone());
    }
    let packager = builder.build()?;

    let reports = packager.pack(targets).await;

    let mut exit_code = 0;
    for report in &reports {
        if report.succeeded() {
            for artifact in &report.artifacts {
                println!("{}: {}", report.target, artifact.display());
            }
        } else {
            exit_code = 1;
            if let Some(error) = &report.error {
                eprintln!("{}: {error}", report.target);
            }
        }
    }
    Ok(exit_code)
}
