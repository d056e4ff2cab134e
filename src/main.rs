//! winpack - Windows installer packager.
//!
//! Resolves layered configuration, validates icon assets, code-signs the
//! application output, and drives per-format installer builders.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match winpack::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
