//! Central Portal bundler - packages release artifacts and uploads them.

use central_portal_bundler::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            for suggestion in e.recovery_suggestions() {
                eprintln!("  → {suggestion}");
            }
            if e.is_recoverable() {
                eprintln!("  → This failure may be temporary; running the same command again can succeed");
            }
            1
        }
    };

    process::exit(exit_code);
}
