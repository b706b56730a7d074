// ============================================================================
// argot-cli/src/main.rs
// ============================================================================
//
// MAIN ENTRY POINT: The `argot` binary
//
// Sets up logging, builds the demo application and runs it with the process
// arguments. The exit code of the run becomes the process exit code.
//
// A registration mistake (duplicate names, reserved options) is reported in
// red and exits with code 1 before any arguments are looked at.

use std::process;

use log::{debug, error};
use owo_colors::OwoColorize;

use argot_cli::{build_application, logging};

#[tokio::main]
async fn main() {
    logging::init();

    let app = match build_application() {
        Ok(app) => app,
        Err(e) => {
            error!("Invalid command registration: {}", e);
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    let exit_code = app.run_with_environment().await;
    debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}
