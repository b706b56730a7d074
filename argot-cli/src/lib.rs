//! The `argot` demo application.
//!
//! Registers the commands under [`commands`] with the framework. The binary
//! in `main.rs` only sets up logging and hands the process arguments to the
//! application built here.

pub mod commands;
pub mod logging;

use argot_core::{ArgotResult, CliApplication, CliApplicationBuilder};

/// Title shown at the top of the root help.
pub const APP_TITLE: &str = "Argot";

/// Builds the application with every demo command registered.
pub fn build_application() -> ArgotResult<CliApplication> {
    CliApplicationBuilder::new()
        .add_commands(commands::all())
        .use_title(APP_TITLE)
        .use_executable_name("argot")
        .use_version_text(concat!("v", env!("CARGO_PKG_VERSION")))
        .use_description("Demo application for the Argot command-line framework.")
        .build()
}
