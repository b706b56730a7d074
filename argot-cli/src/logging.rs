// ============================================================================
// argot-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup for the argot binary
//
// Diagnostics go to stderr through the `log` facade. The filter comes from
// the ARGOT_LOG environment variable and defaults to `warn`, so command
// output on stdout stays clean unless more is asked for:
// - ARGOT_LOG=debug: stage transitions of every run
// - ARGOT_LOG=trace: token classification as well
//
// KEY COMPONENTS:
// - init: installs the global logger
// - get_timestamp: timestamp used in each log line

use std::io::Write;

use env_logger::Env;
use log::Level;
use owo_colors::OwoColorize;

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "ARGOT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Installs the global logger. Calling it twice is harmless.
pub fn init() {
    let use_color = std::env::var("NO_COLOR").is_err();

    let env = Env::default().filter_or(LOG_ENV_VAR, DEFAULT_FILTER);
    let result = env_logger::Builder::from_env(env)
        .format(move |buf, record| {
            let level = format!("{:<5}", record.level());
            let level = if !use_color {
                level
            } else {
                match record.level() {
                    Level::Error => level.bright_red().to_string(),
                    Level::Warn => level.yellow().to_string(),
                    Level::Info => level.green().to_string(),
                    Level::Debug => level.blue().to_string(),
                    Level::Trace => level.magenta().to_string(),
                }
            };

            writeln!(buf, "{} {} {}", get_timestamp(), level, record.args())
        })
        .try_init();

    if let Err(error) = result {
        log::debug!("Logger already initialized: {}", error);
    }
}

/// Returns the current local time formatted as "HH:MM:SS%.3f".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}
