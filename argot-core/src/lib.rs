//! Core library for building command-line applications out of typed commands.
//!
//! A host registers commands (each a [`CommandDescriptor`] plus a factory),
//! and the framework tokenizes the arguments, resolves the command, binds and
//! converts option values, renders help and version text, and maps failures
//! to exit codes.
//!
//! ## Usage Example
//!
//! ```rust
//! use argot_core::prelude::*;
//! use argot_core::{CliApplicationBuilder, VirtualConsole};
//!
//! struct Concat {
//!     inputs: Vec<String>,
//!     separator: String,
//! }
//!
//! impl CommandDefinition for Concat {
//!     fn descriptor() -> CommandDescriptor {
//!         CommandDescriptor::named("concat")
//!             .parameter(ParameterDescriptor::sequence(ScalarKind::Text).short('i').required())
//!             .parameter(
//!                 ParameterDescriptor::scalar(ScalarKind::Text)
//!                     .short('s')
//!                     .default_value(""),
//!             )
//!     }
//!
//!     fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError> {
//!         Ok(Self {
//!             inputs: bound.get("i")?,
//!             separator: bound.get("s")?,
//!         })
//!     }
//! }
//!
//! #[async_trait]
//! impl Command for Concat {
//!     async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
//!         write!(console.output(), "{}", self.inputs.join(&self.separator))?;
//!         Ok(())
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let app = CliApplicationBuilder::new().add_command::<Concat>().build().unwrap();
//! let mut console = VirtualConsole::new();
//! let code = app.run(["concat", "-i", "foo", "bar", "-s", " "], &mut console).await;
//! assert_eq!(code, 0);
//! assert_eq!(console.output_text(), "foo bar");
//! # });
//! ```

pub mod application;
pub mod binding;
pub mod command;
pub mod config;
pub mod console;
pub mod conversion;
pub mod error;
pub mod help;
pub mod input;
pub mod registry;
pub mod schema;

// Re-exports for public API
pub use application::{CliApplication, PREVIEW_DIRECTIVE};
pub use binding::{BoundCommand, FromValue, bind};
pub use command::{Command, CommandDefinition, CommandEntry};
pub use config::{ApplicationMetadata, CliApplicationBuilder};
pub use console::{
    Console, ConsoleColor, SystemConsole, VirtualConsole, with_background, with_colors,
    with_foreground,
};
pub use conversion::{DefaultValueConverter, ValueConverter};
pub use error::{
    ArgotResult, BindError, CommandError, ConfigurationError, ConversionError, ValidationError,
};
pub use help::{HelpSource, render_help};
pub use input::{OptionInput, OptionKey, ParsedInput, tokenize};
pub use registry::{CommandRegistry, Resolution, resolve};
pub use schema::{CommandDescriptor, ParameterDescriptor, ScalarKind, TargetShape, Value};

/// Everything a command implementation usually needs.
pub mod prelude {
    pub use std::io::Write;

    pub use async_trait::async_trait;

    pub use crate::binding::BoundCommand;
    pub use crate::command::{Command, CommandDefinition, CommandEntry};
    pub use crate::console::{Console, ConsoleColor};
    pub use crate::error::{BindError, CommandError};
    pub use crate::schema::{CommandDescriptor, ParameterDescriptor, ScalarKind, Value};
}
