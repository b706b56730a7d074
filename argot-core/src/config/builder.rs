// ============================================================================
// argot-core/src/config/builder.rs
// ============================================================================
//
// APPLICATION BUILDER: Builder Pattern for CliApplication
//
// Collects commands, metadata and an optional value converter, then
// validates the command set and produces an immutable CliApplication.
//
// KEY COMPONENTS:
// - CliApplicationBuilder: fluent builder, consumed by build()
// - Metadata defaults derived from the running executable

use log::debug;

use super::{ApplicationMetadata, DEFAULT_VERSION_TEXT, current_executable_name};
use crate::application::CliApplication;
use crate::command::{CommandDefinition, CommandEntry};
use crate::conversion::{DefaultValueConverter, ValueConverter};
use crate::error::ArgotResult;
use crate::registry::CommandRegistry;

/// Builder for [`CliApplication`].
///
/// # Examples
///
/// ```rust
/// use argot_core::prelude::*;
/// use argot_core::CliApplicationBuilder;
///
/// struct Greet;
///
/// impl CommandDefinition for Greet {
///     fn descriptor() -> CommandDescriptor {
///         CommandDescriptor::default_command().description("Says hello.")
///     }
///
///     fn from_bound(_bound: &BoundCommand<'_>) -> Result<Self, BindError> {
///         Ok(Greet)
///     }
/// }
///
/// #[async_trait]
/// impl Command for Greet {
///     async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
///         writeln!(console.output(), "hello")?;
///         Ok(())
///     }
/// }
///
/// let app = CliApplicationBuilder::new()
///     .add_command::<Greet>()
///     .use_title("Greeter")
///     .use_version_text("v2.0")
///     .build()
///     .unwrap();
/// assert_eq!(app.metadata().version_text, "v2.0");
/// ```
pub struct CliApplicationBuilder {
    entries: Vec<CommandEntry>,
    title: Option<String>,
    executable_name: Option<String>,
    version_text: Option<String>,
    description: Option<String>,
    converter: Option<Box<dyn ValueConverter>>,
}

impl CliApplicationBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            title: None,
            executable_name: None,
            version_text: None,
            description: None,
            converter: None,
        }
    }

    /// Registers a command type.
    pub fn add_command<T: CommandDefinition>(mut self) -> Self {
        self.entries.push(CommandEntry::of::<T>());
        self
    }

    /// Registers a pre-built entry, e.g. one with a closure factory.
    pub fn add_entry(mut self, entry: CommandEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn add_commands(mut self, entries: impl IntoIterator<Item = CommandEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn use_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn use_executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable_name = Some(name.into());
        self
    }

    pub fn use_version_text(mut self, version_text: impl Into<String>) -> Self {
        self.version_text = Some(version_text.into());
        self
    }

    pub fn use_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the converter used when binding option values.
    pub fn use_converter(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    /// Validates the registered commands and builds the application.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`](crate::error::ConfigurationError)
    /// for duplicate names, more than one default command, or invalid
    /// option declarations.
    pub fn build(self) -> ArgotResult<CliApplication> {
        let registry = CommandRegistry::new(self.entries)?;

        let executable_name = self.executable_name.unwrap_or_else(current_executable_name);
        let metadata = ApplicationMetadata {
            title: self.title.unwrap_or_else(|| executable_name.clone()),
            executable_name,
            version_text: self
                .version_text
                .unwrap_or_else(|| DEFAULT_VERSION_TEXT.to_string()),
            description: self.description,
        };
        debug!(
            "Built application '{}' with {} command(s)",
            metadata.title,
            registry.len()
        );

        let converter = self
            .converter
            .unwrap_or_else(|| Box::new(DefaultValueConverter));
        Ok(CliApplication::new(metadata, registry, converter))
    }
}

impl Default for CliApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BoundCommand;
    use crate::command::Command;
    use crate::console::Console;
    use crate::error::{BindError, ConfigurationError};
    use crate::schema::CommandDescriptor;
    use async_trait::async_trait;

    struct Named;

    impl CommandDefinition for Named {
        fn descriptor() -> CommandDescriptor {
            CommandDescriptor::named("cmd")
        }

        fn from_bound(_bound: &BoundCommand<'_>) -> Result<Self, BindError> {
            Ok(Named)
        }
    }

    #[async_trait]
    impl Command for Named {
        async fn execute(&self, _console: &mut dyn Console) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn title_defaults_to_executable_name() {
        let app = CliApplicationBuilder::new()
            .add_command::<Named>()
            .use_executable_name("tool")
            .build()
            .unwrap();
        assert_eq!(app.metadata().title, "tool");
        assert_eq!(app.metadata().executable_name, "tool");
        assert_eq!(app.metadata().version_text, DEFAULT_VERSION_TEXT);
    }

    #[test]
    fn duplicate_commands_fail_to_build() {
        let result = CliApplicationBuilder::new()
            .add_command::<Named>()
            .add_command::<Named>()
            .build();
        assert!(matches!(
            result,
            Err(ConfigurationError::DuplicateCommand(name)) if name == "cmd"
        ));
    }

    #[test]
    fn empty_builder_still_builds() {
        let app = CliApplicationBuilder::default().build().unwrap();
        assert!(app.registry().is_empty());
    }
}
