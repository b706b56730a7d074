//! The execution side of a command.
//!
//! A command is registered as a [`CommandEntry`]: its descriptor plus a
//! factory that builds an executable [`Command`] from the bound options.
//! Types implementing [`CommandDefinition`] provide both halves themselves
//! and are registered with [`CommandEntry::of`].

use std::fmt;

use async_trait::async_trait;

use crate::binding::BoundCommand;
use crate::console::Console;
use crate::error::BindError;
use crate::schema::CommandDescriptor;

/// A unit of work the application can run.
///
/// Return a [`CommandError`](crate::error::CommandError) (wrapped in
/// `anyhow::Error`) to control the exit code; any other error exits with the
/// generic failure code.
#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()>;
}

/// A command type that describes its own options and knows how to build
/// itself from them.
///
/// # Examples
///
/// ```rust
/// use argot_core::prelude::*;
///
/// struct Hello {
///     name: String,
/// }
///
/// impl CommandDefinition for Hello {
///     fn descriptor() -> CommandDescriptor {
///         CommandDescriptor::named("hello")
///             .parameter(
///                 ParameterDescriptor::scalar(ScalarKind::Text)
///                     .short('n')
///                     .default_value("world"),
///             )
///     }
///
///     fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError> {
///         Ok(Self { name: bound.get("n")? })
///     }
/// }
///
/// #[async_trait]
/// impl Command for Hello {
///     async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
///         writeln!(console.output(), "Hello {}", self.name)?;
///         Ok(())
///     }
/// }
///
/// let entry = CommandEntry::of::<Hello>();
/// assert_eq!(entry.descriptor().name.as_deref(), Some("hello"));
/// ```
pub trait CommandDefinition: Command + Sized + 'static {
    fn descriptor() -> CommandDescriptor;

    fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError>;
}

type CommandFactory =
    Box<dyn Fn(&BoundCommand<'_>) -> Result<Box<dyn Command>, BindError> + Send + Sync>;

/// A registered command: descriptor plus factory.
pub struct CommandEntry {
    descriptor: CommandDescriptor,
    factory: CommandFactory,
}

impl CommandEntry {
    /// Registers a descriptor with a hand-written factory.
    pub fn new<F>(descriptor: CommandDescriptor, factory: F) -> Self
    where
        F: Fn(&BoundCommand<'_>) -> Result<Box<dyn Command>, BindError> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            factory: Box::new(factory),
        }
    }

    /// Registers a [`CommandDefinition`] type.
    pub fn of<T: CommandDefinition>() -> Self {
        Self::new(T::descriptor(), |bound| {
            let command = T::from_bound(bound)?;
            Ok(Box::new(command) as Box<dyn Command>)
        })
    }

    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    /// Builds the executable command from bound options.
    pub fn create(&self, bound: &BoundCommand<'_>) -> Result<Box<dyn Command>, BindError> {
        (self.factory)(bound)
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
