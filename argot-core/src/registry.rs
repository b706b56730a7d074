// ============================================================================
// argot-core/src/registry.rs
// ============================================================================
//
// COMMAND REGISTRY: Registered commands, hierarchy and resolution
//
// KEY COMPONENTS:
// - CommandRegistry: validated set of CommandEntry values
// - Resolution: outcome of matching a ParsedInput against the registry
// - Hierarchy helpers: find_parent, children_of, siblings_of
//
// Command names form a hierarchy by word prefix: "remote add" is a child of
// "remote" when "remote" is registered, otherwise of the default command.
// Names are unique, so at most one command can match a given input and
// resolution never has to break ties.

use std::collections::HashSet;

use log::debug;

use crate::command::CommandEntry;
use crate::error::{ArgotResult, ConfigurationError};
use crate::input::ParsedInput;
use crate::schema::{CommandDescriptor, ParameterDescriptor};

/// Outcome of resolving input against the registry.
#[derive(Debug)]
pub enum Resolution<'a> {
    Found(&'a CommandEntry),
    NotFound,
}

/// Holds every registered command; read-only after construction.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    /// Validates and stores the given commands.
    ///
    /// Fails on the first malformed descriptor or duplicate name.
    pub fn new(entries: Vec<CommandEntry>) -> ArgotResult<Self> {
        let mut names: HashSet<&str> = HashSet::new();
        let mut has_default = false;

        for entry in &entries {
            let descriptor = entry.descriptor();
            match descriptor.name.as_deref() {
                None if has_default => return Err(ConfigurationError::DuplicateDefaultCommand),
                None => has_default = true,
                Some(name) => {
                    validate_command_name(name)?;
                    if !names.insert(name) {
                        return Err(ConfigurationError::DuplicateCommand(name.to_string()));
                    }
                }
            }
            validate_parameters(descriptor)?;
        }

        debug!("Registered {} command(s)", entries.len());
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.entries.iter().map(CommandEntry::descriptor)
    }

    /// Looks a command up by exact name; `None` finds the default command.
    pub fn find(&self, name: Option<&str>) -> Option<&CommandEntry> {
        self.entries
            .iter()
            .find(|entry| entry.descriptor().name.as_deref() == name)
    }

    pub fn default_command(&self) -> Option<&CommandDescriptor> {
        self.find(None).map(CommandEntry::descriptor)
    }

    /// Matches the input's command name exactly.
    pub fn resolve(&self, input: &ParsedInput) -> Resolution<'_> {
        match self.find(input.command_name.as_deref()) {
            Some(entry) => Resolution::Found(entry),
            None => Resolution::NotFound,
        }
    }

    /// Name of the closest registered ancestor of `name`.
    ///
    /// Returns `None` when the parent is the root (the default command).
    /// `name` does not need to be registered itself.
    pub fn parent_name<'a>(&'a self, name: &str) -> Option<&'a str> {
        self.descriptors()
            .filter_map(|d| d.name.as_deref())
            .filter(|candidate| is_word_prefix(candidate, name))
            .max_by_key(|candidate| candidate.len())
    }

    /// Parent descriptor of `name`: the longest registered word prefix, or
    /// the default command if there is none.
    pub fn find_parent(&self, name: &str) -> Option<&CommandDescriptor> {
        match self.parent_name(name) {
            Some(parent) => self.find(Some(parent)).map(CommandEntry::descriptor),
            None => self.default_command(),
        }
    }

    /// Commands whose parent is `name` (`None` for the root).
    pub fn children_of(&self, name: Option<&str>) -> Vec<&CommandDescriptor> {
        self.descriptors()
            .filter(|d| match d.name.as_deref() {
                Some(child) => self.parent_name(child) == name,
                None => false,
            })
            .collect()
    }

    /// Commands sharing the parent `name` would have; used to suggest
    /// alternatives for an unknown command.
    pub fn siblings_of(&self, name: &str) -> Vec<&CommandDescriptor> {
        self.children_of(self.parent_name(name))
    }
}

/// Resolves `input` against `registry`; see [`CommandRegistry::resolve`].
pub fn resolve<'a>(registry: &'a CommandRegistry, input: &ParsedInput) -> Resolution<'a> {
    registry.resolve(input)
}

fn is_word_prefix(prefix: &str, name: &str) -> bool {
    name.len() > prefix.len()
        && name.starts_with(prefix)
        && name[prefix.len()..].starts_with(' ')
}

/// Built-in option spellings a command may not declare.
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_LONG: &str = "help";
pub(crate) const VERSION_LONG: &str = "version";

fn validate_command_name(name: &str) -> ArgotResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigurationError::BlankCommandName);
    }

    // Must be exactly what the tokenizer produces for the typed words.
    let words: Vec<&str> = name.split_whitespace().collect();
    let typeable = words.join(" ") == name
        && words
            .iter()
            .all(|w| !w.starts_with('-') && !(w.starts_with('[') && w.ends_with(']')));
    if !typeable {
        return Err(ConfigurationError::InvalidCommandName(name.to_string()));
    }
    Ok(())
}

fn validate_parameters(descriptor: &CommandDescriptor) -> ArgotResult<()> {
    let command = descriptor.label().to_string();
    let mut long_names: HashSet<&str> = HashSet::new();
    let mut short_names: HashSet<char> = HashSet::new();

    for parameter in &descriptor.parameters {
        if parameter.long_name.is_none() && parameter.short_name.is_none() {
            return Err(ConfigurationError::UnnamedOption { command });
        }

        if let Some(long) = parameter.long_name.as_deref() {
            if long.is_empty() || long.starts_with('-') || long.chars().any(char::is_whitespace) {
                return Err(invalid_option(&command, parameter));
            }
            if long == HELP_LONG || (descriptor.is_default() && long == VERSION_LONG) {
                return Err(reserved_option(&command, parameter));
            }
            if !long_names.insert(long) {
                return Err(ConfigurationError::DuplicateOption {
                    command,
                    option: format!("--{long}"),
                });
            }
        }

        if let Some(short) = parameter.short_name {
            if short.is_whitespace() || short == '-' {
                return Err(invalid_option(&command, parameter));
            }
            if short == HELP_SHORT {
                return Err(reserved_option(&command, parameter));
            }
            if !short_names.insert(short) {
                return Err(ConfigurationError::DuplicateOption {
                    command,
                    option: format!("-{short}"),
                });
            }
        }
    }

    Ok(())
}

fn invalid_option(command: &str, parameter: &ParameterDescriptor) -> ConfigurationError {
    ConfigurationError::InvalidOptionName {
        command: command.to_string(),
        option: parameter.display_name(),
    }
}

fn reserved_option(command: &str, parameter: &ParameterDescriptor) -> ConfigurationError {
    ConfigurationError::ReservedOption {
        command: command.to_string(),
        option: parameter.display_name(),
    }
}
