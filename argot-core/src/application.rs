// ============================================================================
// argot-core/src/application.rs
// ============================================================================
//
// APPLICATION: Runs one invocation from raw arguments to an exit code
//
// Each run walks the stages below in order, possibly stopping early:
//
//   Start -> Tokenized -> DirectiveCheck -> Resolved -> BoundOrHelp
//         -> Executed -> Reported
//
// Any stage may end in Failed. Every failure is written to the error
// stream and mapped to a non-zero exit code; nothing escapes `run`.
//
// KEY COMPONENTS:
// - CliApplication: immutable metadata, registry and converter
// - Stage / Progress: stage tracking with debug logging

use std::io::{self, Write};

use log::{debug, info, warn};

use crate::binding::bind;
use crate::command::CommandEntry;
use crate::config::ApplicationMetadata;
use crate::console::{Console, ConsoleColor, SystemConsole, with_foreground};
use crate::conversion::ValueConverter;
use crate::error::{CommandError, GENERIC_FAILURE_EXIT_CODE, ValidationError};
use crate::help::{HelpSource, render_help};
use crate::input::{OptionKey, ParsedInput, tokenize};
use crate::registry::{CommandRegistry, HELP_LONG, HELP_SHORT, Resolution, VERSION_LONG};
use crate::schema::CommandDescriptor;

/// Directive that prints the parsed input instead of running anything.
pub const PREVIEW_DIRECTIVE: &str = "preview";

const SUCCESS_EXIT_CODE: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Start,
    Tokenized,
    DirectiveCheck,
    Resolved,
    BoundOrHelp,
    Executed,
    Reported,
    Failed,
}

/// Stage of the current run. Only moves forward.
struct Progress {
    stage: Stage,
}

impl Progress {
    fn new() -> Self {
        Self { stage: Stage::Start }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "{:?} -> {:?}", self.stage, next);
        debug!("Stage: {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn finish(&mut self, exit_code: i32) -> i32 {
        let next = if exit_code == SUCCESS_EXIT_CODE {
            Stage::Reported
        } else {
            Stage::Failed
        };
        self.advance(next);
        info!("Finished with exit code {}", exit_code);
        exit_code
    }
}

/// A configured command-line application.
///
/// Built with [`CliApplicationBuilder`](crate::CliApplicationBuilder). The
/// application is immutable, so one instance can serve any number of runs,
/// concurrently if each run has its own console.
pub struct CliApplication {
    metadata: ApplicationMetadata,
    registry: CommandRegistry,
    converter: Box<dyn ValueConverter>,
}

impl CliApplication {
    pub(crate) fn new(
        metadata: ApplicationMetadata,
        registry: CommandRegistry,
        converter: Box<dyn ValueConverter>,
    ) -> Self {
        Self {
            metadata,
            registry,
            converter,
        }
    }

    pub fn metadata(&self) -> &ApplicationMetadata {
        &self.metadata
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Runs with the process arguments (program name skipped) against the
    /// real terminal.
    pub async fn run_with_environment(&self) -> i32 {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut console = SystemConsole::new();
        self.run(args, &mut console).await
    }

    /// Runs one invocation and returns the exit code.
    ///
    /// Never panics on bad input and never returns an error: every failure
    /// is reported on `console` and turned into a non-zero code.
    pub async fn run<I, S>(&self, args: I, console: &mut dyn Console) -> i32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let input = tokenize(args);
        self.run_input(input, console).await
    }

    /// Runs already tokenized input.
    pub async fn run_input(&self, input: ParsedInput, console: &mut dyn Console) -> i32 {
        let mut progress = Progress::new();
        progress.advance(Stage::Tokenized);
        debug!("Input: {}", input);

        if self.registry.is_empty() {
            report_error(
                console,
                "No commands are defined in this application. Register at least one command.",
            );
            return progress.finish(GENERIC_FAILURE_EXIT_CODE);
        }

        progress.advance(Stage::DirectiveCheck);
        for directive in &input.directives {
            if !directive.eq_ignore_ascii_case(PREVIEW_DIRECTIVE) {
                debug!("Ignoring unknown directive [{}]", directive);
            }
        }

        let stub = CommandDescriptor::default_command();
        let resolution = self.registry.resolve(&input);
        let (entry, descriptor) = match (&resolution, input.command_name.as_deref()) {
            (Resolution::Found(entry), _) => (Some(*entry), entry.descriptor()),
            (Resolution::NotFound, None) => (None, &stub),
            (Resolution::NotFound, Some(name)) => {
                progress.advance(Stage::Resolved);
                let code = self.handle_unknown_command(name, &input, console);
                return progress.finish(code);
            }
        };
        progress.advance(Stage::Resolved);
        debug!("Resolved command {}", descriptor.label());

        if input.has_directive(PREVIEW_DIRECTIVE) {
            emit(render_preview(console, &input, descriptor));
            return progress.finish(SUCCESS_EXIT_CODE);
        }

        progress.advance(Stage::BoundOrHelp);
        if input.has_any_option(&help_keys()) {
            self.render_help_for(console, descriptor);
            return progress.finish(SUCCESS_EXIT_CODE);
        }

        if descriptor.is_default() && input.has_option(&version_key()) {
            emit(writeln!(console.output(), "{}", self.metadata.version_text));
            return progress.finish(SUCCESS_EXIT_CODE);
        }

        // No default command registered: the root only shows help.
        let Some(entry) = entry else {
            self.render_help_for(console, descriptor);
            return progress.finish(SUCCESS_EXIT_CODE);
        };

        let code = self.execute(entry, &input, console).await;
        progress.advance(Stage::Executed);
        progress.finish(code)
    }

    async fn execute(
        &self,
        entry: &CommandEntry,
        input: &ParsedInput,
        console: &mut dyn Console,
    ) -> i32 {
        let descriptor = entry.descriptor();
        let bound = match bind(descriptor, input, self.converter.as_ref()) {
            Ok(bound) => bound,
            Err(errors) => {
                self.report_validation_errors(console, descriptor, &errors);
                return GENERIC_FAILURE_EXIT_CODE;
            }
        };

        let command = match entry.create(&bound) {
            Ok(command) => command,
            Err(error) => {
                warn!("Failed to create command {}: {}", descriptor.label(), error);
                report_error(console, &error.to_string());
                return GENERIC_FAILURE_EXIT_CODE;
            }
        };

        debug!("Executing command {}", descriptor.label());
        match command.execute(console).await {
            Ok(()) => SUCCESS_EXIT_CODE,
            Err(error) => {
                let (message, code) = describe_failure(&error);
                debug!("Command {} failed with exit code {}", descriptor.label(), code);
                report_error(console, &message);
                code
            }
        }
    }

    fn handle_unknown_command(
        &self,
        name: &str,
        input: &ParsedInput,
        console: &mut dyn Console,
    ) -> i32 {
        debug!("No command named '{}'", name);

        if input.has_any_option(&help_keys()) {
            let stub = CommandDescriptor::default_command();
            let root = self.registry.default_command().unwrap_or(&stub);
            self.render_help_for(console, root);
            return SUCCESS_EXIT_CODE;
        }

        let mut message = format!("Specified command is not defined: {name}");
        let siblings: Vec<&str> = self
            .registry
            .siblings_of(name)
            .into_iter()
            .filter_map(|d| d.name.as_deref())
            .collect();
        if !siblings.is_empty() {
            message.push_str(&format!("\nDid you mean one of: {}", siblings.join(", ")));
        }
        report_error(console, &message);
        GENERIC_FAILURE_EXIT_CODE
    }

    fn report_validation_errors(
        &self,
        console: &mut dyn Console,
        descriptor: &CommandDescriptor,
        errors: &[ValidationError],
    ) {
        let mut message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        let mut usage = self.metadata.executable_name.clone();
        if let Some(name) = descriptor.name.as_deref() {
            usage.push(' ');
            usage.push_str(name);
        }
        message.push_str(&format!("\nRun '{usage} --help' to see the available options."));
        report_error(console, &message);
    }

    fn render_help_for(&self, console: &mut dyn Console, target: &CommandDescriptor) {
        let source = HelpSource {
            metadata: &self.metadata,
            registry: &self.registry,
            target,
        };
        emit(render_help(console, &source));
    }
}

fn help_keys() -> [OptionKey; 2] {
    [OptionKey::Short(HELP_SHORT), OptionKey::Long(HELP_LONG.to_string())]
}

fn version_key() -> OptionKey {
    OptionKey::Long(VERSION_LONG.to_string())
}

/// Message and exit code for an error returned by a command.
fn describe_failure(error: &anyhow::Error) -> (String, i32) {
    match error.downcast_ref::<CommandError>() {
        Some(command_error) => (command_error.to_string(), command_error.exit_code()),
        None => (format!("{error:#}"), GENERIC_FAILURE_EXIT_CODE),
    }
}

/// Prints the target and parsed input without running anything.
fn render_preview(
    console: &mut dyn Console,
    input: &ParsedInput,
    target: &CommandDescriptor,
) -> io::Result<()> {
    with_foreground(console, ConsoleColor::Cyan, |console| {
        write!(console.output(), "{}", target.label())
    })?;

    for directive in &input.directives {
        write!(console.output(), " ")?;
        with_foreground(console, ConsoleColor::DarkGray, |console| {
            write!(console.output(), "[{directive}]")
        })?;
    }
    for option in &input.options {
        write!(console.output(), " ")?;
        with_foreground(console, ConsoleColor::White, |console| {
            write!(console.output(), "{option}")
        })?;
    }
    writeln!(console.output())
}

fn report_error(console: &mut dyn Console, message: &str) {
    emit(with_foreground(console, ConsoleColor::Red, |console| {
        writeln!(console.error(), "{message}")
    }));
}

/// Console write failures are logged, never propagated.
fn emit(result: io::Result<()>) {
    if let Err(error) = result {
        warn!("Failed to write to console: {}", error);
    }
}
