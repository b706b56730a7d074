// ============================================================================
// argot-core/src/help.rs
// ============================================================================
//
// HELP TEXT: Rendering of command help to a Console
//
// KEY COMPONENTS:
// - HelpSource: everything the renderer reads (metadata, registry, target)
// - render_help: writes the sections in order
// - HelpWriter: tracks the cursor column so descriptions line up
//
// Sections, each separated by a blank line:
//   application info (default command only), Description, Usage,
//   Options, Commands (only when the target has children) and a tip line.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::config::ApplicationMetadata;
use crate::console::{Console, ConsoleColor, with_colors, with_foreground};
use crate::registry::{CommandRegistry, HELP_LONG, HELP_SHORT, VERSION_LONG};
use crate::schema::{CommandDescriptor, ParameterDescriptor};

/// Column at which option and command descriptions start.
const DESCRIPTION_COLUMN: usize = 20;

/// Minimum gap between a name and its description.
const DESCRIPTION_MARGIN: usize = 2;

/// Inputs to [`render_help`].
#[derive(Debug, Clone, Copy)]
pub struct HelpSource<'a> {
    pub metadata: &'a ApplicationMetadata,
    pub registry: &'a CommandRegistry,
    pub target: &'a CommandDescriptor,
}

/// The `-h|--help` option every command accepts.
pub fn help_option() -> ParameterDescriptor {
    ParameterDescriptor::flag()
        .short(HELP_SHORT)
        .long(HELP_LONG)
        .description("Shows help text.")
}

/// The `--version` option the default command accepts.
pub fn version_option() -> ParameterDescriptor {
    ParameterDescriptor::flag()
        .long(VERSION_LONG)
        .description("Shows version information.")
}

/// Renders help for `source.target` to the console's output stream.
pub fn render_help(console: &mut dyn Console, source: &HelpSource<'_>) -> io::Result<()> {
    console.reset_color();

    let children = source.registry.children_of(source.target.name.as_deref());
    let mut writer = HelpWriter::new(console);

    render_application_info(&mut writer, source)?;
    render_description(&mut writer, source)?;
    render_usage(&mut writer, source, !children.is_empty())?;
    render_options(&mut writer, source)?;
    render_child_commands(&mut writer, source, &children)?;

    writer.console.output().flush()
}

fn render_application_info(writer: &mut HelpWriter<'_>, source: &HelpSource<'_>) -> io::Result<()> {
    if !source.target.is_default() {
        return Ok(());
    }

    writer.colored(&source.metadata.title, ConsoleColor::Yellow)?;
    writer.text(" ")?;
    writer.colored(&source.metadata.version_text, ConsoleColor::Yellow)?;
    writer.new_line()?;

    if let Some(description) = non_blank(source.metadata.description.as_deref()) {
        writer.text(description)?;
        writer.new_line()?;
    }
    Ok(())
}

fn render_description(writer: &mut HelpWriter<'_>, source: &HelpSource<'_>) -> io::Result<()> {
    let Some(description) = non_blank(source.target.description.as_deref()) else {
        return Ok(());
    };

    writer.margin()?;
    writer.header("Description")?;
    writer.indent(2)?;
    writer.text(description)?;
    writer.new_line()
}

fn render_usage(
    writer: &mut HelpWriter<'_>,
    source: &HelpSource<'_>,
    has_children: bool,
) -> io::Result<()> {
    writer.margin()?;
    writer.header("Usage")?;

    writer.indent(2)?;
    writer.text(&source.metadata.executable_name)?;
    if let Some(name) = source.target.name.as_deref() {
        writer.text(" ")?;
        writer.colored(name, ConsoleColor::Cyan)?;
    }
    if has_children {
        writer.text(" ")?;
        writer.colored("[command]", ConsoleColor::Cyan)?;
    }
    writer.text(" ")?;
    writer.colored("[options]", ConsoleColor::White)?;
    writer.new_line()
}

fn render_options(writer: &mut HelpWriter<'_>, source: &HelpSource<'_>) -> io::Result<()> {
    writer.margin()?;
    writer.header("Options")?;

    // Stable sort keeps declaration order within each group.
    let mut declared: Vec<&ParameterDescriptor> = source.target.parameters.iter().collect();
    declared.sort_by_key(|parameter| !parameter.required);

    let mut built_in = vec![help_option()];
    if source.target.is_default() {
        built_in.push(version_option());
    }

    for parameter in declared.into_iter().chain(built_in.iter()) {
        if parameter.required {
            writer.colored("* ", ConsoleColor::Red)?;
        } else {
            writer.indent(2)?;
        }

        if let Some(short) = parameter.short_name {
            writer.colored(&format!("-{short}"), ConsoleColor::White)?;
        }
        if parameter.short_name.is_some() && parameter.long_name.is_some() {
            writer.text("|")?;
        }
        if let Some(long) = parameter.long_name.as_deref() {
            writer.colored(&format!("--{long}"), ConsoleColor::White)?;
        }

        if let Some(description) = non_blank(parameter.description.as_deref()) {
            writer.column_indent()?;
            writer.text(description)?;
        }
        writer.new_line()?;
    }
    Ok(())
}

fn render_child_commands(
    writer: &mut HelpWriter<'_>,
    source: &HelpSource<'_>,
    children: &[&CommandDescriptor],
) -> io::Result<()> {
    if children.is_empty() {
        return Ok(());
    }

    writer.margin()?;
    writer.header("Commands")?;

    for child in children {
        writer.indent(2)?;
        writer.colored(relative_name(child, source.target), ConsoleColor::Cyan)?;

        if let Some(description) = non_blank(child.description.as_deref()) {
            writer.column_indent()?;
            writer.text(description)?;
        }
        writer.new_line()?;
    }

    writer.margin()?;
    writer.text("You can run `")?;
    writer.text(&source.metadata.executable_name)?;
    if let Some(name) = source.target.name.as_deref() {
        writer.text(" ")?;
        writer.colored(name, ConsoleColor::Cyan)?;
    }
    writer.text(" ")?;
    writer.colored("[command]", ConsoleColor::Cyan)?;
    writer.text(" ")?;
    writer.colored("--help", ConsoleColor::White)?;
    writer.text("` to show help on a specific command.")?;
    writer.new_line()
}

/// Child name with the parent's name and separating space removed.
fn relative_name<'a>(child: &'a CommandDescriptor, parent: &CommandDescriptor) -> &'a str {
    let name = child.name.as_deref().unwrap_or_default();
    match parent.name.as_deref() {
        Some(parent_name) => name
            .strip_prefix(parent_name)
            .map(str::trim_start)
            .unwrap_or(name),
        None => name,
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

// ============================================================================
// CURSOR TRACKING
// ============================================================================

struct HelpWriter<'c> {
    console: &'c mut dyn Console,
    column: usize,
    row: usize,
}

impl<'c> HelpWriter<'c> {
    fn new(console: &'c mut dyn Console) -> Self {
        Self {
            console,
            column: 0,
            row: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.column == 0 && self.row == 0
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        write!(self.console.output(), "{text}")?;
        self.column += text.width();
        Ok(())
    }

    fn colored(&mut self, text: &str, color: ConsoleColor) -> io::Result<()> {
        with_foreground(&mut *self.console, color, |console| {
            write!(console.output(), "{text}")
        })?;
        self.column += text.width();
        Ok(())
    }

    fn header(&mut self, text: &str) -> io::Result<()> {
        with_colors(
            &mut *self.console,
            ConsoleColor::Black,
            ConsoleColor::DarkGray,
            |console| write!(console.output(), "{text}"),
        )?;
        self.column += text.width();
        self.new_line()
    }

    fn new_line(&mut self) -> io::Result<()> {
        writeln!(self.console.output())?;
        self.column = 0;
        self.row += 1;
        Ok(())
    }

    /// Blank line between sections; nothing before the first one.
    fn margin(&mut self) -> io::Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        self.new_line()
    }

    fn indent(&mut self, spaces: usize) -> io::Result<()> {
        self.text(&" ".repeat(spaces))
    }

    /// Moves to the description column, wrapping when the name is too wide.
    fn column_indent(&mut self) -> io::Result<()> {
        if self.column + DESCRIPTION_MARGIN >= DESCRIPTION_COLUMN {
            self.new_line()?;
            self.indent(DESCRIPTION_COLUMN)
        } else {
            self.indent(DESCRIPTION_COLUMN - self.column)
        }
    }
}
