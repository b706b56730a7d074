// ============================================================================
// argot-cli/src/commands/math.rs
// ============================================================================
//
// MATH GROUP: A parent command with subcommands
//
// `math` itself only points at its children; `math add` and `math elapsed`
// do the work. The group is registered with a closure factory to show that
// style next to the CommandDefinition types.

use std::time::Duration;

use anyhow::Context;
use argot_core::prelude::*;
use chrono::NaiveDateTime;

/// Entries for the whole group.
pub fn entries() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandDescriptor::named("math").description("Arithmetic helpers."),
            |_| Ok(Box::new(MathGroup) as Box<dyn Command>),
        ),
        CommandEntry::of::<AddCommand>(),
        CommandEntry::of::<ElapsedCommand>(),
    ]
}

struct MathGroup;

#[async_trait]
impl Command for MathGroup {
    async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
        writeln!(
            console.output(),
            "Available: add, elapsed. Use `math [command] --help` for details."
        )?;
        Ok(())
    }
}

// ============================================================================
// math add
// ============================================================================

/// Sums integers.
#[derive(Debug, Clone, PartialEq)]
pub struct AddCommand {
    values: Vec<i64>,
    hex: bool,
}

impl CommandDefinition for AddCommand {
    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::named("math add")
            .description("Adds integers.")
            .parameter(
                ParameterDescriptor::sequence(ScalarKind::Integer)
                    .short('v')
                    .long("values")
                    .required()
                    .description("Numbers to add."),
            )
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::symbols(["dec", "hex"]))
                    .short('f')
                    .long("format")
                    .default_value(Value::Enum("dec".to_string()))
                    .description("Output format."),
            )
    }

    fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError> {
        let format: String = bound.get("format")?;
        Ok(Self {
            values: bound.get("values")?,
            hex: format == "hex",
        })
    }
}

#[async_trait]
impl Command for AddCommand {
    async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
        let sum = self
            .values
            .iter()
            .try_fold(0_i64, |acc, value| acc.checked_add(*value))
            .context("Sum does not fit in a 64-bit integer")?;

        if self.hex {
            writeln!(console.output(), "{sum:#x}")?;
        } else {
            writeln!(console.output(), "{sum}")?;
        }
        Ok(())
    }
}

// ============================================================================
// math elapsed
// ============================================================================

/// Adds a duration to a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ElapsedCommand {
    start: NaiveDateTime,
    duration: Duration,
}

impl CommandDefinition for ElapsedCommand {
    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::named("math elapsed")
            .description("Prints the time a duration after a start time.")
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::DateTime)
                    .short('s')
                    .long("start")
                    .required()
                    .description("Start time, e.g. 2024-01-31T08:00:00."),
            )
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::Duration)
                    .short('d')
                    .long("duration")
                    .required()
                    .description("Duration as [d.]hh:mm:ss."),
            )
    }

    fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError> {
        Ok(Self {
            start: bound.get("start")?,
            duration: bound.get("duration")?,
        })
    }
}

#[async_trait]
impl Command for ElapsedCommand {
    async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
        let delta = chrono::Duration::from_std(self.duration).context("Duration is too large")?;
        let end = self
            .start
            .checked_add_signed(delta)
            .context("Resulting time is out of range")?;

        writeln!(console.output(), "{}", end.format("%Y-%m-%d %H:%M:%S"))?;
        Ok(())
    }
}
