use argot_core::prelude::*;

/// Prints its inputs joined by a separator.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoCommand {
    pub inputs: Vec<String>,
    pub separator: String,
    pub upper: bool,
}

impl CommandDefinition for EchoCommand {
    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::default_command()
            .description("Prints the given inputs.")
            .parameter(
                ParameterDescriptor::sequence(ScalarKind::Text)
                    .short('i')
                    .long("inputs")
                    .description("Values to print."),
            )
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::Text)
                    .short('s')
                    .long("separator")
                    .default_value(" ")
                    .description("Placed between inputs."),
            )
            .parameter(
                ParameterDescriptor::flag()
                    .short('u')
                    .long("upper")
                    .description("Print in upper case."),
            )
    }

    fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError> {
        Ok(Self {
            inputs: bound.get("inputs")?,
            separator: bound.get("separator")?,
            upper: bound.get("upper")?,
        })
    }
}

#[async_trait]
impl Command for EchoCommand {
    async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
        let text = self.inputs.join(&self.separator);
        if self.upper {
            writeln!(console.output(), "{}", text.to_uppercase())?;
        } else {
            writeln!(console.output(), "{text}")?;
        }
        Ok(())
    }
}
