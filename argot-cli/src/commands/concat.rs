use argot_core::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ConcatCommand {
    inputs: Vec<String>,
    separator: String,
}

impl CommandDefinition for ConcatCommand {
    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::named("concat")
            .description("Concatenates strings.")
            .parameter(
                ParameterDescriptor::sequence(ScalarKind::Text)
                    .short('i')
                    .long("inputs")
                    .required()
                    .description("Input strings."),
            )
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::Text)
                    .short('s')
                    .long("separator")
                    .default_value("")
                    .description("String separator."),
            )
    }

    fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError> {
        Ok(Self {
            inputs: bound.get("inputs")?,
            separator: bound.get("separator")?,
        })
    }
}

#[async_trait]
impl Command for ConcatCommand {
    async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
        writeln!(console.output(), "{}", self.inputs.join(&self.separator))?;
        Ok(())
    }
}
