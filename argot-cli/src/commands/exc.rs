use argot_core::prelude::*;

/// Fails with the given message and exit code.
///
/// Handy for checking how a calling script sees failures.
#[derive(Debug, Clone, PartialEq)]
pub struct FailCommand {
    message: Option<String>,
    exit_code: i32,
}

impl CommandDefinition for FailCommand {
    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::named("exc")
            .description("Fails with a custom message and exit code.")
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::Text)
                    .short('m')
                    .long("msg")
                    .description("Error message."),
            )
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::Integer)
                    .short('c')
                    .long("code")
                    .default_value(1_i64)
                    .description("Exit code."),
            )
    }

    fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError> {
        Ok(Self {
            message: bound.get("msg")?,
            exit_code: bound.get("code")?,
        })
    }
}

#[async_trait]
impl Command for FailCommand {
    async fn execute(&self, _console: &mut dyn Console) -> anyhow::Result<()> {
        Err(CommandError::from_parts(self.message.clone(), self.exit_code).into())
    }
}
