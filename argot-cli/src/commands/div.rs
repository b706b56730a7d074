use argot_core::prelude::*;

/// Divides one integer by another.
///
/// The quotient is printed as a decimal, so `7 / 2` shows `3.5`. Division
/// by zero is reported as a command failure rather than printing `inf`.
#[derive(Debug, Clone, PartialEq)]
pub struct DivideCommand {
    dividend: f64,
    divisor: f64,
}

impl CommandDefinition for DivideCommand {
    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::named("div")
            .description("Divides one number by another.")
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::Integer)
                    .short('D')
                    .long("dividend")
                    .required()
                    .description("The number to divide."),
            )
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::Integer)
                    .short('d')
                    .long("divisor")
                    .required()
                    .description("The number to divide by."),
            )
    }

    fn from_bound(bound: &BoundCommand<'_>) -> Result<Self, BindError> {
        Ok(Self {
            dividend: bound.get("dividend")?,
            divisor: bound.get("divisor")?,
        })
    }
}

#[async_trait]
impl Command for DivideCommand {
    async fn execute(&self, console: &mut dyn Console) -> anyhow::Result<()> {
        if self.divisor == 0.0 {
            let message = "Division by zero is not supported.".to_string();
            return Err(CommandError::from_parts(Some(message), 2).into());
        }

        writeln!(console.output(), "{}", self.dividend / self.divisor)?;
        Ok(())
    }
}
