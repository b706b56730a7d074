//! Command implementations for the CLI.
//!
//! Each submodule contains one command (or one command group).

use argot_core::CommandEntry;

/// Default command: joins its inputs.
pub mod echo;

/// `concat`: joins inputs with a separator.
pub mod concat;

/// `div`: divides two numbers.
pub mod div;

/// `exc`: fails on purpose with a chosen message and exit code.
pub mod exc;

/// `math` group and its subcommands.
pub mod math;

pub use concat::ConcatCommand;
pub use div::DivideCommand;
pub use echo::EchoCommand;
pub use exc::FailCommand;

/// Every command the `argot` binary registers.
pub fn all() -> Vec<CommandEntry> {
    let mut entries = vec![
        CommandEntry::of::<EchoCommand>(),
        CommandEntry::of::<ConcatCommand>(),
        CommandEntry::of::<DivideCommand>(),
        CommandEntry::of::<FailCommand>(),
    ];
    entries.extend(math::entries());
    entries
}
