pub mod context;
pub mod handlers;
pub mod help;
pub mod parser;

// Re-exports for the later usage in the console driver
pub use crate::commands::context::CommandContext;
pub use crate::commands::handlers::{CommandHandler, CommandOutput};
pub use crate::commands::help::{get_commands_list, CommandInfo};
pub use crate::commands::parser::{parse_command, Command};
