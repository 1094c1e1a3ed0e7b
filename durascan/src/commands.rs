//! Subcommands layered on top of the analyzer (fix application, config init).

mod fix;
mod init;

pub use fix::{run_fix, FixOptions, FixOutcome};
pub use init::{run_init, run_init_in};
