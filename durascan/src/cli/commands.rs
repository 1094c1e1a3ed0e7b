use clap::Subcommand;

use super::FunctionsArgs;

#[derive(Subcommand, Debug)]
/// Available subcommands beyond the default analysis run.
pub enum Commands {
    /// List every rule with its ID, severity, category, and docs link
    Rules {
        /// Output JSON.
        #[arg(long)]
        json: bool,
    },
    /// List discovered durable functions (orchestrators, activities, entities)
    Functions {
        /// Common options for listing functions.
        #[command(flatten)]
        args: FunctionsArgs,
    },
    /// Initialize DuraScan configuration (pyproject.toml/.durascan.toml and .gitignore)
    Init,
}
