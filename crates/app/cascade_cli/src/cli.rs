use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Inspect and check integration rule configuration.
#[derive(Parser, Debug)]
#[command(name = "cascade", about = "Cascade integration rule editor")]
pub struct Cli {
    /// Fixture seeding the in-memory backend (.yaml, .yml or .json).
    #[arg(long, global = true, env = "CASCADE_FIXTURE")]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,

    /// List stored systems and object rules as JSON.
    Show {
        /// Only list one tier.
        #[arg(long, value_enum)]
        tier: Option<ShowTier>,
    },

    /// Run every uniqueness check, including the mappings of each rule.
    Check,

    /// Resolve one object/system pair and print its mappings as JSON.
    Mappings {
        #[arg(long)]
        object: String,

        #[arg(long)]
        system: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowTier {
    Systems,
    Rules,
}
