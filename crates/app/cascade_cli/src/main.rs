// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use cascade_core::models::ContextKey;
use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod commands;
mod logging;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // Dropping the handle shuts the logger down.
    let _logger = logging::init()?;

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!(
                "{} {} (core {})",
                env!("CARGO_BIN_NAME"),
                env!("CARGO_PKG_VERSION"),
                cascade_core::version()
            );
        }
        Commands::Show { tier } => block_on(commands::show(args.fixture.as_deref(), *tier))?,
        Commands::Check => block_on(commands::check(args.fixture.as_deref()))?,
        Commands::Mappings { object, system } => block_on(commands::mappings(
            args.fixture.as_deref(),
            ContextKey::new(object, system),
        ))?,
    }

    Ok(())
}

/// Run one editor-backed command on a single-threaded runtime.
fn block_on(command: impl Future<Output = Result<()>>) -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(command)
}
