// logweave - main.rs
// CLI entry point: code tooling plus the instrumented demo exchange

use anyhow::Result;
use clap::Parser;

use logweave::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args = Cli::parse();
    match args.command {
        Commands::Describe { code } => cli::run_describe(&code),
        Commands::Validate { code } => {
            if !cli::run_validate(&code) {
                std::process::exit(1);
            }
        }
        Commands::Catalog { segment } => cli::run_catalog(segment.as_deref())?,
        Commands::Schema { output } => {
            cli::dump_schema(&output)?;
            println!("Schema written to {output}");
        }
        Commands::Demo => cli::run_demo().await?,
    }
    Ok(())
}
