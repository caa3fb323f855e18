mod actions;
mod cli;
mod commands;
mod config;
mod error;
mod mcp;
mod page_range;
mod pdf;
mod reveal;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::{ErrorKind, PdfError};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    config.init_logging();

    if let Err(err) = run(cli.command, &config).await {
        tracing::debug!(error = ?err, "command failed");
        match err.downcast_ref::<PdfError>() {
            Some(pdf_err) => {
                eprintln!("Error: {}", pdf_err.user_message());
                if pdf_err.kind() == ErrorKind::Unknown {
                    eprintln!("  caused by: {}", pdf_err);
                }
            }
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Split {
            path,
            output_dir,
            range,
        } => {
            commands::split::run(&path, output_dir.as_deref(), range.as_deref(), config)?;
        }
        Commands::CheckRange { path, range } => {
            commands::check_range::run(&path, &range)?;
        }
        Commands::Merge {
            inputs,
            output,
            actions,
            password,
        } => {
            commands::merge::run(inputs, output.as_deref(), actions, password, config)?;
        }
        Commands::Lock {
            path,
            password,
            output,
        } => {
            commands::lock::run(&path, output.as_deref(), &password, config)?;
        }
        Commands::Unlock {
            path,
            password,
            output,
        } => {
            commands::unlock::run(&path, output.as_deref(), &password, config)?;
        }
        Commands::Preview { paths } => {
            commands::preview::run(paths).await?;
        }
    }

    Ok(())
}
