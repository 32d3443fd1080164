//! Folio CLI - Turn analyzed documents into flat records.

use anyhow::Context;
use clap::Parser;
use folio_cli::commands;
use folio_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let db = config.database_path(cli.db.as_deref())?;

    match cli.command {
        Command::Ingest(args) => commands::execute_ingest(args, &config, &db, &formatter).await?,
        Command::Convert(args) => commands::execute_convert(args, &config, &db, &formatter)
            .context("Conversion failed")?,
        Command::Show(args) => commands::execute_show(args, &db, &formatter)
            .with_context(|| format!("Failed to read {}", db.display()))?,
    }

    Ok(())
}
