//! codesage CLI entry point.

use clap::Parser;
use codesage::cli::{self, Cli, Commands, EXIT_ERROR};
use codesage::config::Config;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(EXIT_ERROR);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    };

    let outcome = match &cli.command {
        Some(Commands::Analyze(args)) => cli::run_analyze(args, &config).await,
        Some(Commands::Serve(args)) => cli::run_serve(args, &config).await,
        Some(Commands::Submit(args)) => cli::run_submit(args, &config).await,
        Some(Commands::Tools) => cli::run_tools(&config),
        None => cli::run_analyze(&cli.analyze, &config).await,
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
