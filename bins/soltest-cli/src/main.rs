mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use soltest_common::config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "soltest")]
#[command(
    about = "Test solutions against sample tests scraped from online judges",
    long_about = None
)]
struct Cli {
    /// Relay port (overrides PORT)
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the local relay that receives questions from the browser extension
    Judge,

    /// Compile a solution and test it against the current question
    Test {
        /// Source file to compile
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // The test report owns stdout, so the tester only logs warnings by default
    let default_filter = match cli.command {
        Commands::Judge => "info",
        Commands::Test { .. } => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    match cli.command {
        Commands::Judge => {
            commands::judge(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Test { file } => commands::test(&config, &file).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_test_subcommand() {
        let cli = Cli::try_parse_from(["soltest", "test", "a.cpp", "--port", "9000"]).unwrap();

        assert_eq!(cli.port, Some(9000));
        assert!(matches!(
            cli.command,
            Commands::Test { ref file } if file == &PathBuf::from("a.cpp")
        ));
    }

    #[test]
    fn test_parse_judge_subcommand() {
        let cli = Cli::try_parse_from(["soltest", "judge"]).unwrap();

        assert_eq!(cli.port, None);
        assert!(matches!(cli.command, Commands::Judge));
    }

    #[test]
    fn test_test_requires_file() {
        assert!(Cli::try_parse_from(["soltest", "test"]).is_err());
    }
}
