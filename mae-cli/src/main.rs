use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mae_core::{ImporterConfig, StatementFile};
use mae_import::StatementImporter;

mod config;
mod output;
mod state;

use output::Format;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MAE_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "mae", version = VERSION, about = "Import bank statement PDFs through the parsing service")]
struct Cli {
    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ServiceArgs {
    /// Parsing service root, overrides config.toml
    #[arg(long, env = "MAE_API_BASE_URL")]
    base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement and print its transactions
    Import {
        /// Statement PDF
        file: PathBuf,

        /// Preferred mode, tried before the built-in fallbacks
        #[arg(long, env = "MAE_IMPORT_MODE")]
        mode: Option<String>,

        #[command(flatten)]
        service: ServiceArgs,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// List the modes the service supports
    Modes {
        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Check that the service is up
    Health {
        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Manage ~/.mae/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show {
        #[arg(long, env = "MAE_IMPORT_MODE")]
        mode: Option<String>,

        #[command(flatten)]
        service: ServiceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Import {
            file,
            mode,
            service,
            format,
        } => {
            let cfg = config::effective_config(service.base_url.as_deref(), mode.as_deref())?;
            let statement = StatementFile::from_path(&file)
                .with_context(|| format!("reading {}", file.display()))?;

            let result = importer(cfg)?.import(&statement).await?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            output::render(&result, format, &mut out)?;
            out.flush()?;
        }

        Command::Modes { service } => {
            let cfg = config::effective_config(service.base_url.as_deref(), None)?;
            for mode in importer(cfg)?.list_modes().await? {
                println!("{mode}");
            }
        }

        Command::Health { service } => {
            let cfg = config::effective_config(service.base_url.as_deref(), None)?;
            let base = cfg.base_url.clone();
            let status = importer(cfg)?.health().await?;
            println!("{base}: {status}");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show { mode, service } => {
                let cfg = config::effective_config(service.base_url.as_deref(), mode.as_deref())?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn importer(cfg: ImporterConfig) -> Result<StatementImporter> {
    tracing::debug!(base_url = %cfg.base_url, mode = ?cfg.mode, "effective config");
    StatementImporter::over_http(cfg)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "mae=debug" } else { "mae=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
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
    fn test_import_flags() {
        let cli = Cli::try_parse_from([
            "mae",
            "-v",
            "import",
            "feb.pdf",
            "--mode",
            "maybank_credit",
            "--base-url",
            "http://127.0.0.1:9000/",
            "--format",
            "csv",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Import {
                file,
                mode,
                service,
                format,
            } => {
                assert_eq!(file, PathBuf::from("feb.pdf"));
                assert_eq!(mode.as_deref(), Some("maybank_credit"));
                assert_eq!(service.base_url.as_deref(), Some("http://127.0.0.1:9000/"));
                assert_eq!(format, Format::Csv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_import_requires_file() {
        assert!(Cli::try_parse_from(["mae", "import"]).is_err());
    }
}
