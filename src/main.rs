use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kzfx::core::Language;
use kzfx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Interface language (ru or kz), overrides the config file
    #[arg(short, long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount in the source currency
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Source currency code
        #[arg(short, long)]
        from: String,
        /// Target currency code
        #[arg(short, long)]
        to: String,
    },
    /// List available currencies and their USD rates
    Currencies,
    /// Start an interactive converter session
    Session,
}

impl From<Commands> for kzfx::AppCommand {
    fn from(cmd: Commands) -> kzfx::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => kzfx::AppCommand::Convert { amount, from, to },
            Commands::Currencies => kzfx::AppCommand::Currencies,
            Commands::Session => kzfx::AppCommand::Session,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kzfx::cli::setup::setup(),
        Some(cmd) => kzfx::run_command(cmd.into(), cli.config_path.as_deref(), cli.lang).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
