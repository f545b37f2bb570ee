pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ConverterSession, Language, RateProvider};
use anyhow::Result;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Currencies,
    Session,
}

/// Runs a command against the configured rate provider.
///
/// `language` overrides the language from the config file.
pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    language: Option<Language>,
) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let language = language.unwrap_or(config.language);
    let provider: Arc<dyn RateProvider> = Arc::new(providers::OpenErApiProvider::new(
        &config.provider.base_url,
    ));

    let mut stdout = std::io::stdout();
    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(provider, language, &amount, &from, &to, &mut stdout).await
        }
        AppCommand::Currencies => cli::currencies::run(provider, language, &mut stdout).await,
        AppCommand::Session => {
            let mut session = ConverterSession::new(language);
            session.set_amount(&config.amount);
            session.start_loading(provider);
            let stdin = BufReader::new(tokio::io::stdin());
            cli::session::run(&mut session, stdin, &mut stdout).await
        }
    }
}
