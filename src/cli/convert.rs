use super::ui;
use crate::core::{ConverterSession, Language, RateProvider};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads rates, converts once and writes the result line, if there is one.
pub async fn run<W: Write>(
    provider: Arc<dyn RateProvider>,
    language: Language,
    amount: &str,
    from: &str,
    to: &str,
    out: &mut W,
) -> Result<()> {
    let mut session = ConverterSession::new(language);
    session.start_loading(provider);

    let pb = ui::new_spinner(language.strings().loading);
    session.wait_loaded().await;
    pb.finish_and_clear();

    session.set_amount(amount);
    let from_offered = session.select_from(from);
    let to_offered = session.select_to(to);
    if !(from_offered && to_offered) {
        debug!(%from, %to, "Currency not offered");
    }

    match session.convert() {
        Ok(conversion) => {
            writeln!(
                out,
                "{}",
                ui::style_text(&conversion.to_string(), ui::StyleType::Result)
            )?;
        }
        Err(skipped) => info!(reason = %skipped, "Nothing to show"),
    }
    Ok(())
}
