use super::ui;
use crate::core::{ConverterSession, Language, RateProvider};
use anyhow::Result;
use comfy_table::Cell;
use std::io::Write;
use std::sync::Arc;

/// Lists the selectable currencies with their USD rate and the update window.
pub async fn run<W: Write>(
    provider: Arc<dyn RateProvider>,
    language: Language,
    out: &mut W,
) -> Result<()> {
    let strings = language.strings();
    let mut session = ConverterSession::new(language);
    session.start_loading(provider);

    let pb = ui::new_spinner(strings.loading);
    session.wait_loaded().await;
    pb.finish_and_clear();

    if !session.is_loaded() {
        writeln!(
            out,
            "{}",
            ui::style_text(strings.loading, ui::StyleType::Subtle)
        )?;
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell(strings.code), ui::header_cell(strings.rate)]);
    for code in session.currency_options() {
        if let Some(rate) = session.rates().get(code) {
            table.add_row(vec![Cell::new(code), ui::rate_cell(rate)]);
        }
    }

    writeln!(out, "{}", ui::style_text(strings.title, ui::StyleType::Title))?;
    writeln!(out, "{table}")?;
    if let Some(window) = session.update_window() {
        for line in ui::update_window_lines(window, language) {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
