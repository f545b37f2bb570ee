use crate::core::{ConverterSession, Language, UpdateWindow};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Result,
    Active,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Active => style(text).reverse().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn rate_cell(rate: f64) -> Cell {
    Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right)
}

/// Creates a spinner shown while rates are in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// The two language buttons, active one highlighted.
pub fn language_toggle(active: Language) -> String {
    [Language::Ru, Language::Kz]
        .iter()
        .map(|lang| {
            let label = lang.to_string().to_uppercase();
            if *lang == active {
                style_text(&format!("[{label}]"), StyleType::Active)
            } else {
                style_text(&format!(" {label} "), StyleType::Subtle)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn update_window_lines(window: &UpdateWindow, language: Language) -> Vec<String> {
    let strings = language.strings();
    vec![
        style_text(
            &format!("{}: {}", strings.last_update, window.last_update),
            StyleType::Subtle,
        ),
        style_text(
            &format!("{}: {}", strings.next_update, window.next_update),
            StyleType::Subtle,
        ),
    ]
}

fn selector_line(placeholder: &str, selected: &str) -> String {
    let value = if selected.is_empty() { "-" } else { selected };
    format!("{}: {}", style_text(placeholder, StyleType::Label), value)
}

/// Renders the whole converter view for the session's current language.
pub fn render_session(session: &ConverterSession) -> String {
    let strings = session.language().strings();
    let mut lines = vec![
        style_text(strings.title, StyleType::Title),
        format!(
            "{}: {}",
            style_text(strings.amount, StyleType::Label),
            session.amount()
        ),
        selector_line(strings.from_placeholder, session.from()),
        selector_line(strings.to_placeholder, session.to()),
    ];

    let options = if session.is_loaded() {
        session.currency_options().join(" | ")
    } else {
        // A failed load keeps the placeholder up for the rest of the session
        strings.loading.to_string()
    };
    lines.push(style_text(&options, StyleType::Subtle));

    if let Some(conversion) = session.result() {
        lines.push(style_text(&conversion.to_string(), StyleType::Result));
    }

    lines.push(language_toggle(session.language()));

    if let Some(window) = session.update_window() {
        lines.extend(update_window_lines(window, session.language()));
    }

    lines.join("\n")
}
