use super::ui;
use crate::core::{ConverterSession, Language};
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "commands: amount <x> | from <code> | to <code> | convert | lang <ru|kz> | show | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Amount(String),
    From(String),
    To(String),
    Convert,
    Lang(Language),
    Show,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };
        match (word.to_lowercase().as_str(), arg) {
            // An empty amount is allowed; it just won't convert
            ("amount", arg) => Ok(SessionCommand::Amount(arg.to_string())),
            ("from", code) if !code.is_empty() => Ok(SessionCommand::From(code.to_string())),
            ("to", code) if !code.is_empty() => Ok(SessionCommand::To(code.to_string())),
            ("convert", "") => Ok(SessionCommand::Convert),
            ("lang", code) => Ok(SessionCommand::Lang(code.parse()?)),
            ("show", "") | ("", "") => Ok(SessionCommand::Show),
            ("help", "") => Ok(SessionCommand::Help),
            ("quit", "") | ("exit", "") => Ok(SessionCommand::Quit),
            _ => Err(anyhow!("Unknown command: {}", line)),
        }
    }
}

/// Runs the converter view over a line-based input until `quit` or end of input.
///
/// The caller is expected to have started the rate load; its outcome is picked up
/// between commands.
pub async fn run<R, W>(session: &mut ConverterSession, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    session.poll_load();
    writeln!(out, "{}\n{}", ui::render_session(session), HELP)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        session.poll_load();

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Subtle))?;
                continue;
            }
        };
        debug!(?command, "Session command");

        match command {
            SessionCommand::Amount(amount) => session.set_amount(&amount),
            SessionCommand::From(code) => {
                session.select_from(&code);
            }
            SessionCommand::To(code) => {
                session.select_to(&code);
            }
            SessionCommand::Convert => {
                // Skipped conversions only clear the result line
                if let Err(skipped) = session.convert() {
                    debug!(reason = %skipped, "Nothing to show");
                }
            }
            SessionCommand::Lang(language) => session.set_language(language),
            SessionCommand::Show => {}
            SessionCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            SessionCommand::Quit => break,
        }
        writeln!(out, "{}", ui::render_session(session))?;
    }
    Ok(())
}
