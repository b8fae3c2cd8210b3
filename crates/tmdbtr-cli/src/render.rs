//! Output of translation collections as log tables or JSON.

use std::io::Write;

use anyhow::{Context, Result};
use tmdbtr_api::tmdb::{Identifiable, TranslationsCollection, encode_pretty};

/// Maximum overview length shown in table output.
const OVERVIEW_MAX_CHARS: usize = 72;

/// Output format of a translation collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Re-encoded JSON document.
    Json,
}

/// Chooses the language filter: CLI flags win over the config default.
pub fn resolve_languages<'a>(cli: &'a [String], config: &'a [String]) -> &'a [String] {
    if cli.is_empty() { config } else { cli }
}

/// Shortens `text` to at most `max_chars` characters, appending `…`.
fn summarize(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() <= max_chars {
        return String::from(first_line);
    }
    let mut short: String = first_line
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect();
    short.push('…');
    short
}

/// Writes `collection` as a pretty JSON document followed by a newline.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
fn write_json<Item: Identifiable, W: Write>(
    collection: &TranslationsCollection<Item>,
    writer: &mut W,
) -> Result<()> {
    let text = encode_pretty(collection).context("failed to encode translations")?;
    writeln!(writer, "{text}").context("failed to write JSON output")?;
    writer.flush().context("failed to flush JSON output")
}

/// Outputs `collection`, keeping only `languages` (all when empty).
///
/// The table goes through tracing. JSON is written to stdout as-is so it
/// can be piped.
///
/// # Errors
///
/// Returns an error if JSON encoding or writing fails.
pub fn render<Item: Identifiable>(
    collection: &TranslationsCollection<Item>,
    languages: &[String],
    format: OutputFormat,
) -> Result<()> {
    let filtered = collection.filter_languages(languages);

    if format == OutputFormat::Json {
        return write_json(&filtered, &mut std::io::stdout().lock());
    }

    tracing::info!("ID: {}", filtered.id());
    tracing::info!("Locale\tLanguage\tName\t\t\tOverview");
    for t in &filtered {
        tracing::info!(
            "{}\t{}\t\t{}\t\t{}",
            t.locale(),
            t.english_name,
            t.data.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("-"),
            t.data
                .overview
                .as_deref()
                .filter(|o| !o.is_empty())
                .map_or_else(|| String::from("-"), |o| summarize(o, OVERVIEW_MAX_CHARS)),
        );
    }
    if filtered.len() < collection.len() {
        tracing::info!(
            "Total: {} of {} translations ({})",
            filtered.len(),
            collection.len(),
            languages.join(","),
        );
    } else {
        tracing::info!("Total: {} translations", filtered.len());
    }

    Ok(())
}
