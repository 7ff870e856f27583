use anyhow::{Context, Result};
use mail_parser::{MessageParser, PartType};
use shared_types::RawMessage;
use std::path::Path;

/// Read a `.eml` file into a raw message.
///
/// The first `text/html` part becomes the body. Messages with only a text part
/// are handed over as `text/plain`, which extracts to nothing.
pub fn load_eml(path: &Path, subject_override: Option<&str>) -> Result<RawMessage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read .eml file at {:?}", path))?;
    parse_eml(&bytes, subject_override)
}

pub fn parse_eml(bytes: &[u8], subject_override: Option<&str>) -> Result<RawMessage> {
    let parsed = MessageParser::default()
        .parse(bytes)
        .ok_or_else(|| anyhow::anyhow!("Failed to parse .eml file"))?;

    let subject = subject_override
        .map(str::to_string)
        .or_else(|| parsed.subject().map(|s| s.to_string()))
        .unwrap_or_default();

    let html = parsed.parts.iter().find_map(|part| match &part.body {
        PartType::Html(html) => Some(html.to_string()),
        _ => None,
    });
    if let Some(html) = html {
        return Ok(RawMessage::html(&subject, &html));
    }

    let text = parsed.parts.iter().find_map(|part| match &part.body {
        PartType::Text(text) => Some(text.to_string()),
        _ => None,
    });
    match text {
        Some(text) => {
            tracing::warn!("Email has no HTML part, treating body as plain text");
            Ok(RawMessage::plain(&subject, &text))
        }
        None => Err(anyhow::anyhow!("Email has no body text or HTML")),
    }
}

/// Wrap a saved HTML body as a raw message
pub fn load_html(path: &Path, subject: Option<&str>) -> Result<RawMessage> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read HTML file at {:?}", path))?;
    Ok(RawMessage::html(subject.unwrap_or_default(), &body))
}
