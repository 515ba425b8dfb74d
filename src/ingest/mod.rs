// Document ingestion: uploaded file bytes to task text
//
// `.docx` files are zip containers; the body text lives in
// `word/document.xml` as `<w:t>` runs grouped into `<w:p>` paragraphs.
// Anything else is decoded as UTF-8, dropping invalid sequences.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Read};
use tracing::{debug, warn};

const DOCUMENT_XML: &str = "word/document.xml";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("not a valid .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive has no word/document.xml")]
    MissingDocument,

    #[error("failed to read word/document.xml: {0}")]
    Io(#[from] std::io::Error),
}

static PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>.*?</w:p>").unwrap()
});

static TEXT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>").unwrap());

/// Text of an uploaded file
pub fn extract_task_text(filename: &str, bytes: &[u8]) -> Result<String, IngestError> {
    if filename.to_ascii_lowercase().ends_with(".docx") {
        let text = extract_docx_text(bytes)?;
        debug!(filename, chars = text.len(), "Extracted .docx text");
        Ok(text)
    } else {
        Ok(String::from_utf8_lossy(bytes).replace('\u{FFFD}', ""))
    }
}

/// Paragraph text of a .docx file, one line per paragraph
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, IngestError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    match archive.by_name(DOCUMENT_XML) {
        Ok(mut entry) => {
            entry.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => return Err(IngestError::MissingDocument),
        Err(e) => return Err(e.into()),
    }
    Ok(document_xml_text(&xml))
}

fn document_xml_text(xml: &str) -> String {
    PARAGRAPH
        .find_iter(xml)
        .map(|paragraph| {
            TEXT_RUN
                .captures_iter(paragraph.as_str())
                .filter_map(|c| c.get(1))
                .map(|m| decode_entities(m.as_str()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode the five predefined XML entities and numeric character references.
/// Unknown entities are kept as written.
fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Task text for a run.
///
/// With an upload the document text comes first and the description is
/// appended after a newline and a space. An upload that cannot be read is
/// not fatal: the error message stands in for the document text.
pub fn compose_task(upload: Option<(&str, &[u8])>, description: &str) -> String {
    let Some((filename, bytes)) = upload else {
        return description.to_string();
    };

    let document = match extract_task_text(filename, bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(filename, error = %e, "Upload could not be read; continuing with degraded input");
            format!("Error reading file: {e}")
        }
    };
    format!("{document}\n {description}")
}
