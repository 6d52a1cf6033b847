//! Shared constants and writer helpers for report generation.

use std::io::Write;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{ReportError, Result};

/// Language attribute of the `ichicsr` root.
pub const ICHICSR_LANG: &str = "en";

/// Fixed `messagetype` value.
pub const MESSAGE_TYPE: &str = "ichicsr";

/// Fixed `messageformatversion` value.
pub const MESSAGE_FORMAT_VERSION: &str = "2.1";

/// Fixed `messageformatrelease` value.
pub const MESSAGE_FORMAT_RELEASE: &str = "2.0";

/// Occurrence country used when neither the options nor the record name one.
pub const DEFAULT_OCCURRENCE_COUNTRY: &str = "US";

/// Write `<name>text</name>`, or `<name/>` when the text is blank.
pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// [`write_text_element`] for optional values.
pub fn write_optional_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: Option<&str>,
) -> Result<()> {
    write_text_element(writer, name, value.unwrap_or_default())
}

/// Formats a floating-point number without trailing zeros (`70.0` -> `70`).
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Drop whitespace-only lines and end the document with a single newline.
pub fn strip_blank_lines(document: &str) -> String {
    let mut out = document
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
