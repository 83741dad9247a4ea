//! Encoding helpers shared by the escaping and unescaping elements.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Result, StylemarkError};

/// Hex digits per UTF-16 code unit in an encoded payload.
pub const UNIT_WIDTH: usize = 4;

static ESCAPE_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([0-9a-f]{4})").expect("escape sequence pattern is valid"));

/// Encode text as its UTF-16 code units, four lowercase hex digits each.
///
/// The output contains only `[0-9a-f]`, which no markup pattern matches.
pub fn encode_hex(text: &str) -> String {
    text.encode_utf16()
        .map(|unit| format!("{unit:04x}"))
        .collect()
}

/// Reverse [`encode_hex`].
pub fn decode_hex(encoded: &str) -> Result<String> {
    if encoded.len() % UNIT_WIDTH != 0 || !encoded.is_ascii() {
        return Err(StylemarkError::InvalidEncoding(encoded.to_string()));
    }
    let units = (0..encoded.len())
        .step_by(UNIT_WIDTH)
        .map(|start| u16::from_str_radix(&encoded[start..start + UNIT_WIDTH], 16))
        .collect::<std::result::Result<Vec<u16>, _>>()
        .map_err(|_| StylemarkError::InvalidEncoding(encoded.to_string()))?;
    String::from_utf16(&units).map_err(|_| StylemarkError::InvalidEncoding(encoded.to_string()))
}

/// Encoded form of a backslash-escaped character: `\` plus its code unit.
pub fn escape_char(c: char) -> String {
    let mut buffer = [0u16; 2];
    let units = c.encode_utf16(&mut buffer);
    let mut escaped = String::with_capacity(1 + UNIT_WIDTH * units.len());
    for unit in units.iter() {
        escaped.push('\\');
        escaped.push_str(&format!("{unit:04x}"));
    }
    escaped
}

/// Decode one `\hhhh` escape sequence payload.
pub fn unescape_unit(payload: &str) -> Result<String> {
    decode_hex(payload)
}

/// Restore every `\hhhh` sequence in `text`.
///
/// Used on captured link targets and image sources, which are read before
/// the unescaping pass runs.
pub fn decode_escapes(text: &str) -> String {
    ESCAPE_SEQUENCE
        .replace_all(text, |captures: &regex::Captures<'_>| {
            unescape_unit(&captures[1]).unwrap_or_else(|_| captures[0].to_string())
        })
        .into_owned()
}
