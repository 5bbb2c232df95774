use std::io::Read;

use log::warn;

use crate::errors::{DecodeError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads an uploaded file as UTF-8 text.
///
/// A leading BOM is dropped and invalid sequences are replaced with U+FFFD rather
/// than rejected. Only a failing byte source is an error.
pub fn read_as_text<R: Read>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| DecodeError::Read(e.to_string()))?;
    Ok(decode_utf8_lossy(&bytes))
}

/// Decodes bytes as UTF-8, stripping a BOM and replacing invalid sequences.
pub fn decode_utf8_lossy(bytes: &[u8]) -> String {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(content) {
        Ok(s) => s.to_string(),
        Err(e) => {
            warn!(
                "Invalid UTF-8 at byte {}; replacing undecodable sequences",
                e.valid_up_to()
            );
            String::from_utf8_lossy(content).into_owned()
        }
    }
}
