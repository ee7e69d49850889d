//! Source file decoding: UTF-8 first, Latin-1 when that fails.

use std::path::Path;

use tracing::debug;

use texprose_shared::{Document, Result, SourceEncoding, TexProseError};

/// Read and decode one source file.
pub fn read_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).map_err(|e| TexProseError::io(path, e))?;
    let (text, encoding) = decode(bytes);

    if encoding == SourceEncoding::Latin1 {
        debug!(path = %path.display(), "not valid UTF-8, decoded as latin-1");
    }

    Ok(Document {
        path: path.to_path_buf(),
        text,
        encoding,
    })
}

/// Decode bytes as UTF-8, falling back to Latin-1, and normalize line endings.
pub fn decode(bytes: Vec<u8>) -> (String, SourceEncoding) {
    let (text, encoding) = match String::from_utf8(bytes) {
        Ok(text) => (text, SourceEncoding::Utf8),
        Err(e) => (latin1(e.as_bytes()), SourceEncoding::Latin1),
    };
    (normalize_newlines(text), encoding)
}

/// ISO-8859-1 maps every byte to the code point with the same value.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Turn `\r\n` and lone `\r` into `\n`.
fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
