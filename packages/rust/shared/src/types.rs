//! Core domain types for a texprose run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version for the chunk manifest format.
pub const CURRENT_MANIFEST_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Which decoding succeeded for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
    Utf8,
    /// ISO-8859-1 fallback; every byte maps to the code point of equal value.
    Latin1,
}

impl SourceEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }
}

impl std::fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source file and its decoded text. Read once, dropped after extraction.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    pub encoding: SourceEncoding,
}

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// One extracted prose body and the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub path: PathBuf,
    pub body: String,
}

/// Ordered collection of extracted bodies, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, body: impl Into<String>) {
        self.entries.push(CorpusEntry {
            path: path.into(),
            body: body.into(),
        });
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// Bodies in order, without their source paths.
    pub fn bodies(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.body.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Chunks
// ---------------------------------------------------------------------------

/// Metadata for a single written chunk file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// 1-based chunk number, matching the `_<k>.txt` suffix.
    pub index: usize,
    pub filename: String,
    pub char_count: usize,
    pub size_bytes: usize,
    pub sha256: String,
}

/// The `<prefix>_manifest.json` written next to the chunks when enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkManifest {
    pub schema_version: u32,
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    pub max_chars_per_file: usize,
    pub document_count: usize,
    pub total_chars: usize,
    pub chunks: Vec<ChunkMeta>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
