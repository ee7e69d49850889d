//! Character-bounded splitting of the joined corpus.

use std::path::{Path, PathBuf};

use texprose_shared::{Result, TexProseError};

/// Split `text` into consecutive slices of at most `max_chars` characters.
///
/// Counts Unicode scalar values, never splitting inside a character. Every
/// slice except the last holds exactly `max_chars` characters, and the
/// slices concatenate back to `text`. Empty input yields no slices.
pub fn split_chars(text: &str, max_chars: usize) -> Vec<&str> {
    debug_assert!(max_chars > 0);

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

/// File naming for one output prefix.
///
/// `output/my_papers` names chunks `output/my_papers_<k>.txt` and the
/// manifest `output/my_papers_manifest.json`.
#[derive(Debug, Clone)]
pub struct ChunkPaths {
    dir: PathBuf,
    stem: String,
}

impl ChunkPaths {
    pub fn new(prefix: &Path) -> Result<Self> {
        let stem = prefix
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| {
                TexProseError::validation(format!(
                    "output prefix '{}' does not end in a file name",
                    prefix.display()
                ))
            })?;

        let dir = match prefix.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self { dir, stem })
    }

    /// Directory that holds the chunk files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn chunk_file_name(&self, index: usize) -> String {
        format!("{}_{index}.txt", self.stem)
    }

    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.dir.join(self.chunk_file_name(index))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(format!("{}_manifest.json", self.stem))
    }
}
