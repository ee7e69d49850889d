//! Corpus collection: walk a source tree, decode each file, extract its prose.

mod decode;
mod walker;

use std::path::Path;

use tracing::{debug, info, instrument};

use texprose_extract::Extractor;
use texprose_shared::{Corpus, Result, WalkConfig};

pub use decode::{decode, read_document};
pub use walker::collect_source_files;

/// Progress callback for the walk.
pub trait WalkProgress {
    /// Called once per source file, before it is read.
    fn file_read(&self, path: &Path, current: usize, total: usize);
}

/// No-op walk progress for headless/test usage.
pub struct SilentWalk;

impl WalkProgress for SilentWalk {
    fn file_read(&self, _path: &Path, _current: usize, _total: usize) {}
}

/// Read every source file under `root` and collect the non-empty bodies.
///
/// Files without a document body, or whose body is empty after cleanup,
/// contribute nothing. Any I/O error aborts the run.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn read_corpus(
    root: &Path,
    config: &WalkConfig,
    extractor: &Extractor,
    progress: &dyn WalkProgress,
) -> Result<Corpus> {
    let files = collect_source_files(root, config)?;
    let total = files.len();
    info!(total, extension = %config.extension, "found source files");

    let mut corpus = Corpus::new();
    let mut skipped = 0usize;

    for (i, path) in files.into_iter().enumerate() {
        progress.file_read(&path, i + 1, total);
        debug!(path = %path.display(), "reading");

        let document = read_document(&path)?;
        match extractor.extract(&document.text) {
            Some(body) if !body.is_empty() => {
                debug!(
                    path = %path.display(),
                    encoding = %document.encoding,
                    chars = body.chars().count(),
                    "collected body"
                );
                corpus.push(document.path, body);
            }
            Some(_) => {
                debug!(path = %path.display(), "document body is empty after cleanup");
                skipped += 1;
            }
            None => {
                debug!(path = %path.display(), "no document body found");
                skipped += 1;
            }
        }
    }

    info!(collected = corpus.len(), skipped, "corpus read complete");
    Ok(corpus)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
