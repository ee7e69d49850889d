//! Chunked output writer.
//!
//! Joins the corpus bodies with `\n` and writes the result as numbered
//! plain-text files of bounded character length:
//!
//! ```text
//! <dir>/
//! ├── <stem>_1.txt
//! ├── <stem>_2.txt
//! ├── ...
//! └── <stem>_manifest.json   (optional)
//! ```

mod chunk;

use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use texprose_shared::{
    CURRENT_MANIFEST_VERSION, ChunkManifest, ChunkMeta, Result, TexProseError, WriteConfig,
};

pub use chunk::{ChunkPaths, split_chars};

/// Output from a successful write.
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Metadata for every chunk written, in order.
    pub chunks: Vec<ChunkMeta>,
    /// Characters in the joined corpus.
    pub total_chars: usize,
    /// Directory holding the chunk files.
    pub output_dir: PathBuf,
    /// Chunk files from an earlier, larger run that were deleted.
    pub stale_removed: Vec<PathBuf>,
    /// Path of the manifest, when one was written.
    pub manifest_path: Option<PathBuf>,
}

/// Join `contents` with `\n` and write it as `<prefix>_<k>.txt` chunks.
///
/// The first chunk file is truncated before anything else happens, so it is
/// empty when the corpus is. Each chunk is written to a temp file and renamed
/// into place. Any I/O failure aborts; files already written stay on disk.
#[instrument(skip_all, fields(prefix = %config.output_prefix.display(), bodies = contents.len()))]
pub fn write_chunks<S: AsRef<str>>(contents: &[S], config: &WriteConfig) -> Result<WriteResult> {
    if config.max_chars_per_file == 0 {
        return Err(TexProseError::validation(
            "max_chars_per_file must be greater than 0",
        ));
    }

    let paths = ChunkPaths::new(&config.output_prefix)?;
    let dir = paths.dir();
    std::fs::create_dir_all(dir).map_err(|e| TexProseError::io(dir, e))?;

    let first = paths.chunk_path(1);
    std::fs::File::create(&first).map_err(|e| TexProseError::io(&first, e))?;
    debug!(path = %first.display(), "truncated first chunk file");

    let joined = join_bodies(contents);
    let pieces = split_chars(&joined, config.max_chars_per_file);

    let mut chunks = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.iter().enumerate() {
        let index = i + 1;
        let meta = write_chunk(&paths, index, piece)?;
        debug!(
            file = %meta.filename,
            chars = meta.char_count,
            bytes = meta.size_bytes,
            "wrote chunk"
        );
        chunks.push(meta);
    }

    let stale_removed = if config.prune_stale {
        prune_stale_chunks(&paths, chunks.len())?
    } else {
        Vec::new()
    };

    let total_chars: usize = chunks.iter().map(|c| c.char_count).sum();

    let manifest_path = if config.emit_manifest {
        let manifest = ChunkManifest {
            schema_version: CURRENT_MANIFEST_VERSION,
            tool_version: config.tool_version.clone(),
            generated_at: Utc::now(),
            max_chars_per_file: config.max_chars_per_file,
            document_count: contents.len(),
            total_chars,
            chunks: chunks.clone(),
        };
        let path = paths.manifest_path();
        write_json(&path, &manifest)?;
        Some(path)
    } else {
        None
    };

    info!(
        chunks = chunks.len(),
        total_chars,
        stale_removed = stale_removed.len(),
        "chunk write complete"
    );

    Ok(WriteResult {
        chunks,
        total_chars,
        output_dir: dir.to_path_buf(),
        stale_removed,
        manifest_path,
    })
}

/// Read a manifest written by [`write_chunks`].
pub fn read_manifest(path: &Path) -> Result<ChunkManifest> {
    let content = std::fs::read_to_string(path).map_err(|e| TexProseError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        TexProseError::Serialization(format!("invalid manifest {}: {e}", path.display()))
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn join_bodies<S: AsRef<str>>(contents: &[S]) -> String {
    let capacity = contents.iter().map(|s| s.as_ref().len() + 1).sum();
    let mut joined = String::with_capacity(capacity);
    for (i, body) in contents.iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.push_str(body.as_ref());
    }
    joined
}

/// Write one chunk atomically (temp file, then rename).
fn write_chunk(paths: &ChunkPaths, index: usize, content: &str) -> Result<ChunkMeta> {
    let filename = paths.chunk_file_name(index);
    let target = paths.chunk_path(index);
    let temp = paths.dir().join(format!(".{filename}.tmp"));

    std::fs::write(&temp, content).map_err(|e| TexProseError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| TexProseError::io(&target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());

    Ok(ChunkMeta {
        index,
        filename,
        char_count: content.chars().count(),
        size_bytes: content.len(),
        sha256: format!("{:x}", hasher.finalize()),
    })
}

/// Delete `_<k>.txt` files numbered past `written`, stopping at the first gap.
///
/// The first chunk file is never deleted.
fn prune_stale_chunks(paths: &ChunkPaths, written: usize) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let mut index = written.max(1) + 1;

    loop {
        let path = paths.chunk_path(index);
        if !path.is_file() {
            break;
        }
        std::fs::remove_file(&path).map_err(|e| TexProseError::io(&path, e))?;
        debug!(path = %path.display(), "removed stale chunk");
        removed.push(path);
        index += 1;
    }

    Ok(removed)
}

/// Write a JSON file (pretty-printed).
fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| TexProseError::Serialization(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| TexProseError::io(path, e))?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
