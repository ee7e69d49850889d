//! Source tree traversal.
//!
//! Order is deterministic: inside each directory, files come before
//! subdirectories and both are sorted by file name.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use texprose_shared::{Result, TexProseError, WalkConfig};

/// List every source file under `root`, in walk order.
///
/// Any traversal error aborts the walk.
pub fn collect_source_files(root: &Path, config: &WalkConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(TexProseError::validation(format!(
            "source directory '{}' does not exist or is not a directory",
            root.display()
        )));
    }

    let suffix = format!(".{}", config.extension.trim_start_matches('.'));
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by(files_first_by_name)
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            TexProseError::walk(path, e.to_string())
        })?;

        if !is_regular_file(&entry) {
            continue;
        }

        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            files.push(entry.into_path());
        } else {
            debug!(path = %entry.path().display(), "skipping non-source file");
        }
    }

    Ok(files)
}

fn files_first_by_name(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Regular files, plus symlinks that resolve to regular files.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}
