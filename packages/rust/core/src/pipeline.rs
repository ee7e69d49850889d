//! End-to-end run: source tree → walk → extract → join → chunk files.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use texprose_artifacts::write_chunks;
use texprose_corpus::{WalkProgress, read_corpus};
use texprose_extract::Extractor;
use texprose_shared::{ChunkMeta, Result, RunConfig};

/// Result of a conversion run.
#[derive(Debug)]
pub struct RunResult {
    /// Source files that produced a non-empty body.
    pub documents: usize,
    /// Written chunk files, in order.
    pub chunks: Vec<ChunkMeta>,
    /// Characters across all chunks.
    pub total_chars: usize,
    /// Directory holding the chunk files.
    pub output_dir: PathBuf,
    /// Stale chunk files deleted from a previous run.
    pub stale_removed: Vec<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once per source file, before it is read.
    fn file_read(&self, path: &Path, current: usize, total: usize);
    /// Called after each chunk file is in place.
    fn chunk_written(&self, chunk: &ChunkMeta);
    /// Called when the run completes.
    fn done(&self, result: &RunResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_read(&self, _path: &Path, _current: usize, _total: usize) {}
    fn chunk_written(&self, _chunk: &ChunkMeta) {}
    fn done(&self, _result: &RunResult) {}
}

/// Run the full conversion.
///
/// 1. Compile extraction rules
/// 2. Walk the source tree and collect document bodies
/// 3. Join and write the chunk files
#[instrument(skip_all, fields(source = %config.source_dir.display()))]
pub fn run(config: &RunConfig, progress: &dyn ProgressReporter) -> Result<RunResult> {
    let start = Instant::now();

    info!(
        source = %config.source_dir.display(),
        prefix = %config.write.output_prefix.display(),
        max_chars = config.write.max_chars_per_file,
        "starting run"
    );

    let extractor = Extractor::new(&config.extract)?;

    // --- Phase 1: Read ---
    progress.phase("Reading source files");
    let walk_progress = PipelineWalkProgress { inner: progress };
    let corpus = read_corpus(&config.source_dir, &config.walk, &extractor, &walk_progress)?;

    // --- Phase 2: Write ---
    progress.phase("Writing chunks");
    let written = write_chunks(&corpus.bodies(), &config.write)?;
    for chunk in &written.chunks {
        progress.chunk_written(chunk);
    }

    let result = RunResult {
        documents: corpus.len(),
        chunks: written.chunks,
        total_chars: written.total_chars,
        output_dir: written.output_dir,
        stale_removed: written.stale_removed,
        manifest_path: written.manifest_path,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        documents = result.documents,
        chunks = result.chunks.len(),
        total_chars = result.total_chars,
        elapsed_ms = result.elapsed.as_millis(),
        "run complete"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Walk progress adapter
// ---------------------------------------------------------------------------

/// Adapts a `ProgressReporter` to the `WalkProgress` interface.
struct PipelineWalkProgress<'a> {
    inner: &'a dyn ProgressReporter,
}

impl WalkProgress for PipelineWalkProgress<'_> {
    fn file_read(&self, path: &Path, current: usize, total: usize) {
        self.inner.file_read(path, current, total);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;

    use texprose_shared::{AppConfig, ExtractConfig};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tp-pipeline-test-{}", uuid::Uuid::now_v7()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_config(source: &Path, prefix: PathBuf, max_chars: usize) -> RunConfig {
        let mut config = RunConfig::from(&AppConfig::default());
        config.source_dir = source.to_path_buf();
        config.write.output_prefix = prefix;
        config.write.max_chars_per_file = max_chars;
        config
    }

    #[derive(Default)]
    struct Recorder {
        phases: RefCell<Vec<String>>,
        files: RefCell<usize>,
        chunks: RefCell<Vec<usize>>,
        done: RefCell<bool>,
    }

    impl ProgressReporter for Recorder {
        fn phase(&self, name: &str) {
            self.phases.borrow_mut().push(name.to_string());
        }
        fn file_read(&self, _path: &Path, _current: usize, _total: usize) {
            *self.files.borrow_mut() += 1;
        }
        fn chunk_written(&self, chunk: &ChunkMeta) {
            self.chunks.borrow_mut().push(chunk.index);
        }
        fn done(&self, _result: &RunResult) {
            *self.done.borrow_mut() = true;
        }
    }

    #[test]
    fn run_end_to_end() {
        let tmp = temp_dir();
        let src = tmp.join("papers");
        fs::create_dir_all(src.join("2023")).unwrap();
        fs::write(
            src.join("intro.tex"),
            "\\documentclass{article}\n\\begin{document}\nWe introduce a method.\n\\begin{table}\nA & B\n\\end{table}\n% cite later\nIt works.\n\\end{document}\n",
        )
        .unwrap();
        fs::write(
            src.join("2023").join("paper.tex"),
            "\\begin{document}\nResults follow.\n\\[ x^2 \\]\n\\input{appendix}\n\\end{document}",
        )
        .unwrap();
        fs::write(src.join("appendix.tex"), "Appendix without a document body.").unwrap();
        fs::write(src.join("notes.txt"), "\\begin{document}ignored\\end{document}").unwrap();

        let config = make_config(&src, tmp.join("out").join("corpus"), 20);
        let recorder = Recorder::default();
        let result = run(&config, &recorder).unwrap();

        let expected = "We introduce a method.\nIt works.\nResults follow.";
        assert_eq!(result.documents, 2);
        assert_eq!(result.total_chars, expected.chars().count());
        assert_eq!(result.output_dir, tmp.join("out"));

        let rebuilt: String = result
            .chunks
            .iter()
            .map(|c| fs::read_to_string(result.output_dir.join(&c.filename)).unwrap())
            .collect();
        assert_eq!(rebuilt, expected);

        assert_eq!(*recorder.files.borrow(), 3);
        assert_eq!(*recorder.chunks.borrow(), vec![1, 2, 3]);
        assert_eq!(
            *recorder.phases.borrow(),
            vec!["Reading source files", "Writing chunks"]
        );
        assert!(*recorder.done.borrow());

        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn run_with_no_sources_leaves_empty_first_chunk() {
        let tmp = temp_dir();
        let src = tmp.join("empty");
        fs::create_dir_all(&src).unwrap();
        fs::write(tmp.join("c_1.txt"), "stale").unwrap();
        fs::write(tmp.join("c_2.txt"), "stale").unwrap();

        let config = make_config(&src, tmp.join("c"), 100);
        let result = run(&config, &SilentProgress).unwrap();

        assert_eq!(result.documents, 0);
        assert!(result.chunks.is_empty());
        assert_eq!(fs::read_to_string(tmp.join("c_1.txt")).unwrap(), "");
        assert!(!tmp.join("c_2.txt").exists());

        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn run_rejects_bad_extract_config() {
        let tmp = temp_dir();
        let mut config = make_config(&tmp, tmp.join("c"), 100);
        config.extract = ExtractConfig {
            environments: vec![String::new()],
            ..ExtractConfig::default()
        };

        assert!(run(&config, &SilentProgress).is_err());
        assert!(!tmp.join("c_1.txt").exists());

        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn run_missing_source_fails_before_writing() {
        let tmp = temp_dir();
        let config = make_config(&tmp.join("nope"), tmp.join("c"), 100);

        assert!(run(&config, &SilentProgress).is_err());
        assert!(!tmp.join("c_1.txt").exists());

        fs::remove_dir_all(&tmp).ok();
    }
}
