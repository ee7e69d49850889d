//! Shared types, error model, and configuration for texprose.
//!
//! This crate is the foundation depended on by all other texprose crates.
//! It provides:
//! - [`TexProseError`], the unified error type
//! - Domain types ([`Document`], [`Corpus`], [`ChunkMeta`], [`ChunkManifest`])
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_ENVIRONMENTS, DEFAULT_SKIP_LINE_PREFIXES, DefaultsConfig, ExtractConfig,
    OutputConfig, RunConfig, WalkConfig, WriteConfig, config_dir, config_file_path, expand_tilde,
    init_config, init_config_at, load_config, load_config_from,
};
pub use error::{Result, TexProseError};
pub use types::{
    CURRENT_MANIFEST_VERSION, ChunkManifest, ChunkMeta, Corpus, CorpusEntry, Document,
    SourceEncoding,
};
