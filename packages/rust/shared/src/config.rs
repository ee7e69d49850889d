//! Application configuration for texprose.
//!
//! User config lives at `~/.texprose/texprose.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TexProseError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "texprose.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".texprose";

/// Non-prose environments removed from every document body, in the order
/// they are applied.
pub const DEFAULT_ENVIRONMENTS: &[&str] = &[
    "equation",
    "equations",
    "figure",
    "figures",
    "equation*",
    "table",
    "tabular",
    "subequations",
    "eqnarray",
    "flalign",
    "frame",
    "align",
    "thebibliography",
];

/// Lines whose trimmed form starts with one of these are dropped.
pub const DEFAULT_SKIP_LINE_PREFIXES: &[&str] = &["%", "\\include", "\\input"];

// ---------------------------------------------------------------------------
// Config structs (matching texprose.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Source tree traversal.
    #[serde(default)]
    pub walk: WalkConfig,

    /// Prose extraction rules.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Output file handling.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Root directory scanned for source files.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Output path prefix; chunks are written as `<prefix>_<k>.txt`.
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Upper bound, in characters, on each output file's size.
    #[serde(default = "default_max_chars")]
    pub max_chars_per_file: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_prefix: default_output_prefix(),
            max_chars_per_file: default_max_chars(),
        }
    }
}

fn default_source_dir() -> String {
    ".".into()
}
fn default_output_prefix() -> String {
    "output/my_papers".into()
}
fn default_max_chars() -> usize {
    1_000_000
}

/// `[walk]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// File name suffix (without the dot) that marks a source file.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Descend into symlinked directories.
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            follow_links: false,
        }
    }
}

fn default_extension() -> String {
    "tex".into()
}

/// `[extract]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Environment names whose `\begin{..}`/`\end{..}` regions are removed.
    #[serde(default = "default_environments")]
    pub environments: Vec<String>,

    /// Line prefixes (after trimming) that cause a line to be dropped.
    #[serde(default = "default_skip_line_prefixes")]
    pub skip_line_prefixes: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            environments: default_environments(),
            skip_line_prefixes: default_skip_line_prefixes(),
        }
    }
}

fn default_environments() -> Vec<String> {
    DEFAULT_ENVIRONMENTS.iter().map(|s| s.to_string()).collect()
}
fn default_skip_line_prefixes() -> Vec<String> {
    DEFAULT_SKIP_LINE_PREFIXES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Delete `<prefix>_<k>.txt` files left over from a larger previous run.
    #[serde(default = "default_true")]
    pub prune_stale: bool,

    /// Write `<prefix>_manifest.json` next to the chunks.
    #[serde(default)]
    pub emit_manifest: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prune_stale: true,
            emit_manifest: false,
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Runtime config (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime settings for the chunked writer.
#[derive(Debug, Clone)]
pub struct WriteConfig {
    /// Output path prefix (`output/my_papers` yields `output/my_papers_1.txt`).
    pub output_prefix: PathBuf,
    /// Maximum characters per chunk file. Must be greater than zero.
    pub max_chars_per_file: usize,
    pub prune_stale: bool,
    pub emit_manifest: bool,
    /// Recorded in the manifest.
    pub tool_version: String,
}

/// Runtime configuration for one conversion run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_dir: PathBuf,
    pub walk: WalkConfig,
    pub extract: ExtractConfig,
    pub write: WriteConfig,
}

impl From<&AppConfig> for RunConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            source_dir: expand_tilde(&config.defaults.source_dir),
            walk: config.walk.clone(),
            extract: config.extract.clone(),
            write: WriteConfig {
                output_prefix: expand_tilde(&config.defaults.output_prefix),
                max_chars_per_file: config.defaults.max_chars_per_file,
                prune_stale: config.output.prune_stale,
                emit_manifest: config.output.emit_manifest,
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Returns the input unchanged when it has no leading `~` or the home
/// directory cannot be determined.
pub fn expand_tilde(input: &str) -> PathBuf {
    let rest = if input == "~" {
        Some("")
    } else {
        input
            .strip_prefix("~/")
            .or_else(|| input.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(input),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.texprose/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TexProseError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.texprose/texprose.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TexProseError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        TexProseError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| TexProseError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| TexProseError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| TexProseError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}
