//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use texprose_core::{ProgressReporter, RunResult};
use texprose_extract::Extractor;
use texprose_shared::{
    AppConfig, ChunkMeta, RunConfig, expand_tilde, init_config, init_config_at, load_config,
    load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// texprose: extract prose from LaTeX sources into chunked text files.
#[derive(Parser)]
#[command(
    name = "texprose",
    version,
    about = "Extract prose from a tree of LaTeX sources into size-bounded text files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.texprose/texprose.toml).
    #[arg(long, global = true, env = "TEXPROSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Walk a source tree and write the extracted prose as chunk files.
    Run(RunArgs),

    /// Print the extracted prose of a single file.
    Extract {
        /// LaTeX source file.
        file: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags for `texprose run`. Each overrides the matching config value.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct RunArgs {
    /// Root directory to scan.
    #[arg(short, long)]
    pub source: Option<String>,

    /// Output prefix; chunks are written as <PREFIX>_<k>.txt.
    #[arg(short, long)]
    pub out: Option<String>,

    /// Maximum characters per output file.
    #[arg(short, long)]
    pub max_chars: Option<usize>,

    /// Source file extension, without the dot.
    #[arg(long)]
    pub ext: Option<String>,

    /// Also write <PREFIX>_manifest.json.
    #[arg(long)]
    pub manifest: bool,

    /// Leave chunk files from a previous, larger run in place.
    #[arg(long)]
    pub keep_stale: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so `texprose extract` output stays clean on stdout.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "texprose=info",
        1 => "texprose=debug",
        _ => "texprose=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    match cli.command {
        Command::Run(args) => cmd_run(config_path.as_deref(), &args),
        Command::Extract { file } => cmd_extract(config_path.as_deref(), &file),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path.as_deref()),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

/// Load the config file named on the command line, or the default one.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Merge `run` flags over the loaded config.
fn build_run_config(config: &AppConfig, args: &RunArgs) -> RunConfig {
    let mut run = RunConfig::from(config);

    if let Some(source) = &args.source {
        run.source_dir = expand_tilde(source);
    }
    if let Some(out) = &args.out {
        run.write.output_prefix = expand_tilde(out);
    }
    if let Some(max) = args.max_chars {
        run.write.max_chars_per_file = max;
    }
    if let Some(ext) = &args.ext {
        run.walk.extension = ext.clone();
    }
    if args.manifest {
        run.write.emit_manifest = true;
    }
    if args.keep_stale {
        run.write.prune_stale = false;
    }
    run.write.tool_version = env!("CARGO_PKG_VERSION").to_string();

    run
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_run(config_path: Option<&Path>, args: &RunArgs) -> Result<()> {
    let config = resolve_config(config_path)?;
    let run_config = build_run_config(&config, args);

    info!(
        source = %run_config.source_dir.display(),
        prefix = %run_config.write.output_prefix.display(),
        max_chars = run_config.write.max_chars_per_file,
        "converting sources"
    );

    let reporter = CliProgress::new();
    let result = texprose_core::run(&run_config, &reporter)?;

    // Print summary
    println!();
    println!(
        "  Extracted prose written to '{}_*.txt'",
        run_config.write.output_prefix.display()
    );
    println!("  Documents: {}", result.documents);
    println!("  Chunks:    {}", result.chunks.len());
    println!("  Chars:     {}", result.total_chars);
    if !result.stale_removed.is_empty() {
        println!("  Pruned:    {} stale chunk file(s)", result.stale_removed.len());
    }
    if let Some(manifest) = &result.manifest_path {
        println!("  Manifest:  {}", manifest.display());
    }
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_extract(config_path: Option<&Path>, file: &Path) -> Result<()> {
    let config = resolve_config(config_path)?;
    let extractor = Extractor::new(&config.extract)?;

    let document = texprose_corpus::read_document(file)?;
    info!(path = %file.display(), encoding = %document.encoding, "extracting");

    let body = extractor.extract(&document.text).ok_or_else(|| {
        eyre!(
            "no \\begin{{document}} ... \\end{{document}} body found in '{}'",
            file.display()
        )
    })?;

    println!("{body}");
    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(p) => {
            init_config_at(p)?;
            p.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_read(&self, path: &Path, current: usize, total: usize) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.spinner
            .set_message(format!("Reading [{current}/{total}] {name}..."));
    }

    fn chunk_written(&self, chunk: &ChunkMeta) {
        self.spinner.set_message(format!(
            "Wrote {} ({} chars)",
            chunk.filename, chunk.char_count
        ));
    }

    fn done(&self, _result: &RunResult) {
        self.spinner.finish_and_clear();
    }
}
