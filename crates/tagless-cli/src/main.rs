//! tagless: hash music files while ignoring their id3 tags
//!
//! Commands:
//!   hash <file>...   - digest of each file's music payload
//!   info <file>...   - show detected tags and music limits
//!   algorithms       - list supported digest algorithms
//!   config show      - display the effective configuration

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use tagless_core::config::TaglessConfig;
use tagless_core::types::{HashRecord, OutputFormat, TagReport};
use tagless_hash::{hash_file_with, inspect_file, AlgorithmRegistry, HashOptions};

/// Exit code for invalid arguments (unknown algorithm)
const EXIT_USAGE: u8 = 2;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "tagless",
    version,
    about = "Hash audio files ignoring id3 metadata",
    long_about = "tagless: digest the music payload of audio files, skipping id3v1 and id3v2 tags, \
                  so retagged copies of a song hash the same"
)]
struct Cli {
    /// Path to tagless.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "TAGLESS_CONFIG",
        default_value = "~/.config/tagless/config.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(long, env = "TAGLESS_LOG")]
    log: Option<String>,

    /// Log format. Overrides the config file.
    #[arg(long, env = "TAGLESS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the digest of each file's music payload
    Hash(HashArgs),

    /// Show the tags found in each file and where the music lies
    Info {
        /// Files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// One JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// List available digest algorithms
    Algorithms,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
struct HashArgs {
    /// Files to hash
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Hash algorithm to use (default: sha1). See `tagless algorithms`
    #[arg(long, short = 'a')]
    algorithm: Option<String>,

    /// Max number of bytes of music to hash
    #[arg(long, short = 'm', value_parser = clap::value_parser!(u64).range(1..))]
    maxbytes: Option<u64>,

    /// Print only hash information, no file name
    #[arg(long = "hash", short = 'q')]
    hash_only: bool,

    /// Write results to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Worker threads when hashing several files (0 = one per CPU)
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    /// Bytes per read
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    chunk_size: Option<usize>,

    /// One JSON object per line
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config_path = expand_tilde(&cli.config);
    let config = TaglessConfig::load(&config_path)
        .with_context(|| format!("loading config: {}", config_path.display()))?;

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = cli.log_format.clone().unwrap_or(match config.log.format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    });
    init_logging(&level, &format);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "tagless starting"
    );

    let registry = AlgorithmRegistry::with_defaults();

    match cli.command {
        Commands::Hash(args) => cmd_hash(config, &registry, args),
        Commands::Info { files, json } => cmd_info(&files, json || config.output.format == OutputFormat::Json),
        Commands::Algorithms => cmd_algorithms(&registry),
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &config_path),
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries results, logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(io::stderr))
                .init();
        }
    }
}

/// Expand `~` in path to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_default();
        PathBuf::from(home).join(rest)
    } else {
        path.to_path_buf()
    }
}

/// stdout, or the file named by `--output`
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("couldn't open {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── `tagless hash` ────────────────────────────────────────────────────────────

/// Fold command-line flags over the loaded config.
fn apply_hash_overrides(config: &mut TaglessConfig, args: &HashArgs) -> Result<()> {
    if let Some(alg) = &args.algorithm {
        config.hash.algorithm = alg.clone();
    }
    if let Some(max) = args.maxbytes {
        config.hash.max_bytes = Some(max);
    }
    if let Some(jobs) = args.jobs {
        config.hash.jobs = jobs;
    }
    if let Some(chunk) = args.chunk_size {
        config.hash.chunk_size = chunk;
    }
    if args.hash_only {
        config.output.hash_only = true;
    }
    if args.json {
        config.output.format = OutputFormat::Json;
    }
    config.validate()?;
    Ok(())
}

fn hash_one(
    path: &Path,
    algorithm: &str,
    registry: &AlgorithmRegistry,
    options: &HashOptions,
) -> Result<String> {
    if !path.is_file() {
        anyhow::bail!(
            "file at '{}' does not exist or it is not a regular file",
            path.display()
        );
    }
    Ok(hash_file_with(path, algorithm, registry, options)?)
}

fn cmd_hash(mut config: TaglessConfig, registry: &AlgorithmRegistry, args: HashArgs) -> Result<ExitCode> {
    apply_hash_overrides(&mut config, &args)?;

    let algorithm = config.hash.algorithm.as_str();
    if let Err(e) = registry.resolve(algorithm) {
        eprintln!("tagless: {e}");
        return Ok(ExitCode::from(EXIT_USAGE));
    }

    let options = HashOptions {
        chunk_size: config.hash.chunk_size,
        max_bytes: config.hash.max_bytes,
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.hash.jobs)
        .build()
        .context("building hash worker pool")?;
    info!(
        files = args.files.len(),
        algorithm,
        threads = pool.current_num_threads(),
        "hashing"
    );

    // par_iter keeps results in argument order
    let results: Vec<Result<String>> = pool.install(|| {
        args.files
            .par_iter()
            .map(|path| hash_one(path, algorithm, registry, &options))
            .collect()
    });

    let mut out = open_output(args.output.as_deref())?;
    let mut failed = 0usize;
    for (path, result) in args.files.iter().zip(results) {
        match result {
            Ok(hash) => write_hash(&mut out, &config, path, hash)?,
            Err(e) => {
                failed += 1;
                eprintln!("tagless: {e:#}");
            }
        }
    }
    out.flush().context("flushing output")?;

    if failed > 0 {
        debug!(failed, "some files could not be hashed");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn write_hash(out: &mut dyn Write, config: &TaglessConfig, path: &Path, hash: String) -> Result<()> {
    match config.output.format {
        OutputFormat::Json => {
            let record = HashRecord {
                path: path.display().to_string(),
                algorithm: config.hash.algorithm.to_ascii_lowercase(),
                hash,
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        }
        OutputFormat::Text if config.output.hash_only => writeln!(out, "{hash}")?,
        OutputFormat::Text => writeln!(out, "{hash} {}", file_name(path))?,
    }
    Ok(())
}

// ── `tagless info` ────────────────────────────────────────────────────────────

fn cmd_info(files: &[PathBuf], json: bool) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0usize;

    for path in files {
        let tagged = match inspect_file(path) {
            Ok(t) => t,
            Err(e) => {
                failed += 1;
                eprintln!("tagless: {e}");
                continue;
            }
        };
        let report = tagged.report(path.display().to_string());
        if json {
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        } else {
            print_report(&mut out, &report)?;
        }
    }

    Ok(if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn print_report(out: &mut impl Write, r: &TagReport) -> io::Result<()> {
    writeln!(out, "{}", r.path)?;
    writeln!(out, "  filesize:  {}", r.filesize)?;
    writeln!(
        out,
        "  music:     {}..{} ({})",
        r.startbyte,
        r.endbyte,
        fmt_bytes(r.music_size)
    )?;
    match (r.id3v2_version, r.id3v2_flags) {
        (Some(version), Some(flags)) => {
            writeln!(out, "  id3v2:     v2.{version} (flags {flags:#04x})")?
        }
        _ => writeln!(out, "  id3v2:     none")?,
    }
    let id3v1 = match (r.has_id3v1, r.has_id3v1_extended) {
        (true, true) => "yes (extended)",
        (true, false) => "yes",
        (false, _) => "none",
    };
    writeln!(out, "  id3v1:     {id3v1}")?;
    if r.clamped {
        writeln!(out, "  WARNING: tag sizes do not fit the file, whole file is hashed")?;
    }
    Ok(())
}

// ── `tagless algorithms` ──────────────────────────────────────────────────────

fn cmd_algorithms(registry: &AlgorithmRegistry) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for name in registry.names() {
        writeln!(out, "{name}")?;
    }
    Ok(ExitCode::SUCCESS)
}

// ── `tagless config show` ─────────────────────────────────────────────────────

fn cmd_config_show(config: &TaglessConfig, config_path: &Path) -> Result<ExitCode> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(ExitCode::SUCCESS)
}

// ── Utilities ─────────────────────────────────────────────────────────────────

fn fmt_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
