/// `mkv` command-line tool: inspect, validate and analyse EBML / Matroska
/// files with the streaming reader.
///
/// # Command overview
///
/// ```text
/// mkv <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print the element tree of a file
///   validate   Check a file for structural correctness
///   frames     List SimpleBlock frames
///   stats      Print element counts and byte totals
///   help       Print help information
///
/// Global options:
///   -v, --verbose    More log output on stderr (-v debug, -vv trace)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// Every command reads its input incrementally through
/// `StreamingMkvReader`, so files of any size (and `-` for stdin) work in
/// constant memory apart from the largest single leaf element.
///
/// # Exit codes
///
/// | Code | Meaning                                  |
/// |------|------------------------------------------|
/// | 0    | Success                                  |
/// | 1    | Error (I/O failure, malformed file, etc.) |
///
/// All error details and logs go to stderr so stdout can be piped cleanly.
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mkv_parser::{ReaderConfig, ReaderSource, StreamingMkvReader, UnsignedPolicy};

mod cmd_frames;
mod cmd_inspect;
mod cmd_stats;
mod cmd_validate;
mod logging;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Streaming EBML / Matroska inspector.
#[derive(Parser)]
#[command(name = "mkv", version, about = "Streaming EBML / Matroska inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity on stderr (-v debug, -vv trace).
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print the element tree of a file.
    Inspect(InspectArgs),
    /// Check a file for structural correctness.
    Validate(ValidateArgs),
    /// List SimpleBlock frames.
    Frames(FramesArgs),
    /// Print element counts and byte totals.
    Stats(StatsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Options shared by every command that reads a file.
#[derive(clap::Args)]
pub struct InputArgs {
    /// File to read, or `-` for stdin.
    pub file: PathBuf,

    /// Bytes per underlying read. Small values exercise the incremental
    /// parser the way a slow network stream would.
    #[arg(long, default_value_t = 64 * 1024)]
    pub chunk_size: usize,

    /// Reject 8-byte unsigned integers with the top bit set instead of
    /// logging a warning.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `mkv inspect`.
///
/// ```text
/// ┌─────────────┬──────────────────────────────────────────────────────┐
/// │ Flag        │ Effect                                               │
/// ├─────────────┼──────────────────────────────────────────────────────┤
/// │ --json      │ One JSON object per element (JSON Lines) on stdout   │
/// │ --no-values │ Skip decoding leaf values                            │
/// │ --max-depth │ Hide elements nested deeper than N                   │
/// └─────────────┴──────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Emit JSON Lines instead of an indented tree.
    #[arg(long)]
    pub json: bool,

    /// Do not decode leaf values.
    #[arg(long)]
    pub no_values: bool,

    /// Hide elements nested deeper than this.
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for `mkv validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Arguments for `mkv frames`.
#[derive(clap::Args)]
pub struct FramesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only list frames of this track.
    #[arg(long)]
    pub track: Option<u64>,

    /// Stop after this many frames.
    #[arg(long)]
    pub limit: Option<u64>,
}

/// Arguments for `mkv stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

// ── Input ─────────────────────────────────────────────────────────────────────

pub type FileReader = StreamingMkvReader<ReaderSource<Box<dyn Read>>>;

/// Open `args.file` (or stdin) behind a streaming reader.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_reader(args: &InputArgs, config: ReaderConfig) -> Result<FileReader> {
    let input: Box<dyn Read> = if args.file == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.file)
            .with_context(|| format!("cannot open {}", args.file.display()))?;
        Box::new(file)
    };

    let config = ReaderConfig {
        unsigned_policy: if args.strict {
            UnsignedPolicy::Strict
        } else {
            UnsignedPolicy::Lenient
        },
        ..config
    };
    let source = ReaderSource::with_read_chunk(input, args.chunk_size);
    Ok(StreamingMkvReader::with_config(source, config))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Frames(args) => cmd_frames::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
