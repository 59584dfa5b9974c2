/// stderr logging for the CLI.
///
/// `RUST_LOG` wins when set; otherwise the level comes from the number of
/// `-v` flags:
///
/// ```text
///   (none)  warn    lenient-decode warnings only
///   -v      debug   container closing decisions, skipped elements
///   -vv     trace   every start / end event
/// ```
use tracing_subscriber::{EnvFilter, fmt};

pub fn init(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
