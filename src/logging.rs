use crate::config::{log_file_path, LogArgs};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, Level};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock timestamps, second resolution.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format(TIME_FORMAT))
    }
}

/// Install the global subscriber for the tool `name`.
///
/// With `--logdir` everything is appended to `<logdir>/<name>.log`; otherwise
/// it goes to stdout. `RUST_LOG` overrides the level picked by `--debug`.
pub fn init(args: &LogArgs, name: &str) -> Result<Option<PathBuf>> {
    let level = if args.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime)
        .with_target(false);

    let log_file = match &args.logdir {
        Some(dir) => {
            let path = log_file_path(dir, name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            println!(
                "All logging going to {} (debug info {})",
                path.display(),
                if args.debug { "enabled" } else { "disabled" }
            );
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
            Some(path)
        }
        None => {
            builder.with_writer(std::io::stdout).init();
            None
        }
    };

    debug!("Logging initialized at level {level}");
    Ok(log_file)
}
