use std::fmt;
use std::io;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// `--log-level` that is neither a level nor a valid filter directive.
#[derive(Debug)]
pub struct InvalidLogLevel {
    value: String,
    source: ParseError,
}

impl fmt::Display for InvalidLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--log-level '{}': {}", self.value, self.source)
    }
}

impl std::error::Error for InvalidLogLevel {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Log filter for this run. A valid `RUST_LOG` wins; an invalid one is
/// ignored in favour of `--log-level`, which must parse.
fn log_filter(rust_log: Option<&str>, log_level: &str) -> Result<EnvFilter, InvalidLogLevel> {
    if let Some(filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(log_level).map_err(|source| InvalidLogLevel {
        value: log_level.to_string(),
        source,
    })
}

/// Send diagnostics to stderr so stdout carries only the rendered result,
/// whatever `--output` format was chosen. Colours only on a terminal.
pub fn init(log_level: &str) -> Result<(), InvalidLogLevel> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = log_filter(rust_log.as_deref(), log_level)?;

    // A subscriber can only be installed once per process; later calls keep the first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .without_time()
        .try_init();
    Ok(())
}
