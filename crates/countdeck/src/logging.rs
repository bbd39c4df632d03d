use tracing_subscriber::EnvFilter;

/// Initialise logging to stderr.
///
/// `-q` keeps only errors, the default shows warnings, `-v` adds debug and
/// `-vv` trace. `RUST_LOG` wins when it is set.
pub fn init(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("countdeck={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
