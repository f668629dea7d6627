use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr log subscriber. `TALLY_LOG` overrides the level the
/// `-v` count selects, so the operator menu on stdout stays clean.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
