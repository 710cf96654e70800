use objctl_runtime::RuntimeMode;
use tracing_subscriber::EnvFilter;

/// Overrides the level picked from the global flags.
pub const LOG_ENV: &str = "OBJCTL_LOG";

pub fn default_directive(mode: &RuntimeMode) -> &'static str {
    if mode.debug {
        "debug"
    } else if mode.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the stderr subscriber. A second call is a no-op.
pub fn init(mode: &RuntimeMode) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(mode)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(mode.debug)
        .without_time()
        .try_init();
}
