#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. Falls back to `warn` when the filter does not parse.
/// Returns `false` when a global subscriber was already set.
pub(crate) fn init(filter: &str) -> bool {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("goalsheet: invalid log filter {filter:?} ({err}); using warn");
        EnvFilter::new("warn")
    });
    match tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            eprintln!("goalsheet: keeping the existing log subscriber ({err})");
            false
        }
    }
}
