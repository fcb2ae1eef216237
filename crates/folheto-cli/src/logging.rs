//! Tracing setup for the CLI
//!
//! Log level comes from the FOLHETO_LOG environment variable; without it
//! only warnings and errors reach stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable controlling the log filter
const LOG_ENV: &str = "FOLHETO_LOG";

/// Initialize stderr logging (ignore error if already initialized)
pub fn init() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("folheto_core=warn,folheto_cli=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
