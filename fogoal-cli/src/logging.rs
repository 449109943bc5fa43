use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVES: &str = "fogoal=info,fogoal_core=info";
const VERBOSE_LOG_DIRECTIVES: &str = "fogoal=debug,fogoal_core=debug";

/// Logs go to stderr so ICS or JSON printed on stdout stays clean.
///
/// `FOGOAL_LOG` wins over `RUST_LOG`; `-v` only changes the fallback.
pub fn init_logging(verbose: bool) -> Result<()> {
    let fallback = if verbose {
        VERBOSE_LOG_DIRECTIVES
    } else {
        DEFAULT_LOG_DIRECTIVES
    };

    let filter = EnvFilter::try_from_env("FOGOAL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(fallback))
        .context("parse log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("init logging: {e}"))
}
