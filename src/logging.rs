use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

pub const TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";
pub const DEFAULT_FILTER: &str = "info,warp=warn,hyper=warn";

/// Installs the global subscriber. Logs go to `log_file` when given
/// (appending), otherwise to stdout. `RUST_LOG` overrides the level filter.
pub fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        None => builder.try_init().map_err(|e| anyhow::anyhow!(e))?,
    }

    Ok(())
}
