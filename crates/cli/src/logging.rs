use anyhow::{anyhow, Result};
use neofs_config::LoggingSettings;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
///
/// Logs go to stderr so that stdout only carries step reports.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .map_err(|err| anyhow!("invalid log filter {:?}: {err}", settings.filter))?;

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow!("cannot install log subscriber: {err}"))
}
