use std::fs::OpenOptions;
use std::path::Path;

use log::LevelFilter;

/// Sends `log` output to `path`. The terminal belongs to the UI, so without a
/// file no logger is installed and log calls are dropped.
pub fn init(path: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let level = level.parse().unwrap_or(LevelFilter::Info);

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    log::info!("cpufall {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}
