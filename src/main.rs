mod app;
mod config;
mod event;
mod launch;
mod logging;
mod metrics;
mod settings;
mod ui;
mod update;
mod util;

use clap::Parser;

use app::App;
use config::Config;
use metrics::cpu::SysinfoSource;
use settings::Settings;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::parse();
    logging::init(config.log_file.as_deref(), &config.log_level)?;

    let mut settings = match config.settings.as_deref() {
        Some(path) => match Settings::load(path) {
            Ok(Some(s)) => {
                log::info!("settings loaded from {}", path.display());
                s
            }
            Ok(None) => {
                log::info!("no settings at {}, using defaults", path.display());
                Settings::default()
            }
            Err(e) => {
                log::warn!("ignoring settings at {}: {e}", path.display());
                Settings::default()
            }
        },
        None => Settings::default(),
    };
    config.apply(&mut settings);
    log::debug!("starting with {settings:?}");

    let source = SysinfoSource::new();
    let mut app = App::new(settings, Box::new(source), config.settings.clone());

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
