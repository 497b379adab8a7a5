use std::path::PathBuf;

use clap::Parser;

use crate::settings::Settings;
use crate::ui::palette::{RampAnchors, Rgba};
use crate::update::UpdateRate;

#[derive(Parser, Debug)]
#[command(
    name = "cpufall",
    version,
    about = "A per-core CPU load waterfall for the terminal"
)]
pub struct Config {
    /// Sampling interval
    #[arg(short, long, value_enum)]
    pub rate: Option<UpdateRate>,

    /// Visible history length in columns
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(10..=256))]
    pub size: Option<u32>,

    /// Background colour as "R,G,B,A" floats in 0..1
    #[arg(long, value_name = "R,G,B,A")]
    pub background: Option<Rgba>,

    /// Colour at the middle of the load ramp
    #[arg(long, value_name = "R,G,B,A")]
    pub foreground1: Option<Rgba>,

    /// Colour at full load
    #[arg(long, value_name = "R,G,B,A")]
    pub foreground2: Option<Rgba>,

    /// Show the aggregate lane above the per-core bands
    #[arg(long, overrides_with = "no_average")]
    pub average: bool,

    #[arg(long, hide = true)]
    pub no_average: bool,

    /// Which colours form the load ramp
    #[arg(long, value_enum)]
    pub ramp: Option<RampAnchors>,

    /// Dim the first and last pixel row of every band
    #[arg(long)]
    pub band_edges: bool,

    /// Command run by the launch key (Enter); defaults to htop or top
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Start the launch command in the background instead of handing it the terminal
    #[arg(long)]
    pub detached: bool,

    /// JSON settings file, loaded at start and written back on quit
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Append log output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Flags win over whatever the settings file held.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(rate) = self.rate {
            settings.update_interval = rate;
        }
        if let Some(size) = self.size {
            settings.size = size;
        }
        if let Some(c) = self.background {
            settings.background = c;
        }
        if let Some(c) = self.foreground1 {
            settings.foreground1 = c;
        }
        if let Some(c) = self.foreground2 {
            settings.foreground2 = c;
        }
        if self.average {
            settings.has_average = true;
        }
        if self.no_average {
            settings.has_average = false;
        }
        if let Some(ramp) = self.ramp {
            settings.ramp = ramp;
        }
        if self.band_edges {
            settings.band_edges = true;
        }
        if let Some(command) = &self.command {
            settings.command = command.trim().to_string();
        }
        if self.detached {
            settings.command_in_terminal = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let config = Config::parse_from([
            "cpufall",
            "--rate",
            "2s",
            "--size",
            "40",
            "--foreground2",
            "0,1,0,1",
            "--no-average",
            "--ramp",
            "foreground-only",
            "--command",
            " btop ",
            "--detached",
        ]);
        let mut settings = Settings::default();
        config.apply(&mut settings);
        assert_eq!(settings.update_interval, UpdateRate::Rate2s);
        assert_eq!(settings.size, 40);
        assert_eq!(settings.foreground2, Rgba::new(0.0, 1.0, 0.0, 1.0));
        assert!(!settings.has_average);
        assert_eq!(settings.ramp, RampAnchors::ForegroundOnly);
        assert_eq!(settings.command, "btop");
        assert!(!settings.command_in_terminal);
        assert_eq!(settings.background, Settings::default().background);
    }

    #[test]
    fn out_of_range_size_is_rejected() {
        assert!(Config::try_parse_from(["cpufall", "--size", "5"]).is_err());
        assert!(Config::try_parse_from(["cpufall", "--background", "1,1,1"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
