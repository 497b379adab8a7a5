use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::ui::palette::{Palette, RampAnchors, Rgba};
use crate::update::{Mode, UpdateRate};

pub const MIN_SIZE: u32 = 10;
pub const MAX_SIZE: u32 = 256;
pub const DEFAULT_SIZE: u32 = 120;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings file I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings file must hold a JSON object")]
    NotAnObject,
}

/// User preferences that survive restarts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Settings {
    pub update_interval: UpdateRate,
    pub size: u32,
    pub mode: Mode,
    pub background: Rgba,
    pub foreground1: Rgba,
    pub foreground2: Rgba,
    pub has_average: bool,
    pub band_edges: bool,
    pub ramp: RampAnchors,
    /// Command line for the launch key; blank picks a task manager.
    pub command: String,
    pub command_in_terminal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            update_interval: UpdateRate::default(),
            size: DEFAULT_SIZE,
            mode: Mode::default(),
            background: palette.background,
            foreground1: palette.foreground1,
            foreground2: palette.foreground2,
            has_average: true,
            band_edges: false,
            ramp: palette.ramp,
            command: String::new(),
            command_in_terminal: true,
        }
    }
}

impl Settings {
    pub fn palette(&self) -> Palette {
        Palette {
            background: self.background,
            foreground1: self.foreground1,
            foreground2: self.foreground2,
            ramp: self.ramp,
        }
    }

    /// Parses a settings document. Entries that are missing or invalid keep
    /// their defaults; only a malformed document is an error.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let value: Value = serde_json::from_str(text)?;
        let obj = value.as_object().ok_or(SettingsError::NotAnObject)?;

        let mut s = Settings::default();
        read_field(obj, "update_interval", &mut s.update_interval);
        read_field(obj, "mode", &mut s.mode);
        read_field(obj, "background", &mut s.background);
        read_field(obj, "foreground1", &mut s.foreground1);
        read_field(obj, "foreground2", &mut s.foreground2);
        read_field(obj, "has_average", &mut s.has_average);
        read_field(obj, "band_edges", &mut s.band_edges);
        read_field(obj, "ramp", &mut s.ramp);
        read_field(obj, "command", &mut s.command);
        read_field(obj, "command_in_terminal", &mut s.command_in_terminal);
        s.command = s.command.trim().to_string();

        let mut size = i64::from(s.size);
        read_field(obj, "size", &mut size);
        s.size = clamp_size(size);
        Ok(s)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Option<Self>, SettingsError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

pub fn clamp_size(size: i64) -> u32 {
    size.clamp(i64::from(MIN_SIZE), i64::from(MAX_SIZE)) as u32
}

fn read_field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = obj.get(key) else {
        return;
    };
    match T::deserialize(value) {
        Ok(v) => *slot = v,
        Err(e) => log::warn!("settings: ignoring {key}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpufall.json");
        assert!(Settings::load(&path).unwrap().is_none());

        let settings = Settings {
            update_interval: UpdateRate::Rate1s,
            size: 64,
            mode: Mode::Disabled,
            background: Rgba::new(0.0, 0.0, 0.25, 1.0),
            foreground1: Rgba::new(0.0, 0.5, 0.0, 1.0),
            foreground2: Rgba::new(1.0, 1.0, 0.0, 1.0),
            has_average: false,
            band_edges: true,
            ramp: RampAnchors::ForegroundOnly,
            command: "btop".to_string(),
            command_in_terminal: false,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), Some(settings));
    }

    #[test]
    fn persisted_layout_uses_indices_and_quadruples() {
        let json = Settings::default().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["update_interval"], 1);
        assert_eq!(value["mode"], 1);
        assert_eq!(value["background"], "1,1,1,1");
        assert_eq!(value["foreground2"], "1,0,0,1");
        assert_eq!(value["ramp"], "with-background");
        assert_eq!(value["command"], "");
        assert_eq!(value["command_in_terminal"], true);
    }

    #[test]
    fn invalid_entries_fall_back_to_defaults() {
        let s = Settings::from_json(
            r#"{
                "update_interval": 42,
                "mode": 7,
                "size": -5,
                "background": "red",
                "foreground1": "0,0,1,1",
                "has_average": false
            }"#,
        )
        .unwrap();
        let defaults = Settings::default();
        assert_eq!(s.update_interval, defaults.update_interval);
        assert_eq!(s.mode, defaults.mode);
        assert_eq!(s.size, MIN_SIZE);
        assert_eq!(s.background, defaults.background);
        assert_eq!(s.foreground1, Rgba::new(0.0, 0.0, 1.0, 1.0));
        assert!(!s.has_average);
    }

    #[test]
    fn launch_command_is_trimmed_on_load() {
        let s = Settings::from_json(r#"{"command": "  htop -t ", "command_in_terminal": 0}"#)
            .unwrap();
        assert_eq!(s.command, "htop -t");
        // not a boolean, keeps the default
        assert!(s.command_in_terminal);
    }

    #[test]
    fn oversized_size_is_clamped() {
        let s = Settings::from_json(r#"{"size": 100000}"#).unwrap();
        assert_eq!(s.size, MAX_SIZE);
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(matches!(
            Settings::from_json("{"),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            Settings::from_json("[1, 2]"),
            Err(SettingsError::NotAnObject)
        ));
    }
}
