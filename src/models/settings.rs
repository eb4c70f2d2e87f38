//! Player settings persisted to `settings.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const SETTINGS_PATH: &str = "settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume, 0.0 to 1.0.
    pub master_volume: f32,
    /// Id of the song selected in the menu.
    pub song: String,
    /// Name pre-filled when saving a score.
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            song: "ode_to_joy".to_string(),
            player_name: "player".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from the working directory, falling back to
    /// defaults when the file is missing or malformed.
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("SETTINGS: Using defaults ({})", e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Err(format!("{:?} not found", path));
        }
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))
    }

    /// Writes the settings back to disk.
    pub fn save(&self) -> Result<(), String> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(SETTINGS_PATH, content).map_err(|e| format!("Failed to write settings: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from(Path::new("does_not_exist.toml"));
        assert_eq!(settings.master_volume, 0.5);
        assert_eq!(settings.song, "ode_to_joy");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let settings: Settings = toml::from_str("master_volume = 0.8").unwrap();
        assert_eq!(settings.master_volume, 0.8);
        assert_eq!(settings.song, "ode_to_joy");
        assert_eq!(settings.player_name, "player");
    }
}
