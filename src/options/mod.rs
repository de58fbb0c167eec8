//! Centralized runtime options with TOML preset support.
//!
//! All tweakable settings (display, playback, camera, keybindings) are
//! consolidated here. Options serialize to/from TOML for presets.

mod camera;
mod display;
mod keybindings;
mod playback;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use keybindings::{KeyAction, KeybindingOptions};
pub use playback::PlaybackOptions;
use serde::{Deserialize, Serialize};

use crate::error::CerebraError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[playback]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Probe cloud and brain mesh display parameters.
    pub display: DisplayOptions,
    /// Playback clock parameters.
    pub playback: PlaybackOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, CerebraError> {
        let content = std::fs::read_to_string(path).map_err(CerebraError::Io)?;
        let mut opts: Self = toml::from_str(&content)
            .map_err(|e| CerebraError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), CerebraError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CerebraError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CerebraError::Io)?;
        }
        std::fs::write(path, content).map_err(CerebraError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let mut parsed: Options = toml::from_str(&toml_str).unwrap();
        parsed.keybindings.rebuild_reverse_map();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[playback]
total_playback_ms = 10000.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.playback.total_playback_ms, 10_000.0);
        // Everything else should be default
        assert_eq!(opts.display.max_point_size, 25.0);
        assert_eq!(opts.display.brain_opacity, 0.4);
        assert_eq!(opts.camera.fovy, 45.0);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("Space"),
            Some(KeyAction::PlayPause)
        );
        assert_eq!(
            opts.keybindings.lookup("Digit2"),
            Some(KeyAction::SelectFaces)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn key_actions_map_to_settings_actions() {
        use crate::data::Category;
        use crate::settings::SettingsAction;

        assert_eq!(
            KeyAction::SelectNoise.settings_action(),
            Some(SettingsAction::SelectCategory(Category::Noise))
        );
        assert_eq!(
            KeyAction::ToggleBand.settings_action(),
            Some(SettingsAction::ToggleBand)
        );
        assert_eq!(KeyAction::PlayPause.settings_action(), None);
        assert_eq!(KeyAction::OpacityUp.settings_action(), None);
    }
}
