use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::Category;
use crate::settings::SettingsAction;

/// Engine-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// play_pause = "Space"
/// toggle_band = "KeyG"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum KeyAction {
    PlayPause,
    StepForward,
    StepBackward,
    ResetPlayback,
    ToggleColorMode,
    ToggleBand,
    ToggleCategoryFilter,
    TogglePredictiveOnly,
    SelectHouses,
    SelectFaces,
    SelectAnimals,
    SelectScenery,
    SelectTools,
    SelectPseudoword,
    SelectCharacters,
    SelectNoise,
    OpacityUp,
    OpacityDown,
    RecenterCamera,
}

impl KeyAction {
    /// The settings reducer action this key maps to, if it targets the
    /// display settings rather than the clock or the mesh.
    #[must_use]
    pub fn settings_action(self) -> Option<SettingsAction> {
        match self {
            Self::ToggleColorMode => Some(SettingsAction::ToggleColorMode),
            Self::ToggleBand => Some(SettingsAction::ToggleBand),
            Self::ToggleCategoryFilter => {
                Some(SettingsAction::ToggleCategoryFilter)
            }
            Self::TogglePredictiveOnly => {
                Some(SettingsAction::TogglePredictiveOnly)
            }
            Self::SelectHouses => {
                Some(SettingsAction::SelectCategory(Category::Houses))
            }
            Self::SelectFaces => {
                Some(SettingsAction::SelectCategory(Category::Faces))
            }
            Self::SelectAnimals => {
                Some(SettingsAction::SelectCategory(Category::Animals))
            }
            Self::SelectScenery => {
                Some(SettingsAction::SelectCategory(Category::Scenery))
            }
            Self::SelectTools => {
                Some(SettingsAction::SelectCategory(Category::Tools))
            }
            Self::SelectPseudoword => {
                Some(SettingsAction::SelectCategory(Category::Pseudoword))
            }
            Self::SelectCharacters => {
                Some(SettingsAction::SelectCategory(Category::Characters))
            }
            Self::SelectNoise => {
                Some(SettingsAction::SelectCategory(Category::Noise))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable keyboard bindings mapping actions to key codes.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `PlayPause` → `"Space"`).
    pub bindings: HashMap<KeyAction, String>,
    /// Reverse lookup cache (key string → action). Rebuilt on load.
    #[serde(skip)]
    key_to_action: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyAction::PlayPause, "Space".into()),
            (KeyAction::StepForward, "ArrowRight".into()),
            (KeyAction::StepBackward, "ArrowLeft".into()),
            (KeyAction::ResetPlayback, "KeyR".into()),
            (KeyAction::ToggleColorMode, "KeyC".into()),
            (KeyAction::ToggleBand, "KeyG".into()),
            (KeyAction::ToggleCategoryFilter, "KeyF".into()),
            (KeyAction::TogglePredictiveOnly, "KeyP".into()),
            (KeyAction::SelectHouses, "Digit1".into()),
            (KeyAction::SelectFaces, "Digit2".into()),
            (KeyAction::SelectAnimals, "Digit3".into()),
            (KeyAction::SelectScenery, "Digit4".into()),
            (KeyAction::SelectTools, "Digit5".into()),
            (KeyAction::SelectPseudoword, "Digit6".into()),
            (KeyAction::SelectCharacters, "Digit7".into()),
            (KeyAction::SelectNoise, "Digit8".into()),
            (KeyAction::OpacityUp, "BracketRight".into()),
            (KeyAction::OpacityDown, "BracketLeft".into()),
            (KeyAction::RecenterCamera, "KeyQ".into()),
        ]);

        let mut opts = Self {
            bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }
}
