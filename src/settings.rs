//! Display settings snapshot and the reducer that advances it.
//!
//! The resolver never sees settings mid-mutation: UI callbacks queue
//! [`SettingsAction`] values, and the engine folds them into the *next*
//! snapshot between frames with [`DisplaySettings::apply`].

use serde::{Deserialize, Serialize};

use crate::data::Category;

/// How probe points are colored.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Diverging gradient keyed by the change of activity against baseline
    /// (decrease blue, increase red).
    #[default]
    ActivityChange,
    /// Categorical palette keyed by the probe's DCNN layer assignment;
    /// unmapped probes are hidden.
    DcnnLayer,
}

/// Which response modality drives color and size.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBand {
    /// Baseline-subtracted local field potential voltage.
    #[default]
    Lfp,
    /// Log signal/baseline high-gamma band power.
    HighGamma,
}

/// One immutable configuration snapshot selecting the active data slice
/// and coloring mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Whether responses are sliced by a single stimulus category.
    pub category_filter: bool,
    /// The selected category; `None` falls back to aggregate responses
    /// even when the filter is on.
    pub category: Option<Category>,
    /// Show only probes predictive of the selected category.
    pub predictive_only: bool,
    /// Active coloring mode.
    pub color_mode: ColorMode,
    /// Active frequency band.
    pub band: FrequencyBand,
    /// Current (possibly fractional) moment on the recording timeline.
    pub moment: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            category_filter: false,
            category: None,
            predictive_only: false,
            color_mode: ColorMode::default(),
            band: FrequencyBand::default(),
            moment: 0.0,
        }
    }
}

/// A discrete settings mutation produced by a UI callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsAction {
    /// Toggle slicing responses by category.
    ToggleCategoryFilter,
    /// Select a category, or deselect it if already active.
    SelectCategory(Category),
    /// Toggle the predictive-probes-only filter.
    TogglePredictiveOnly,
    /// Flip between activity-change and DCNN-layer coloring.
    ToggleColorMode,
    /// Flip between LFP and high-gamma responses.
    ToggleBand,
    /// Jump the timeline (clamped to the valid range by the clock).
    SetMoment(f32),
}

impl DisplaySettings {
    /// Fold one action into the next snapshot. Pure: the previous snapshot
    /// is consumed, nothing resolver-visible mutates in place.
    #[must_use]
    pub fn apply(mut self, action: SettingsAction) -> Self {
        match action {
            SettingsAction::ToggleCategoryFilter => {
                self.category_filter = !self.category_filter;
            }
            SettingsAction::SelectCategory(cat) => {
                // Clicking the active category deselects it.
                self.category = if self.category == Some(cat) {
                    None
                } else {
                    Some(cat)
                };
            }
            SettingsAction::TogglePredictiveOnly => {
                self.predictive_only = !self.predictive_only;
            }
            SettingsAction::ToggleColorMode => {
                self.color_mode = match self.color_mode {
                    ColorMode::ActivityChange => ColorMode::DcnnLayer,
                    ColorMode::DcnnLayer => ColorMode::ActivityChange,
                };
            }
            SettingsAction::ToggleBand => {
                self.band = match self.band {
                    FrequencyBand::Lfp => FrequencyBand::HighGamma,
                    FrequencyBand::HighGamma => FrequencyBand::Lfp,
                };
            }
            SettingsAction::SetMoment(moment) => {
                self.moment = moment.max(0.0);
            }
        }
        self
    }

    /// The category slice in effect, honoring the aggregate fallback:
    /// per-category data is only used when the filter is on *and* a
    /// category is selected.
    pub fn active_category(&self) -> Option<Category> {
        if self.category_filter {
            self.category
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reducer_leaves_the_source_snapshot_alone() {
        let base = DisplaySettings::default();
        let next = base.apply(SettingsAction::ToggleCategoryFilter);
        assert!(next.category_filter);
        assert!(!DisplaySettings::default().category_filter);
    }

    #[test]
    fn selecting_the_active_category_deselects() {
        let s = DisplaySettings::default()
            .apply(SettingsAction::SelectCategory(Category::Faces));
        assert_eq!(s.category, Some(Category::Faces));
        let s = s.apply(SettingsAction::SelectCategory(Category::Faces));
        assert_eq!(s.category, None);
    }

    #[test]
    fn aggregate_fallback_without_selection() {
        let mut s = DisplaySettings::default();
        s.category_filter = true;
        assert_eq!(s.active_category(), None);
        s.category = Some(Category::Tools);
        assert_eq!(s.active_category(), Some(Category::Tools));
        s.category_filter = false;
        assert_eq!(s.active_category(), None);
    }

    #[test]
    fn toggles_are_involutions() {
        let base = DisplaySettings::default();
        for action in [
            SettingsAction::ToggleCategoryFilter,
            SettingsAction::TogglePredictiveOnly,
            SettingsAction::ToggleColorMode,
            SettingsAction::ToggleBand,
        ] {
            assert_eq!(base.apply(action).apply(action), base);
        }
    }

    #[test]
    fn set_moment_never_goes_negative() {
        let s = DisplaySettings::default()
            .apply(SettingsAction::SetMoment(-3.0));
        assert_eq!(s.moment, 0.0);
    }
}
