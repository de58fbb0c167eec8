use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Playback clock parameters.
pub struct PlaybackOptions {
    /// Wall-clock milliseconds a full sweep of the recording takes.
    pub total_playback_ms: f32,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            total_playback_ms: 20_000.0,
        }
    }
}
