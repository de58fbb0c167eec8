use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Probe cloud and brain mesh display parameters.
pub struct DisplayOptions {
    /// Maximum probe billboard size in world units per unit intensity.
    pub max_point_size: f32,
    /// Brain mesh opacity, clamped to [0, 1] on use.
    pub brain_opacity: f32,
    /// Step applied by the opacity-up/down key actions.
    pub opacity_step: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_point_size: 25.0,
            brain_opacity: 0.4,
            opacity_step: 0.05,
        }
    }
}
