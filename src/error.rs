//! Crate-level error types.

use std::fmt;

use crate::data::DataError;
use crate::gpu::render_context::RenderContextError;

/// Errors produced by the cerebra crate.
#[derive(Debug)]
pub enum CerebraError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to load the probe recording arrays.
    DataLoad(DataError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for CerebraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::DataLoad(e) => write!(f, "data load error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for CerebraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::DataLoad(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) | Self::Viewer(_) => None,
        }
    }
}

impl From<RenderContextError> for CerebraError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<DataError> for CerebraError {
    fn from(e: DataError) -> Self {
        Self::DataLoad(e)
    }
}

impl From<std::io::Error> for CerebraError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
