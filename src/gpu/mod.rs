//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization and the depth buffer shared
//! by the probe and mesh render passes.

/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth buffer attachment shared by all render passes.
pub mod texture;

pub use render_context::{RenderContext, RenderContextError};
pub use texture::DepthTexture;
