//! GPU renderers for the probe cloud and the brain surface.

/// Translucent brain surface renderer.
pub mod brain_mesh;
/// Triangle mesh container and procedural demo geometry.
pub mod mesh;
/// Instanced billboard renderer for the probe point cloud.
pub mod points;

pub use brain_mesh::BrainMeshRenderer;
pub use mesh::MeshData;
pub use points::ProbePointRenderer;
