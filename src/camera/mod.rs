//! Camera system for 3D scene viewing.
//!
//! Provides an orbital camera with rotation, panning, and zoom.

/// Orbital camera controller managing rotation, pan, zoom, and GPU resources.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;

pub use controller::CameraController;
pub use core::{Camera, CameraUniform};
