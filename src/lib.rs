// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU-accelerated visualization of time-varying intracranial probe
//! recordings over a 3D brain mesh, built on wgpu.
//!
//! The engine animates a point cloud of electrode responses through the
//! recording timeline: each probe is colored and sized from its response
//! at the current (possibly fractional) moment, under a settings snapshot
//! selecting the stimulus category, frequency band, and coloring mode.
//!
//! # Key entry points
//!
//! - [`engine::BrainRenderEngine`] - the main rendering engine
//! - [`data::ProbeData`] - the loaded response arrays
//! - [`resolve::resolve`] - the pure attribute resolver
//! - [`playback::PlaybackClock`] - scrubbing and playback state
//! - [`options::Options`] - runtime configuration
//!
//! # Architecture
//!
//! A background [`data::DataLoader`] thread decodes the response arrays
//! while GPU setup proceeds. Each frame the engine ticks the clock,
//! applies queued [`settings::SettingsAction`]s as one batch, re-resolves
//! the per-probe attributes if anything changed, and uploads only the
//! attribute fields the pass marked dirty.

pub mod camera;
pub mod data;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod lighting;
pub mod options;
pub mod playback;
pub mod renderer;
pub mod resolve;
pub mod settings;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::CerebraError;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
