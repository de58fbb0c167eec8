//! Decoded recording data: probe geometry, responses, exclusions.
//!
//! Everything here is static after the one-time load phase. The store owns
//! the raw arrays exclusively; the resolver only reads them.

mod category;
mod hidden;
mod loader;
mod source;
mod store;
mod synthetic;

pub use category::Category;
pub use hidden::{HiddenSet, HiddenSetParseError};
pub use loader::{DataLoader, LoadState};
pub use source::{ArraySource, DataError, Dataset, RawArray};
pub use store::{Grid2, Grid3, ProbeData, ResponseSet};
pub use synthetic::SyntheticSource;
