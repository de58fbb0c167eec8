//! The array-decoder seam.
//!
//! The viewer does not parse any on-disk array format itself. A
//! [`ArraySource`] hands over each named dataset as a flat `f32` buffer plus
//! its shape; [`ProbeData`](super::store::ProbeData) validates and reshapes.

use std::fmt;

/// Named datasets the store consumes.
///
/// `N` probes × `M` moments × `C` categories; expected shapes are listed per
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Probe implantation sites in MNI millimeter space, `N×3`. Required.
    Positions,
    /// DCNN layer assignment per probe (`-1` = unmapped), `N`.
    DcnnLayer,
    /// Per-probe predictiveness flags per category, `N×C`.
    Predictive,
    /// Aggregate LFP responses across all categories, `N×M`.
    AggregateLfp,
    /// Per-category LFP responses, `C×N×M`.
    CategoryLfp,
    /// Aggregate high-gamma responses, `N×M`.
    AggregateHighGamma,
    /// Per-category high-gamma responses, `C×N×M`.
    CategoryHighGamma,
}

impl Dataset {
    /// Stable dataset name (matches the original data product file stems).
    pub fn name(self) -> &'static str {
        match self {
            Self::Positions => "mni_coordinates",
            Self::DcnnLayer => "dcnn_layer",
            Self::Predictive => "predictive",
            Self::AggregateLfp => "neural_responses_all_lfp",
            Self::CategoryLfp => "neural_responses_ctg_lfp",
            Self::AggregateHighGamma => "neural_responses_all_frq",
            Self::CategoryHighGamma => "neural_responses_ctg_frq",
        }
    }
}

/// A decoded array: flat row-major values plus the dimensions to interpret
/// them with.
#[derive(Debug, Clone)]
pub struct RawArray {
    /// Row-major values.
    pub data: Vec<f32>,
    /// Dimensions, outermost first.
    pub shape: Vec<usize>,
}

impl RawArray {
    /// Number of elements implied by the shape.
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Errors surfaced by array sources and store construction.
#[derive(Debug)]
pub enum DataError {
    /// The decoder failed to produce the dataset.
    Decode {
        /// Which dataset failed.
        dataset: &'static str,
        /// Decoder-reported reason.
        reason: String,
    },
    /// A required dataset was never supplied.
    MissingDataset(&'static str),
    /// A dataset's shape disagrees with the others or with its contract.
    Shape {
        /// Which dataset had the bad shape.
        dataset: &'static str,
        /// What the store expected.
        expected: String,
        /// What the source delivered.
        got: Vec<usize>,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { dataset, reason } => {
                write!(f, "failed to decode dataset {dataset}: {reason}")
            }
            Self::MissingDataset(dataset) => {
                write!(f, "required dataset {dataset} was not supplied")
            }
            Self::Shape {
                dataset,
                expected,
                got,
            } => write!(
                f,
                "dataset {dataset} has shape {got:?}, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for DataError {}

/// Supplies decoded arrays for named datasets.
///
/// `Ok(None)` means the dataset was never produced (an optional data
/// product, e.g. one frequency band) — distinct from a decode failure.
pub trait ArraySource {
    /// Fetch one dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Decode`] when the underlying decoder fails.
    fn fetch(&self, dataset: Dataset) -> Result<Option<RawArray>, DataError>;
}
