//! Decoded, reshaped probe data — static after load.

use glam::Vec3;

use super::category::Category;
use super::source::{ArraySource, DataError, Dataset, RawArray};
use crate::settings::FrequencyBand;

/// A flat row-major `rows × cols` array of `f32`.
#[derive(Debug, Clone)]
pub struct Grid2 {
    data: Vec<f32>,
    cols: usize,
}

impl Grid2 {
    fn from_raw(
        raw: RawArray,
        dataset: &'static str,
        rows: usize,
        cols: usize,
    ) -> Result<Self, DataError> {
        if raw.shape != [rows, cols] || raw.data.len() != rows * cols {
            return Err(DataError::Shape {
                dataset,
                expected: format!("[{rows}, {cols}]"),
                got: raw.shape,
            });
        }
        Ok(Self {
            data: raw.data,
            cols,
        })
    }

    /// Value at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }
}

/// A flat row-major `planes × rows × cols` array of `f32`.
#[derive(Debug, Clone)]
pub struct Grid3 {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Grid3 {
    fn from_raw(
        raw: RawArray,
        dataset: &'static str,
        planes: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Self, DataError> {
        if raw.shape != [planes, rows, cols]
            || raw.data.len() != planes * rows * cols
        {
            return Err(DataError::Shape {
                dataset,
                expected: format!("[{planes}, {rows}, {cols}]"),
                got: raw.shape,
            });
        }
        Ok(Self {
            data: raw.data,
            rows,
            cols,
        })
    }

    /// Value at `(plane, row, col)`.
    pub fn at(&self, plane: usize, row: usize, col: usize) -> f32 {
        self.data[(plane * self.rows + row) * self.cols + col]
    }
}

/// Response data products for one frequency band. Either product may be
/// absent — the recording pipeline ships them independently.
#[derive(Debug, Clone, Default)]
pub struct ResponseSet {
    /// Responses averaged across all categories, `N×M`.
    pub aggregate: Option<Grid2>,
    /// Responses averaged within each category, `C×N×M`.
    pub per_category: Option<Grid3>,
}

/// Decoded probe data: positions, DCNN assignments, predictiveness, and
/// per-band response banks. Owned exclusively by the store; the resolver
/// only reads.
#[derive(Debug, Clone)]
pub struct ProbeData {
    positions: Vec<Vec3>,
    dcnn_layer: Vec<i32>,
    predictive: Vec<bool>,
    lfp: ResponseSet,
    high_gamma: ResponseSet,
    moments: usize,
}

/// Record or verify the shared moment-axis length.
fn check_moments(
    dataset: &'static str,
    shape: &[usize],
    m: usize,
    moments: &mut Option<usize>,
) -> Result<(), DataError> {
    match *moments {
        Some(known) if known != m => Err(DataError::Shape {
            dataset,
            expected: format!("last dimension {known}"),
            got: shape.to_vec(),
        }),
        _ => {
            *moments = Some(m);
            Ok(())
        }
    }
}

/// Fetch an optional `N×M` aggregate response product.
fn load_aggregate(
    source: &dyn ArraySource,
    dataset: Dataset,
    probes: usize,
    moments: &mut Option<usize>,
) -> Result<Option<Grid2>, DataError> {
    let Some(raw) = source.fetch(dataset)? else {
        return Ok(None);
    };
    if raw.shape.len() != 2 || raw.shape[0] != probes {
        return Err(DataError::Shape {
            dataset: dataset.name(),
            expected: format!("[{probes}, M]"),
            got: raw.shape,
        });
    }
    let m = raw.shape[1];
    check_moments(dataset.name(), &raw.shape, m, moments)?;
    Grid2::from_raw(raw, dataset.name(), probes, m).map(Some)
}

/// Fetch an optional `C×N×M` per-category response product.
fn load_per_category(
    source: &dyn ArraySource,
    dataset: Dataset,
    probes: usize,
    moments: &mut Option<usize>,
) -> Result<Option<Grid3>, DataError> {
    let Some(raw) = source.fetch(dataset)? else {
        return Ok(None);
    };
    if raw.shape.len() != 3
        || raw.shape[0] != Category::COUNT
        || raw.shape[1] != probes
    {
        return Err(DataError::Shape {
            dataset: dataset.name(),
            expected: format!("[{}, {probes}, M]", Category::COUNT),
            got: raw.shape,
        });
    }
    let m = raw.shape[2];
    check_moments(dataset.name(), &raw.shape, m, moments)?;
    Grid3::from_raw(raw, dataset.name(), Category::COUNT, probes, m).map(Some)
}

/// Map an MNI-space millimeter coordinate into scene space.
///
/// The recording convention and the render convention disagree on axes;
/// this matches the transform the meshes are authored against.
fn mni_to_scene(mni: [f32; 3]) -> Vec3 {
    Vec3::new(-mni[0], mni[2], -mni[1])
}

impl ProbeData {
    /// Fetch and reshape every dataset from the given source.
    ///
    /// Positions are required; everything else degrades to "absent" and is
    /// handled (hide / skip / fall back) at resolve time.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] when a decode fails, the positions dataset is
    /// missing, or any supplied dataset has an inconsistent shape.
    pub fn load(source: &dyn ArraySource) -> Result<Self, DataError> {
        let positions_raw = source
            .fetch(Dataset::Positions)?
            .ok_or(DataError::MissingDataset(Dataset::Positions.name()))?;
        if positions_raw.shape.len() != 2 || positions_raw.shape[1] != 3 {
            return Err(DataError::Shape {
                dataset: Dataset::Positions.name(),
                expected: "[N, 3]".to_owned(),
                got: positions_raw.shape,
            });
        }
        let probes = positions_raw.shape[0];
        let positions: Vec<Vec3> = positions_raw
            .data
            .chunks_exact(3)
            .map(|c| mni_to_scene([c[0], c[1], c[2]]))
            .collect();

        let dcnn_layer = match source.fetch(Dataset::DcnnLayer)? {
            Some(raw) => {
                if raw.shape != [probes] {
                    return Err(DataError::Shape {
                        dataset: Dataset::DcnnLayer.name(),
                        expected: format!("[{probes}]"),
                        got: raw.shape,
                    });
                }
                raw.data.iter().map(|&v| v as i32).collect()
            }
            // No DCNN product: every probe is unmapped.
            None => vec![-1; probes],
        };

        let predictive = match source.fetch(Dataset::Predictive)? {
            Some(raw) => {
                let grid = Grid2::from_raw(
                    raw,
                    Dataset::Predictive.name(),
                    probes,
                    Category::COUNT,
                )?;
                grid.data.iter().map(|&v| v != 0.0).collect()
            }
            None => vec![false; probes * Category::COUNT],
        };

        // The moment axis length must agree across every response product.
        let mut moments: Option<usize> = None;

        let agg_lfp =
            load_aggregate(source, Dataset::AggregateLfp, probes, &mut moments)?;
        let agg_hg = load_aggregate(
            source,
            Dataset::AggregateHighGamma,
            probes,
            &mut moments,
        )?;
        let ctg_lfp = load_per_category(
            source,
            Dataset::CategoryLfp,
            probes,
            &mut moments,
        )?;
        let ctg_hg = load_per_category(
            source,
            Dataset::CategoryHighGamma,
            probes,
            &mut moments,
        )?;

        let moments =
            moments.ok_or(DataError::MissingDataset("neural responses"))?;

        log::info!(
            "probe data loaded: {probes} probes, {moments} moments, \
             lfp agg/ctg {}/{}, high-gamma agg/ctg {}/{}",
            agg_lfp.is_some(),
            ctg_lfp.is_some(),
            agg_hg.is_some(),
            ctg_hg.is_some()
        );

        Ok(Self {
            positions,
            dcnn_layer,
            predictive,
            lfp: ResponseSet {
                aggregate: agg_lfp,
                per_category: ctg_lfp,
            },
            high_gamma: ResponseSet {
                aggregate: agg_hg,
                per_category: ctg_hg,
            },
            moments,
        })
    }

    /// Number of probes `N`.
    pub fn probe_count(&self) -> usize {
        self.positions.len()
    }

    /// Last valid discrete moment index (`M - 1`).
    pub fn max_moment(&self) -> usize {
        self.moments - 1
    }

    /// Scene-space probe positions. Never change after load.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// DCNN layer assignment for a probe (`-1` = unmapped).
    pub fn dcnn_layer(&self, probe: usize) -> i32 {
        self.dcnn_layer[probe]
    }

    /// Whether a probe is predictive of the given category.
    pub fn is_predictive(&self, probe: usize, category: Category) -> bool {
        self.predictive[probe * Category::COUNT + category.index()]
    }

    /// Response bank for a frequency band.
    pub fn responses(&self, band: FrequencyBand) -> &ResponseSet {
        match band {
            FrequencyBand::Lfp => &self.lfp,
            FrequencyBand::HighGamma => &self.high_gamma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-memory source for store tests.
    struct MapSource(Vec<(Dataset, RawArray)>);

    impl ArraySource for MapSource {
        fn fetch(
            &self,
            dataset: Dataset,
        ) -> Result<Option<RawArray>, DataError> {
            Ok(self
                .0
                .iter()
                .find(|(d, _)| *d == dataset)
                .map(|(_, raw)| raw.clone()))
        }
    }

    fn positions_raw(n: usize) -> RawArray {
        RawArray {
            data: vec![1.0; n * 3],
            shape: vec![n, 3],
        }
    }

    #[test]
    fn loads_minimal_products() {
        let source = MapSource(vec![
            (Dataset::Positions, positions_raw(4)),
            (
                Dataset::AggregateLfp,
                RawArray {
                    data: (0..4 * 6).map(|v| v as f32).collect(),
                    shape: vec![4, 6],
                },
            ),
        ]);
        let data = ProbeData::load(&source).unwrap();
        assert_eq!(data.probe_count(), 4);
        assert_eq!(data.max_moment(), 5);
        assert_eq!(data.dcnn_layer(0), -1);
        assert!(!data.is_predictive(0, Category::Faces));
        let agg = data
            .responses(FrequencyBand::Lfp)
            .aggregate
            .as_ref()
            .unwrap();
        assert_eq!(agg.at(2, 3), (2 * 6 + 3) as f32);
        assert!(data.responses(FrequencyBand::HighGamma).aggregate.is_none());
    }

    #[test]
    fn missing_positions_is_an_error() {
        let source = MapSource(vec![]);
        assert!(matches!(
            ProbeData::load(&source),
            Err(DataError::MissingDataset(_))
        ));
    }

    #[test]
    fn rejects_inconsistent_moment_axes() {
        let source = MapSource(vec![
            (Dataset::Positions, positions_raw(2)),
            (
                Dataset::AggregateLfp,
                RawArray {
                    data: vec![0.0; 2 * 6],
                    shape: vec![2, 6],
                },
            ),
            (
                Dataset::CategoryLfp,
                RawArray {
                    data: vec![0.0; 8 * 2 * 5],
                    shape: vec![8, 2, 5],
                },
            ),
        ]);
        assert!(matches!(
            ProbeData::load(&source),
            Err(DataError::Shape { .. })
        ));
    }

    #[test]
    fn scene_transform_flips_axes() {
        let v = mni_to_scene([10.0, 20.0, 30.0]);
        assert_eq!(v, Vec3::new(-10.0, 30.0, -20.0));
    }
}
