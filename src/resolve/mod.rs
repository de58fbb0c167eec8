//! The attribute resolver — raw response arrays in, renderable point
//! attributes out.
//!
//! `resolve` is a pure function of the data store, a settings snapshot,
//! and the output buffer. It allocates nothing, writes every slot it
//! touches exactly once per pass, and produces bit-identical output for
//! identical inputs, so it can run both on discrete settings changes and
//! on every animation frame.

mod attributes;
mod palette;

use std::fmt;

pub use attributes::{DirtyFields, PointAttributes};
pub use palette::{
    dcnn_color, diverging_color, intensity_curve, DCNN_LAYER_COUNT,
    DCNN_PALETTE,
};

use crate::data::{HiddenSet, ProbeData};
use crate::settings::{ColorMode, DisplaySettings, FrequencyBand};

/// Resolver fault: the pass was skipped and the buffer left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The response product the settings select was never loaded.
    DataUnavailable {
        /// The band whose data is missing.
        band: FrequencyBand,
        /// Whether the per-category product (vs. aggregate) was needed.
        per_category: bool,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUnavailable { band, per_category } => write!(
                f,
                "no {} {:?} responses loaded; keeping previous attributes",
                if *per_category { "per-category" } else { "aggregate" },
                band,
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Normalize a raw sample into a unit-ish range for its band.
fn normalize(raw: f32, band: FrequencyBand) -> f32 {
    match band {
        // Baseline-subtracted voltages live in roughly ±100 µV.
        FrequencyBand::Lfp => (raw + 100.0) / 200.0,
        // Log power ratios live in roughly ±3.
        FrequencyBand::HighGamma => (raw + 3.0) / 6.0,
    }
}

/// The two discrete samples bracketing a fractional moment.
struct Sampling {
    cur: usize,
    next: usize,
    frac: f32,
}

fn sampling(moment: f32, max_moment: usize) -> Sampling {
    let clamped = moment.clamp(0.0, max_moment as f32);
    let cur = clamped.floor() as usize;
    Sampling {
        cur,
        next: (cur + 1).min(max_moment),
        frac: clamped - cur as f32,
    }
}

/// Write renderable attributes for every probe under the given settings.
///
/// Probes in the hidden set are never touched — their slots stay in the
/// allocated-hidden state. The pass either completes for all probes or
/// (when the selected response product is absent) performs no writes at
/// all.
///
/// # Errors
///
/// Returns [`ResolveError::DataUnavailable`] without writing anything when
/// the settings select a response product the store does not hold.
pub fn resolve(
    data: &ProbeData,
    hidden_set: &HiddenSet,
    settings: &DisplaySettings,
    max_point_size: f32,
    out: &mut PointAttributes,
) -> Result<(), ResolveError> {
    let responses = data.responses(settings.band);
    let category = settings.active_category();

    // Availability is checked up front: a half-written buffer must never
    // be observable.
    enum Product<'a> {
        Aggregate(&'a crate::data::Grid2),
        PerCategory(&'a crate::data::Grid3, usize),
    }
    let product = match category {
        Some(cat) => responses
            .per_category
            .as_ref()
            .map(|g| Product::PerCategory(g, cat.index()))
            .ok_or(ResolveError::DataUnavailable {
                band: settings.band,
                per_category: true,
            })?,
        None => responses.aggregate.as_ref().map(Product::Aggregate).ok_or(
            ResolveError::DataUnavailable {
                band: settings.band,
                per_category: false,
            },
        )?,
    };

    let s = sampling(settings.moment, data.max_moment());
    let dcnn_mode = settings.color_mode == ColorMode::DcnnLayer;
    let predictive_gate = settings.predictive_only && category.is_some();

    for probe in 0..data.probe_count() {
        // Permanently excluded: treated as absent, slot never written.
        if hidden_set.contains(probe) {
            continue;
        }

        let tag = data.dcnn_layer(probe);
        if dcnn_mode && tag == -1 {
            out.write_hidden(probe);
            continue;
        }

        if predictive_gate {
            // `category` is Some by construction of the gate.
            let predictive = category
                .is_some_and(|cat| data.is_predictive(probe, cat));
            if !predictive {
                out.write_hidden(probe);
                continue;
            }
        }

        let (raw_cur, raw_next) = match product {
            Product::Aggregate(grid) => {
                (grid.at(probe, s.cur), grid.at(probe, s.next))
            }
            Product::PerCategory(grid, cat) => {
                (grid.at(cat, probe, s.cur), grid.at(cat, probe, s.next))
            }
        };

        let value_cur = normalize(raw_cur, settings.band);
        let value_next = normalize(raw_next, settings.band);
        // Interpolate in normalized-value space, then evaluate the color
        // and size curves on the blended value.
        let value = value_cur + (value_next - value_cur) * s.frac;

        let (color, out_tag) = if dcnn_mode {
            (dcnn_color(tag), tag)
        } else {
            (diverging_color(2.0 * value - 1.0), -1)
        };
        let size = intensity_curve(value, max_point_size);

        out.write_visible(probe, color, size, out_tag);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        ArraySource, Category, DataError, Dataset, RawArray,
    };
    use crate::settings::SettingsAction;

    const MAX_POINT_SIZE: f32 = 25.0;

    /// Fixture source: 4 probes, 48 moments, full LFP products, no
    /// high-gamma.
    ///
    /// Probe layout: 0 = plain, 1 = DCNN layer 3, 2 = predictive of Faces,
    /// 3 = plain (used as the hidden-set member in tests).
    struct Fixture;

    const PROBES: usize = 4;
    const MOMENTS: usize = 48;

    fn aggregate_raw(probe: usize, moment: usize) -> f32 {
        match (probe, moment) {
            // The §46.5 interpolation scenario.
            (0, 46) => -20.0,
            (0, 47) => 0.0,
            // A step between bins 1 and 2 for continuity checks.
            (0, 1) => 40.0,
            (0, 2) => -60.0,
            _ => (probe as f32) * 10.0 - 15.0,
        }
    }

    impl ArraySource for Fixture {
        fn fetch(
            &self,
            dataset: Dataset,
        ) -> Result<Option<RawArray>, DataError> {
            let raw = match dataset {
                Dataset::Positions => Some(RawArray {
                    data: (0..PROBES * 3).map(|v| v as f32).collect(),
                    shape: vec![PROBES, 3],
                }),
                Dataset::DcnnLayer => Some(RawArray {
                    data: vec![-1.0, 3.0, -1.0, -1.0],
                    shape: vec![PROBES],
                }),
                Dataset::Predictive => {
                    let mut data = vec![0.0; PROBES * Category::COUNT];
                    data[2 * Category::COUNT + Category::Faces.index()] =
                        1.0;
                    Some(RawArray {
                        data,
                        shape: vec![PROBES, Category::COUNT],
                    })
                }
                Dataset::AggregateLfp => {
                    let mut data = Vec::new();
                    for p in 0..PROBES {
                        for m in 0..MOMENTS {
                            data.push(aggregate_raw(p, m));
                        }
                    }
                    Some(RawArray {
                        data,
                        shape: vec![PROBES, MOMENTS],
                    })
                }
                Dataset::CategoryLfp => Some(RawArray {
                    data: vec![30.0; Category::COUNT * PROBES * MOMENTS],
                    shape: vec![Category::COUNT, PROBES, MOMENTS],
                }),
                Dataset::AggregateHighGamma
                | Dataset::CategoryHighGamma => None,
            };
            Ok(raw)
        }
    }

    fn fixture() -> (ProbeData, HiddenSet, PointAttributes) {
        let data = ProbeData::load(&Fixture).unwrap();
        let hidden: HiddenSet = [3_usize].into_iter().collect();
        let attrs = PointAttributes::new(data.positions());
        (data, hidden, attrs)
    }

    fn snapshot(attrs: &PointAttributes) -> (Vec<[f32; 3]>, Vec<f32>, Vec<f32>, Vec<i32>) {
        (
            attrs.colors().to_vec(),
            attrs.sizes().to_vec(),
            attrs.hidden_flags().to_vec(),
            attrs.dcnn_tags().to_vec(),
        )
    }

    #[test]
    fn hidden_set_probes_are_never_written() {
        let (data, hidden, mut attrs) = fixture();
        let settings = DisplaySettings::default();
        resolve(&data, &hidden, &settings, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        assert!(attrs.is_hidden(3));
        assert_eq!(attrs.colors()[3], [0.0; 3]);
        assert_eq!(attrs.sizes()[3], 0.0);
        assert!(!attrs.is_hidden(0));
    }

    #[test]
    fn dcnn_mode_hides_unmapped_probes() {
        let (data, hidden, mut attrs) = fixture();
        let settings = DisplaySettings::default()
            .apply(SettingsAction::ToggleColorMode);
        resolve(&data, &hidden, &settings, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        assert!(attrs.is_hidden(0));
        assert!(attrs.is_hidden(2));
        assert!(!attrs.is_hidden(1));
    }

    #[test]
    fn dcnn_color_is_the_palette_entry_regardless_of_moment() {
        let (data, hidden, mut attrs) = fixture();
        let mut settings = DisplaySettings::default()
            .apply(SettingsAction::ToggleColorMode);
        for moment in [0.0, 21.5, 47.0] {
            settings.moment = moment;
            resolve(&data, &hidden, &settings, MAX_POINT_SIZE, &mut attrs)
                .unwrap();
            assert_eq!(attrs.colors()[1], DCNN_PALETTE[3]);
            assert_eq!(attrs.dcnn_tags()[1], 3);
        }
    }

    #[test]
    fn predictive_filter_hides_nonpredictive_probes() {
        let (data, hidden, mut attrs) = fixture();
        let settings = DisplaySettings {
            category_filter: true,
            category: Some(Category::Faces),
            predictive_only: true,
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &settings, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        // Probe 1 has a DCNN tag and is not in the hidden set, but is not
        // predictive of Faces.
        assert!(attrs.is_hidden(1));
        assert!(!attrs.is_hidden(2));
    }

    #[test]
    fn fractional_moment_interpolates_in_value_space() {
        let (data, hidden, mut attrs) = fixture();
        let settings = DisplaySettings {
            moment: 46.5,
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &settings, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        // raw -20 → 0.4, raw 0 → 0.5, blended 0.45.
        let expected = MAX_POINT_SIZE * 0.1_f32.powf(1.5);
        assert!(
            (attrs.sizes()[0] - expected).abs() < 1e-4,
            "size {} != {expected}",
            attrs.sizes()[0]
        );
        assert_eq!(attrs.colors()[0], diverging_color(-0.1));
    }

    #[test]
    fn integer_moments_match_the_discrete_computation() {
        let (data, hidden, mut attrs) = fixture();
        let discrete = DisplaySettings {
            moment: 1.0,
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &discrete, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        let at_one = snapshot(&attrs);

        // A vanishing fraction must converge to the discrete values even
        // though the next sample (raw -60 vs 40) is far away.
        let nudged = DisplaySettings {
            moment: 1.0 + 1e-6,
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &nudged, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        let near_one = snapshot(&attrs);
        for (a, b) in at_one.1.iter().zip(&near_one.1) {
            assert!((a - b).abs() < 1e-3);
        }
        for (a, b) in at_one.0.iter().zip(&near_one.0) {
            for (ca, cb) in a.iter().zip(b) {
                assert!((ca - cb).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn resolver_is_idempotent() {
        let (data, hidden, mut attrs) = fixture();
        let settings = DisplaySettings {
            moment: 12.25,
            category_filter: true,
            category: Some(Category::Animals),
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &settings, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        let first = snapshot(&attrs);
        resolve(&data, &hidden, &settings, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        assert_eq!(snapshot(&attrs), first);
    }

    #[test]
    fn missing_band_skips_the_pass_and_preserves_attributes() {
        let (data, hidden, mut attrs) = fixture();
        resolve(
            &data,
            &hidden,
            &DisplaySettings::default(),
            MAX_POINT_SIZE,
            &mut attrs,
        )
        .unwrap();
        let before = snapshot(&attrs);

        let hg = DisplaySettings::default().apply(SettingsAction::ToggleBand);
        let err = resolve(&data, &hidden, &hg, MAX_POINT_SIZE, &mut attrs)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::DataUnavailable {
                band: FrequencyBand::HighGamma,
                per_category: false,
            }
        );
        assert_eq!(snapshot(&attrs), before);
    }

    #[test]
    fn filter_without_selection_falls_back_to_aggregate() {
        let (data, hidden, mut attrs) = fixture();
        let settings = DisplaySettings {
            category_filter: true,
            category: None,
            moment: 5.0,
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &settings, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        let filtered = snapshot(&attrs);

        let aggregate = DisplaySettings {
            moment: 5.0,
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &aggregate, MAX_POINT_SIZE, &mut attrs)
            .unwrap();
        assert_eq!(snapshot(&attrs), filtered);
    }

    #[test]
    fn out_of_range_moments_clamp() {
        let (data, hidden, mut attrs) = fixture();
        let over = DisplaySettings {
            moment: 500.0,
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &over, MAX_POINT_SIZE, &mut attrs).unwrap();
        let clamped = snapshot(&attrs);
        let last = DisplaySettings {
            moment: 47.0,
            ..DisplaySettings::default()
        };
        resolve(&data, &hidden, &last, MAX_POINT_SIZE, &mut attrs).unwrap();
        assert_eq!(snapshot(&attrs), clamped);
    }
}
