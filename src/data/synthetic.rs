//! Procedural stand-in for the recorded data products.
//!
//! The real products are exported by an offline preprocessing pipeline and
//! decoded by an external collaborator. This source lets the viewer run
//! end-to-end without them: probes scattered over a cortical shell, a
//! stimulus-evoked response after the onset bin, sparse DCNN assignments
//! and predictiveness. Deterministic for a given seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::category::Category;
use super::source::{ArraySource, DataError, Dataset, RawArray};

/// Discrete moment at which the stimulus is shown (0 ms).
const ONSET_BIN: usize = 16;

/// Fraction of probes that respond to stimuli at all.
const RESPONSIVE_FRACTION: f64 = 0.45;

/// Fraction of probes mapped to a DCNN layer.
const MAPPED_FRACTION: f64 = 0.15;

/// Synthetic [`ArraySource`] for demos and integration tests.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    probes: usize,
    moments: usize,
    seed: u64,
    /// Whether to also produce the high-gamma band products.
    pub with_high_gamma: bool,
}

impl SyntheticSource {
    /// Source with the given probe count and the recording's 48 time bins.
    pub fn new(probes: usize, seed: u64) -> Self {
        Self {
            probes,
            moments: 48,
            seed,
            with_high_gamma: true,
        }
    }

    /// Deterministic per-dataset RNG so fetch order never matters.
    fn rng_for(&self, dataset: Dataset) -> StdRng {
        let salt = match dataset {
            Dataset::Positions => 0x706f73,
            Dataset::DcnnLayer => 0x64636e,
            Dataset::Predictive => 0x707264,
            Dataset::AggregateLfp => 0x616c66,
            Dataset::CategoryLfp => 0x636c66,
            Dataset::AggregateHighGamma => 0x616867,
            Dataset::CategoryHighGamma => 0x636867,
        };
        StdRng::seed_from_u64(self.seed ^ salt)
    }

    /// One probe's response trace: baseline noise, then an evoked bump
    /// decaying after the onset bin. `scale` sets the physiological range.
    fn trace(
        &self,
        rng: &mut StdRng,
        scale: f32,
        gain: f32,
        out: &mut Vec<f32>,
    ) {
        let responsive = rng.random_bool(RESPONSIVE_FRACTION);
        let amplitude = if responsive {
            gain * scale * rng.random_range(-0.8..0.8)
        } else {
            0.0
        };
        let peak = ONSET_BIN as f32 + rng.random_range(2.0..12.0);
        let width = rng.random_range(2.0..6.0);
        for t in 0..self.moments {
            let noise = gauss(rng) * scale * 0.04;
            let evoked = if t >= ONSET_BIN {
                let d = (t as f32 - peak) / width;
                amplitude * (-0.5 * d * d).exp()
            } else {
                0.0
            };
            // Keep samples inside the band's physiological window.
            out.push((noise + evoked).clamp(-scale, scale));
        }
    }

    fn positions(&self) -> RawArray {
        let mut rng = self.rng_for(Dataset::Positions);
        // MNI-ish cortical shell radii in millimeters.
        let radii = [68.0_f32, 84.0, 62.0];
        let mut data = Vec::with_capacity(self.probes * 3);
        for _ in 0..self.probes {
            let dir = random_unit(&mut rng);
            let depth: f32 = rng.random_range(0.55..1.0);
            for (d, r) in dir.iter().zip(radii) {
                data.push(d * r * depth);
            }
        }
        RawArray {
            data,
            shape: vec![self.probes, 3],
        }
    }

    fn dcnn_layer(&self) -> RawArray {
        let mut rng = self.rng_for(Dataset::DcnnLayer);
        let data = (0..self.probes)
            .map(|_| {
                if rng.random_bool(MAPPED_FRACTION) {
                    rng.random_range(0..9) as f32
                } else {
                    -1.0
                }
            })
            .collect();
        RawArray {
            data,
            shape: vec![self.probes],
        }
    }

    fn predictive(&self) -> RawArray {
        let mut rng = self.rng_for(Dataset::Predictive);
        let data = (0..self.probes * Category::COUNT)
            .map(|_| f32::from(rng.random_bool(0.06)))
            .collect();
        RawArray {
            data,
            shape: vec![self.probes, Category::COUNT],
        }
    }

    fn aggregate(&self, dataset: Dataset, scale: f32) -> RawArray {
        let mut rng = self.rng_for(dataset);
        let mut data = Vec::with_capacity(self.probes * self.moments);
        for _ in 0..self.probes {
            self.trace(&mut rng, scale, 1.0, &mut data);
        }
        RawArray {
            data,
            shape: vec![self.probes, self.moments],
        }
    }

    fn per_category(&self, dataset: Dataset, scale: f32) -> RawArray {
        let mut rng = self.rng_for(dataset);
        let mut data =
            Vec::with_capacity(Category::COUNT * self.probes * self.moments);
        for _ in 0..Category::COUNT {
            for _ in 0..self.probes {
                let gain = rng.random_range(0.2..1.6);
                self.trace(&mut rng, scale, gain, &mut data);
            }
        }
        RawArray {
            data,
            shape: vec![Category::COUNT, self.probes, self.moments],
        }
    }
}

impl ArraySource for SyntheticSource {
    fn fetch(&self, dataset: Dataset) -> Result<Option<RawArray>, DataError> {
        // LFP scale matches the (raw + 100) / 200 normalization window,
        // high gamma the (raw + 3) / 6 window.
        let raw = match dataset {
            Dataset::Positions => Some(self.positions()),
            Dataset::DcnnLayer => Some(self.dcnn_layer()),
            Dataset::Predictive => Some(self.predictive()),
            Dataset::AggregateLfp => Some(self.aggregate(dataset, 100.0)),
            Dataset::CategoryLfp => Some(self.per_category(dataset, 100.0)),
            Dataset::AggregateHighGamma => self
                .with_high_gamma
                .then(|| self.aggregate(dataset, 3.0)),
            Dataset::CategoryHighGamma => self
                .with_high_gamma
                .then(|| self.per_category(dataset, 3.0)),
        };
        Ok(raw)
    }
}

/// Standard normal sample via Box-Muller.
fn gauss(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.random_range(f32::EPSILON..1.0);
    let u2: f32 = rng.random_range(0.0..std::f32::consts::TAU);
    (-2.0 * u1.ln()).sqrt() * u2.cos()
}

/// Uniform direction on the unit sphere.
fn random_unit(rng: &mut StdRng) -> [f32; 3] {
    loop {
        let v = [
            rng.random_range(-1.0_f32..1.0),
            rng.random_range(-1.0_f32..1.0),
            rng.random_range(-1.0_f32..1.0),
        ];
        let len2 = v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
        if len2 > 1e-4 && len2 <= 1.0 {
            let inv = len2.sqrt().recip();
            return [v[0] * inv, v[1] * inv, v[2] * inv];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::ProbeData;

    #[test]
    fn deterministic_for_a_seed() {
        let a = SyntheticSource::new(32, 7);
        let b = SyntheticSource::new(32, 7);
        let ra = a.fetch(Dataset::AggregateLfp).unwrap().unwrap();
        let rb = b.fetch(Dataset::AggregateLfp).unwrap().unwrap();
        assert_eq!(ra.data, rb.data);
    }

    #[test]
    fn products_load_into_a_store() {
        let source = SyntheticSource::new(16, 3);
        let data = ProbeData::load(&source).unwrap();
        assert_eq!(data.probe_count(), 16);
        assert_eq!(data.max_moment(), 47);
    }

    #[test]
    fn lfp_values_stay_in_the_normalization_window() {
        let source = SyntheticSource::new(64, 5);
        let raw = source.fetch(Dataset::AggregateLfp).unwrap().unwrap();
        for &v in &raw.data {
            assert!(v.abs() <= 100.0, "lfp sample {v} out of range");
        }
    }

    #[test]
    fn high_gamma_can_be_withheld() {
        let mut source = SyntheticSource::new(8, 1);
        source.with_high_gamma = false;
        assert!(source
            .fetch(Dataset::AggregateHighGamma)
            .unwrap()
            .is_none());
        let data = ProbeData::load(&source).unwrap();
        assert!(data
            .responses(crate::settings::FrequencyBand::HighGamma)
            .aggregate
            .is_none());
    }
}
