//! Probes permanently excluded from rendering.
//!
//! The exclusion list is quality-control output from the recording
//! pipeline, shipped as a plain data asset rather than code.

use std::fmt;

use rustc_hash::FxHashSet;

/// The built-in exclusion list asset.
const BUILTIN: &str = include_str!("../../assets/hidden_probes.txt");

/// Error parsing a hidden-probe list.
#[derive(Debug)]
pub struct HiddenSetParseError {
    line: usize,
    token: String,
}

impl fmt::Display for HiddenSetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hidden probe list line {}: {:?} is not a probe index",
            self.line, self.token
        )
    }
}

impl std::error::Error for HiddenSetParseError {}

/// A fixed set of probe indices excluded from all rendering. Computed once
/// at load time, immutable thereafter.
#[derive(Debug, Clone, Default)]
pub struct HiddenSet {
    indices: FxHashSet<usize>,
}

impl HiddenSet {
    /// Parse a list: one index per line, `#` comments and blank lines
    /// allowed.
    ///
    /// # Errors
    ///
    /// Returns [`HiddenSetParseError`] on the first non-numeric token.
    pub fn parse(text: &str) -> Result<Self, HiddenSetParseError> {
        let mut indices = FxHashSet::default();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let index: usize =
                line.parse().map_err(|_| HiddenSetParseError {
                    line: lineno + 1,
                    token: line.to_owned(),
                })?;
            let _ = indices.insert(index);
        }
        Ok(Self { indices })
    }

    /// The exclusion list shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`HiddenSetParseError`] if the bundled asset is malformed.
    pub fn builtin() -> Result<Self, HiddenSetParseError> {
        Self::parse(BUILTIN)
    }

    /// Whether a probe is excluded.
    pub fn contains(&self, probe: usize) -> bool {
        self.indices.contains(&probe)
    }

    /// Number of excluded probes.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate the excluded indices (unordered).
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

impl FromIterator<usize> for HiddenSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comments_and_blanks() {
        let set = HiddenSet::parse("# header\n\n3\n17 # trailing\n3\n")
            .unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(set.contains(17));
        assert!(!set.contains(4));
    }

    #[test]
    fn rejects_garbage() {
        let err = HiddenSet::parse("12\nnope\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn builtin_asset_is_well_formed() {
        let set = HiddenSet::builtin().unwrap();
        assert!(!set.is_empty());
    }
}
