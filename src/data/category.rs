use serde::{Deserialize, Serialize};

/// Stimulus image category presented during the recording.
///
/// The order is fixed by the recorded arrays: per-category response and
/// predictiveness products are indexed by `Category::index()`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// House photographs.
    Houses,
    /// Face photographs.
    Faces,
    /// Animal photographs.
    Animals,
    /// Natural and urban scenes.
    Scenery,
    /// Hand tools.
    Tools,
    /// Pronounceable non-words.
    Pseudoword,
    /// Character strings.
    Characters,
    /// Scrambled (noise) images.
    Noise,
}

impl Category {
    /// All categories in array order.
    pub const ALL: [Self; 8] = [
        Self::Houses,
        Self::Faces,
        Self::Animals,
        Self::Scenery,
        Self::Tools,
        Self::Pseudoword,
        Self::Characters,
        Self::Noise,
    ];

    /// Number of categories in the recorded data products.
    pub const COUNT: usize = Self::ALL.len();

    /// Index of this category in per-category arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Houses => 0,
            Self::Faces => 1,
            Self::Animals => 2,
            Self::Scenery => 3,
            Self::Tools => 4,
            Self::Pseudoword => 5,
            Self::Characters => 6,
            Self::Noise => 7,
        }
    }

    /// Category at the given array index, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Houses => "Houses",
            Self::Faces => "Faces",
            Self::Animals => "Animals",
            Self::Scenery => "Scenery",
            Self::Tools => "Tools",
            Self::Pseudoword => "Pseudoword",
            Self::Characters => "Characters",
            Self::Noise => "Noise",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        for cat in Category::ALL {
            assert_eq!(Category::from_index(cat.index()), Some(cat));
        }
        assert_eq!(Category::from_index(Category::COUNT), None);
    }

    #[test]
    fn array_order_is_stable() {
        // Per-category data products were recorded in this order.
        assert_eq!(Category::Houses.index(), 0);
        assert_eq!(Category::Faces.index(), 1);
        assert_eq!(Category::Noise.index(), 7);
    }
}
