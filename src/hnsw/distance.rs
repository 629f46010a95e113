//! Distance functions for vector comparison.
//!
//! Two variants of the Euclidean family, selected at construction. Both are
//! symmetric, non-negative, and zero for identical inputs. `SquaredL2` skips
//! the square root; it preserves the L2 ordering and is the cheaper choice
//! when only ranking matters.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Distance function used for vector comparison.
///
/// Lower is closer. An index uses exactly one kind for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceKind {
    /// Euclidean distance: `sqrt(Σ (aᵢ - bᵢ)²)`.
    L2,
    /// Squared Euclidean distance: `Σ (aᵢ - bᵢ)²`. Monotonic in L2.
    SquaredL2,
}

impl DistanceKind {
    /// Compute the distance between two equal-length vectors.
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        let mut sum = 0.0f32;
        for (x, y) in a.iter().zip(b.iter()) {
            let diff = x - y;
            sum += diff * diff;
        }
        match self {
            DistanceKind::L2 => sum.sqrt(),
            DistanceKind::SquaredL2 => sum,
        }
    }

    /// Stable tag used in snapshots.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceKind::L2 => "l2",
            DistanceKind::SquaredL2 => "squared_l2",
        }
    }

    /// Resolve a snapshot tag. Returns `None` for unknown tags.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "l2" => Some(DistanceKind::L2),
            "squared_l2" => Some(DistanceKind::SquaredL2),
            _ => None,
        }
    }
}

// Snapshots store the distance as its tag so that old snapshots keep loading
// when new kinds are added. Unknown tags fall back to SquaredL2.
impl Serialize for DistanceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DistanceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(DistanceKind::from_name(&tag).unwrap_or_else(|| {
            tracing::warn!("unknown distance tag '{tag}', falling back to squared_l2");
            DistanceKind::SquaredL2
        }))
    }
}
