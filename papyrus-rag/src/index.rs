//! Flat exact nearest-neighbor index.
//!
//! Stores every vector and scans all of them on each query. At document
//! scale (hundreds of chunks) brute force is faster than maintaining an
//! approximate structure and loses no recall; this becomes a scaling
//! limit once a corpus grows past the low thousands of vectors.

use serde::{Deserialize, Serialize};

use crate::document::SearchHit;
use crate::error::{RagError, Result};

/// An immutable flat index over fixed-dimension vectors.
///
/// Built once from all of a document's chunk embeddings; queries return
/// positions into the original build order. There is no update or
/// delete — changed content means a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build an index from chunk embeddings.
    ///
    /// # Errors
    ///
    /// - [`RagError::IndexUnbuildable`] for an empty vector set or
    ///   zero-dimension vectors — an index that can never answer a query
    ///   is refused rather than silently constructed.
    /// - [`RagError::DimensionMismatch`] if the vectors disagree on
    ///   dimension.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Err(RagError::IndexUnbuildable("no vectors supplied".to_string()));
        };
        let dim = first.len();
        if dim == 0 {
            return Err(RagError::IndexUnbuildable("vectors have zero dimension".to_string()));
        }

        let mut data = Vec::with_capacity(vectors.len() * dim);
        for vector in vectors {
            if vector.len() != dim {
                return Err(RagError::DimensionMismatch { expected: dim, actual: vector.len() });
            }
            data.extend_from_slice(vector);
        }

        Ok(Self { dim, data })
    }

    /// Number of vectors in the index.
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Whether the index holds no vectors. Always false for a built
    /// index; exists for completeness.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dimension shared by every vector in the index.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Exact k-nearest-neighbor search by squared Euclidean distance.
    ///
    /// Returns at most `min(k, len)` hits, ascending by distance, ties
    /// broken by position so results are stable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the probe's dimension
    /// differs from the index dimension.
    pub fn search(&self, probe: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if probe.len() != self.dim {
            return Err(RagError::DimensionMismatch { expected: self.dim, actual: probe.len() });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(position, row)| SearchHit {
                position,
                distance: squared_l2(row, probe),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        hits.truncate(k);
        Ok(hits)
    }

    /// Serialize to a persisted byte blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| RagError::IndexCorrupt(format!("failed to serialize index: {e}")))
    }

    /// Reconstruct an index from a persisted byte blob.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexCorrupt`] if the bytes do not decode to
    /// a structurally valid index.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let index: Self = bincode::deserialize(bytes)
            .map_err(|e| RagError::IndexCorrupt(format!("failed to deserialize index: {e}")))?;
        if index.dim == 0 || index.data.is_empty() || index.data.len() % index.dim != 0 {
            return Err(RagError::IndexCorrupt(format!(
                "decoded index has {} floats for dimension {}",
                index.data.len(),
                index.dim
            )));
        }
        Ok(index)
    }
}

/// Squared Euclidean distance between two equal-length slices.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_axes() -> Vec<Vec<f32>> {
        vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]]
    }

    #[test]
    fn build_rejects_empty_input() {
        let err = FlatIndex::build(&[]).unwrap_err();
        assert!(matches!(err, RagError::IndexUnbuildable(_)));
    }

    #[test]
    fn build_rejects_zero_dimension() {
        let err = FlatIndex::build(&[vec![]]).unwrap_err();
        assert!(matches!(err, RagError::IndexUnbuildable(_)));
    }

    #[test]
    fn build_rejects_mixed_dimensions() {
        let err = FlatIndex::build(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn search_returns_ascending_distances() {
        let index = FlatIndex::build(&unit_axes()).unwrap();
        let hits = index.search(&[0.9, 0.1, 0.0], 3).unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].position, 0);
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn k_larger_than_index_returns_everything() {
        let index = FlatIndex::build(&unit_axes()).unwrap();
        let hits = index.search(&[1.0, 0.0, 0.0], 50).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn probe_dimension_is_checked() {
        let index = FlatIndex::build(&unit_axes()).unwrap();
        let err = index.search(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn round_trip_preserves_search_results() {
        let vectors = vec![vec![0.2, 0.8], vec![0.9, 0.1], vec![0.5, 0.5], vec![0.0, 1.0]];
        let index = FlatIndex::build(&vectors).unwrap();
        let restored = FlatIndex::from_bytes(&index.to_bytes().unwrap()).unwrap();

        for probe in [[0.1, 0.9], [1.0, 0.0], [0.5, 0.5]] {
            for k in 1..=5 {
                assert_eq!(index.search(&probe, k).unwrap(), restored.search(&probe, k).unwrap());
            }
        }
    }

    #[test]
    fn corrupt_bytes_are_rejected() {
        let err = FlatIndex::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, RagError::IndexCorrupt(_)));
    }

    #[test]
    fn exact_distance_values() {
        let index = FlatIndex::build(&[vec![0.0, 0.0], vec![3.0, 4.0]]).unwrap();
        let hits = index.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].position, 0);
        assert!((hits[0].distance - 0.0).abs() < f32::EPSILON);
        assert!((hits[1].distance - 25.0).abs() < 1e-5);
    }
}
