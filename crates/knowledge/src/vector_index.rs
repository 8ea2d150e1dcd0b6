//! Vector index abstraction and the exact L2 implementation.
//!
//! An index is an append-only, ordered collection of fixed-dimension vectors.
//! Ordinals are insertion positions and never change.

use docqa_core::{AppError, AppResult};

const MAGIC: &[u8; 4] = b"DQIX";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

/// Trait for vector index backends.
pub trait VectorIndex: Send + Sync {
    /// Create an empty index for vectors of `dimension`.
    fn with_dimension(dimension: usize) -> Self
    where
        Self: Sized;

    /// Restore an index from [`to_bytes`](VectorIndex::to_bytes) output.
    fn from_bytes(bytes: &[u8]) -> AppResult<Self>
    where
        Self: Sized;

    /// Serialize the index to a self-describing byte blob.
    fn to_bytes(&self) -> Vec<u8>;

    /// Append vectors in order. All or nothing.
    fn add(&mut self, vectors: &[Vec<f32>]) -> AppResult<()>;

    /// Return up to `k` `(distance, ordinal)` pairs, nearest first.
    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(f32, usize)>>;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// Vector dimension.
    fn dimension(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Brute-force index over squared Euclidean distance.
///
/// Vectors are stored contiguously, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    fn row(&self, ordinal: usize) -> &[f32] {
        let start = ordinal * self.dimension;
        &self.data[start..start + self.dimension]
    }

    fn check_dimension(&self, actual: usize) -> AppResult<()> {
        if actual != self.dimension {
            return Err(AppError::DimensionMismatch {
                expected: self.dimension,
                actual,
            });
        }
        Ok(())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

impl VectorIndex for FlatL2Index {
    fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(AppError::CorruptStore(format!(
                "index file too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[0..4] != MAGIC {
            return Err(AppError::CorruptStore("bad index magic".to_string()));
        }

        let version = read_u32(bytes, 4);
        if version != FORMAT_VERSION {
            return Err(AppError::CorruptStore(format!(
                "unsupported index version {}",
                version
            )));
        }

        let dimension = read_u32(bytes, 8) as usize;
        let mut count_buf = [0u8; 8];
        count_buf.copy_from_slice(&bytes[12..20]);
        let count = u64::from_le_bytes(count_buf);

        let expected_len = usize::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(dimension))
            .and_then(|n| n.checked_mul(4))
            .and_then(|n| n.checked_add(HEADER_LEN));
        if expected_len != Some(bytes.len()) {
            return Err(AppError::CorruptStore(format!(
                "index payload is {} bytes, header declares {} vectors of dimension {}",
                bytes.len() - HEADER_LEN,
                count,
                dimension
            )));
        }

        let data = bytes[HEADER_LEN..]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self { dimension, data })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len() * 4);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.dimension as u32).to_le_bytes());
        out.extend_from_slice(&(self.len() as u64).to_le_bytes());
        for value in &self.data {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out
    }

    fn add(&mut self, vectors: &[Vec<f32>]) -> AppResult<()> {
        for vector in vectors {
            self.check_dimension(vector.len())?;
        }

        self.data.reserve(vectors.len() * self.dimension);
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(f32, usize)>> {
        if k == 0 {
            return Err(AppError::InvalidInput("k must be at least 1".to_string()));
        }
        if self.is_empty() {
            return Err(AppError::EmptyIndex);
        }
        self.check_dimension(query.len())?;

        let mut scored: Vec<(f32, usize)> = (0..self.len())
            .map(|ordinal| (squared_l2(query, self.row(ordinal)), ordinal))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        scored.truncate(k);

        Ok(scored)
    }

    fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(vectors: &[Vec<f32>]) -> FlatL2Index {
        let mut index = FlatL2Index::with_dimension(2);
        index.add(vectors).unwrap();
        index
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = index_with(&[vec![10.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]]);
        let results = index.search(&[0.0, 0.0], 3).unwrap();

        assert_eq!(results, vec![(1.0, 1), (9.0, 2), (100.0, 0)]);
    }

    #[test]
    fn test_ties_broken_by_ordinal() {
        let index = index_with(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]]);
        let ordinals: Vec<usize> = index
            .search(&[0.0, 0.0], 3)
            .unwrap()
            .into_iter()
            .map(|(_, o)| o)
            .collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_larger_than_len() {
        let index = index_with(&[vec![0.0, 0.0], vec![1.0, 1.0]]);
        assert_eq!(index.search(&[0.0, 0.0], 3).unwrap().len(), 2);
    }

    #[test]
    fn test_search_errors() {
        let empty = FlatL2Index::with_dimension(2);
        assert!(matches!(empty.search(&[0.0, 0.0], 1), Err(AppError::EmptyIndex)));

        let index = index_with(&[vec![0.0, 0.0]]);
        assert!(matches!(
            index.search(&[0.0, 0.0], 0),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            index.search(&[0.0], 1),
            Err(AppError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_add_is_all_or_nothing() {
        let mut index = index_with(&[vec![0.0, 0.0]]);
        let result = index.add(&[vec![1.0, 1.0], vec![1.0, 1.0, 1.0]]);

        assert!(matches!(result, Err(AppError::DimensionMismatch { .. })));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_bytes_round_trip_is_exact() {
        let index = index_with(&[vec![0.1, -2.5], vec![f32::MIN_POSITIVE, 3.0e7]]);
        let bytes = index.to_bytes();

        assert_eq!(&bytes[0..4], b"DQIX");
        assert_eq!(bytes.len(), HEADER_LEN + 2 * 2 * 4);

        let restored = FlatL2Index::from_bytes(&bytes).unwrap();
        assert_eq!(restored, index);
        assert_eq!(restored.to_bytes(), bytes);
    }

    #[test]
    fn test_empty_index_round_trip() {
        let index = FlatL2Index::with_dimension(384);
        let restored = FlatL2Index::from_bytes(&index.to_bytes()).unwrap();
        assert_eq!(restored.dimension(), 384);
        assert!(restored.is_empty());
    }

    #[test]
    fn test_corrupt_bytes_rejected() {
        let bytes = index_with(&[vec![1.0, 2.0]]).to_bytes();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            FlatL2Index::from_bytes(&bad_magic),
            Err(AppError::CorruptStore(_))
        ));

        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        assert!(matches!(
            FlatL2Index::from_bytes(&bad_version),
            Err(AppError::CorruptStore(_))
        ));

        let truncated = &bytes[..bytes.len() - 1];
        assert!(matches!(
            FlatL2Index::from_bytes(truncated),
            Err(AppError::CorruptStore(_))
        ));

        assert!(matches!(
            FlatL2Index::from_bytes(b"DQ"),
            Err(AppError::CorruptStore(_))
        ));
    }
}
