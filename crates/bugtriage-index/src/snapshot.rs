use uuid::Uuid;

use bugtriage_core::traits::IndexMatch;

/// An immutable point-in-time view of the index: row-major contiguous
/// vectors plus the position → bug-id mapping. Readers hold an `Arc` to
/// one of these; `add`/`rebuild` never mutate it in place, they publish a
/// new one.
pub struct Snapshot {
    pub dimensions: usize,
    /// `ids[i]` is the external bug id stored at row `i` of `vectors`.
    pub ids: Vec<Uuid>,
    /// Row-major: row `i` occupies `vectors[i*dimensions..(i+1)*dimensions]`.
    pub vectors: Vec<f32>,
}

impl Snapshot {
    pub fn empty(dimensions: usize) -> Self {
        Self {
            dimensions,
            ids: Vec::new(),
            vectors: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dimensions;
        &self.vectors[start..start + self.dimensions]
    }

    /// Exact brute-force nearest-neighbor search by inner product. Vectors
    /// are expected to already be unit-norm, so inner product is cosine
    /// similarity. Highest score first.
    pub fn search(&self, query: &[f32], limit: usize) -> Vec<IndexMatch> {
        let mut scored: Vec<IndexMatch> = (0..self.len())
            .map(|i| {
                let row = self.row(i);
                let score: f32 = row.iter().zip(query).map(|(a, b)| a * b).sum();
                IndexMatch {
                    bug_id: self.ids[i],
                    vector_score: score as f64,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.vector_score
                .partial_cmp(&a.vector_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        scored
    }

    pub fn with_appended(&self, id: Uuid, vector: &[f32]) -> Self {
        let mut ids = self.ids.clone();
        let mut vectors = self.vectors.clone();
        ids.push(id);
        vectors.extend_from_slice(vector);
        Self {
            dimensions: self.dimensions,
            ids,
            vectors,
        }
    }

    pub fn from_entries(dimensions: usize, entries: &[(Uuid, Vec<f32>)]) -> Self {
        let mut ids = Vec::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len() * dimensions);
        for (id, vector) in entries {
            ids.push(*id);
            vectors.extend_from_slice(vector);
        }
        Self {
            dimensions,
            ids,
            vectors,
        }
    }
}
