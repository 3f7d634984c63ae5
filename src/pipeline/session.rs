//! Request context handed to every visualization call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::providers::EmbeddingProvider;
use crate::error::{Result, VizError};
use crate::similarity::EmbeddingSet;

/// Index of a chunk in the session's chunk/embedding order.
///
/// Vector stores key documents by `chunk_{i}`; this carries `i` directly
/// so nothing has to parse it back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(pub usize);

impl ChunkId {
    pub fn index(&self) -> usize {
        self.0
    }

    /// Key used when adding the chunk to an external vector store.
    pub fn store_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk_{}", self.0)
    }
}

impl From<usize> for ChunkId {
    fn from(index: usize) -> Self {
        ChunkId(index)
    }
}

/// One result of a vector-store query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub chunk: ChunkId,
    #[serde(default)]
    pub document: String,
    /// Cosine distance reported by the store.
    pub distance: f64,
}

impl RetrievalHit {
    pub fn new(chunk: impl Into<ChunkId>, document: impl Into<String>, distance: f64) -> Self {
        Self {
            chunk: chunk.into(),
            document: document.into(),
            distance,
        }
    }

    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// Chunks, their embeddings and the latest retrieval, owned by the caller.
///
/// Visualization calls only read from a session; every derived structure
/// is rebuilt per call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VizSession {
    #[serde(default)]
    chunks: Vec<String>,
    #[serde(default)]
    embeddings: EmbeddingSet,
    #[serde(default)]
    hits: Vec<RetrievalHit>,
    #[serde(default)]
    query_embedding: Option<Vec<f32>>,
    #[serde(default)]
    query_text: Option<String>,
}

impl VizSession {
    /// Session over precomputed embeddings. `chunks` may be empty (no hover
    /// text) or must match the embedding count.
    pub fn new(chunks: Vec<String>, embeddings: EmbeddingSet) -> Result<Self> {
        let session = Self {
            chunks,
            embeddings,
            ..Self::default()
        };
        session.validate()?;
        Ok(session)
    }

    /// Embed `chunks` through an external provider.
    pub fn from_provider<P: EmbeddingProvider + ?Sized>(provider: &P, chunks: Vec<String>) -> Result<Self> {
        let embeddings = provider.encode(&chunks)?;
        if embeddings.len() != chunks.len() {
            return Err(VizError::Provider(format!(
                "provider returned {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }
        Self::new(chunks, embeddings)
    }

    /// Attach a retrieval result; replaces any previous one.
    pub fn with_retrieval(mut self, hits: Vec<RetrievalHit>, query_embedding: Option<Vec<f32>>) -> Self {
        self.hits = hits;
        self.query_embedding = query_embedding;
        self
    }

    pub fn with_query_text(mut self, text: impl Into<String>) -> Self {
        self.query_text = Some(text.into());
        self
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn embeddings(&self) -> &EmbeddingSet {
        &self.embeddings
    }

    pub fn hits(&self) -> &[RetrievalHit] {
        &self.hits
    }

    pub fn query_embedding(&self) -> Option<&[f32]> {
        self.query_embedding.as_deref()
    }

    pub fn query_text(&self) -> Option<&str> {
        self.query_text.as_deref()
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Hits whose chunk exists in this session.
    pub fn valid_hits(&self) -> impl Iterator<Item = &RetrievalHit> {
        let n = self.len();
        self.hits.iter().filter(move |h| h.chunk.index() < n)
    }

    /// Chunk indices marked as retrieved.
    pub fn selection(&self) -> BTreeSet<usize> {
        let stale = self.hits.len() - self.valid_hits().count();
        if stale > 0 {
            tracing::warn!(stale, chunks = self.len(), "retrieval hits past the chunk range ignored");
        }
        self.valid_hits().map(|h| h.chunk.index()).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.chunks.is_empty() && self.chunks.len() != self.embeddings.len() {
            return Err(VizError::ShapeMismatch {
                index: 0,
                expected: self.embeddings.len(),
                got: self.chunks.len(),
            });
        }
        if let Some(q) = &self.query_embedding {
            if !self.embeddings.is_empty() && q.len() != self.embeddings.dimensions() {
                return Err(VizError::ShapeMismatch {
                    index: self.embeddings.len(),
                    expected: self.embeddings.dimensions(),
                    got: q.len(),
                });
            }
        }
        Ok(())
    }
}
