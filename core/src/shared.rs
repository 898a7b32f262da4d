use crate::config::Bm25Config;
use crate::error::Result;
use crate::index::{Bm25Index, DocId};
use crate::scoring::ScoredDoc;
use parking_lot::RwLock;
use std::sync::Arc;

/// Readers clone the current `Arc` and query it lock-free; rebuilds swap in a
/// complete replacement under the write lock.
#[derive(Debug)]
pub struct SharedIndex {
    current: RwLock<Arc<Bm25Index>>,
}

impl SharedIndex {
    pub fn new(index: Bm25Index) -> Self {
        Self { current: RwLock::new(Arc::new(index)) }
    }

    pub fn build<S>(documents: &[S], config: Bm25Config) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        Ok(Self::new(Bm25Index::build(documents, config)?))
    }

    /// The index currently being served.
    pub fn snapshot(&self) -> Arc<Bm25Index> {
        self.current.read().clone()
    }

    pub fn score(&self, query: &str) -> Vec<ScoredDoc> {
        self.snapshot().score(query)
    }

    pub fn top_k(&self, query: &str, k: usize) -> Vec<DocId> {
        self.snapshot().top_k(query, k)
    }

    /// Build a new index from `documents` with the current parameters and
    /// swap it in. Returns the index that was replaced.
    pub fn rebuild<S>(&self, documents: &[S]) -> Result<Arc<Bm25Index>>
    where
        S: AsRef<str> + Sync,
    {
        let config = self.snapshot().config();
        let fresh = Bm25Index::build(documents, config)?;
        Ok(self.replace(fresh))
    }

    pub fn replace(&self, index: Bm25Index) -> Arc<Bm25Index> {
        let num_docs = index.num_docs();
        let mut guard = self.current.write();
        let previous = std::mem::replace(&mut *guard, Arc::new(index));
        drop(guard);
        tracing::info!(previous_docs = previous.num_docs(), num_docs, "swapped bm25 index");
        previous
    }
}

impl From<Bm25Index> for SharedIndex {
    fn from(index: Bm25Index) -> Self {
        Self::new(index)
    }
}
