use crate::index::{Bm25Index, DocId};
use crate::shared::SharedIndex;
use std::sync::Arc;

/// Anything that can turn a query into a ranked list of document ids.
pub trait Retriever {
    fn retrieve(&self, query: &str, k: usize) -> Vec<DocId>;
}

impl Retriever for Bm25Index {
    fn retrieve(&self, query: &str, k: usize) -> Vec<DocId> {
        self.top_k(query, k)
    }
}

impl Retriever for SharedIndex {
    fn retrieve(&self, query: &str, k: usize) -> Vec<DocId> {
        self.top_k(query, k)
    }
}

impl<R: Retriever + ?Sized> Retriever for &R {
    fn retrieve(&self, query: &str, k: usize) -> Vec<DocId> {
        (**self).retrieve(query, k)
    }
}

impl<R: Retriever + ?Sized> Retriever for Arc<R> {
    fn retrieve(&self, query: &str, k: usize) -> Vec<DocId> {
        (**self).retrieve(query, k)
    }
}
