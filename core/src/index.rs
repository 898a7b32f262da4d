use crate::config::Bm25Config;
use crate::error::{Error, Result};
use crate::tokenizer::tokenize;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// Raw occurrence count of the term in the document, always >= 1.
    pub term_frequency: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TermEntry {
    /// Sorted by doc_id; one posting per containing document.
    pub(crate) postings: Vec<Posting>,
    pub(crate) idf: f64,
}

/// Smoothed BM25 idf. Non-negative for every `1 <= df <= n`.
pub fn idf(num_docs: usize, document_frequency: usize) -> f64 {
    let n = num_docs as f64;
    let df = document_frequency as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Document ids are `u32`; larger corpora cannot be addressed.
fn check_corpus_size(num_docs: usize) -> Result<()> {
    if num_docs > DocId::MAX as usize {
        return Err(Error::CorpusTooLarge(num_docs));
    }
    Ok(())
}

/// Per-document output of the parallel analysis phase.
struct DocTerms {
    len: u32,
    counts: HashMap<String, u32>,
}

fn analyze(text: &str) -> DocTerms {
    let tokens = tokenize(text);
    let len = tokens.len() as u32;
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    DocTerms { len, counts }
}

#[derive(Debug, Clone)]
pub struct Bm25Index {
    pub(crate) config: Bm25Config,
    pub(crate) terms: HashMap<String, TermEntry>,
    pub(crate) doc_lengths: Vec<u32>,
    pub(crate) avg_doc_length: f64,
}

impl Bm25Index {
    /// Build an index over `documents`. Document ids are positions in the slice.
    ///
    /// Documents that produce no tokens are kept with length 0 so ids stay
    /// aligned with the input. An empty corpus builds an empty index.
    pub fn build<S>(documents: &[S], config: Bm25Config) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        config.validate()?;
        let num_docs = documents.len();
        check_corpus_size(num_docs)?;

        // Phase 1: independent per-document term counts.
        let analyzed: Vec<DocTerms> = documents.par_iter().map(|d| analyze(d.as_ref())).collect();

        // Phase 2: ordered merge, so postings come out sorted by doc id.
        let mut terms: HashMap<String, TermEntry> = HashMap::new();
        let mut doc_lengths: Vec<u32> = Vec::with_capacity(num_docs);
        let mut total_len: u64 = 0;
        for (doc_id, doc) in analyzed.into_iter().enumerate() {
            doc_lengths.push(doc.len);
            total_len += doc.len as u64;
            for (term, term_frequency) in doc.counts {
                terms.entry(term).or_default().postings.push(Posting { doc_id: doc_id as DocId, term_frequency });
            }
        }
        let avg_doc_length = total_len as f64 / num_docs.max(1) as f64;

        // Phase 3: idf per distinct term.
        terms.par_iter_mut().for_each(|(_, entry)| {
            entry.idf = idf(num_docs, entry.postings.len());
        });

        tracing::info!(num_docs, num_terms = terms.len(), avg_doc_length, k1 = config.k1, b = config.b, "built bm25 index");
        Ok(Self { config, terms, doc_lengths, avg_doc_length })
    }

    /// Build with default parameters.
    pub fn with_defaults<S>(documents: &[S]) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        Self::build(documents, Bm25Config::default())
    }

    /// Discard everything and build again from `documents` with the same parameters.
    pub fn rebuild<S>(&mut self, documents: &[S]) -> Result<()>
    where
        S: AsRef<str> + Sync,
    {
        let previous_docs = self.num_docs();
        *self = Self::build(documents, self.config)?;
        tracing::debug!(previous_docs, num_docs = self.num_docs(), "rebuilt bm25 index");
        Ok(())
    }

    pub fn config(&self) -> Bm25Config {
        self.config
    }

    pub fn num_docs(&self) -> usize {
        self.doc_lengths.len()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    pub fn doc_lengths(&self) -> &[u32] {
        &self.doc_lengths
    }

    pub fn doc_length(&self, doc_id: DocId) -> Option<u32> {
        self.doc_lengths.get(doc_id as usize).copied()
    }

    pub fn avg_doc_length(&self) -> f64 {
        self.avg_doc_length
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Postings for `term`, or `None` if the term never occurred.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(|e| e.postings.as_slice())
    }

    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.terms.get(term).map(|e| e.postings.len())
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.terms.get(term).map(|e| e.idf)
    }

    /// Indexed vocabulary, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.keys().map(String::as_str)
    }
}
