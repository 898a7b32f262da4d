use crate::index::{Bm25Index, DocId};
use crate::tokenizer::tokenize;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Floor for the saturation denominator.
pub const DENOM_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// BM25 contribution of one query term to one document.
///
/// `f` is the raw term frequency in the document and `dl` its length.
pub fn term_score(idf: f64, f: f64, dl: f64, avg_dl: f64, k1: f64, b: f64) -> f64 {
    let denom = f + k1 * (1.0 - b + b * dl / avg_dl.max(1.0));
    idf * (f * (k1 + 1.0)) / denom.max(DENOM_EPSILON)
}

/// Descending score, then ascending doc id.
fn rank_order(a: &ScoredDoc, b: &ScoredDoc) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id))
}

impl Bm25Index {
    /// Score every document sharing at least one term with `query`.
    ///
    /// Results are sorted by score descending with ties broken by ascending
    /// doc id. Documents with no overlap are omitted. Unknown query terms are
    /// skipped; a repeated query term counts once per occurrence.
    pub fn score(&self, query: &str) -> Vec<ScoredDoc> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || self.terms.is_empty() {
            return Vec::new();
        }

        let k1 = self.config.k1;
        let b = self.config.b;
        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for term in &query_terms {
            let Some(entry) = self.terms.get(term) else {
                continue;
            };
            for posting in &entry.postings {
                let dl = self.doc_lengths[posting.doc_id as usize] as f64;
                let contribution =
                    term_score(entry.idf, posting.term_frequency as f64, dl, self.avg_doc_length, k1, b);
                *scores.entry(posting.doc_id).or_insert(0.0) += contribution;
            }
        }

        let mut ranked: Vec<ScoredDoc> = scores
            .into_iter()
            .filter(|&(_, score)| score > 0.0)
            .map(|(doc_id, score)| ScoredDoc { doc_id, score })
            .collect();
        ranked.sort_unstable_by(rank_order);
        tracing::trace!(query_terms = query_terms.len(), hits = ranked.len(), "scored query");
        ranked
    }

    /// Ids of the `k` best documents for `query`, best first.
    pub fn top_k(&self, query: &str, k: usize) -> Vec<DocId> {
        if k == 0 {
            return Vec::new();
        }
        self.score(query).into_iter().take(k).map(|d| d.doc_id).collect()
    }
}
