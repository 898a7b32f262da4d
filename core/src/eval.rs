use crate::index::DocId;
use crate::retriever::Retriever;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetrievalMetrics {
    pub k: usize,
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    /// Queries that had at least one relevant document.
    pub evaluated: usize,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Mean precision@k and recall@k over `results`.
///
/// Queries whose relevant set is missing or empty are skipped.
pub fn evaluate_at_k<Q>(
    results: &BTreeMap<Q, Vec<DocId>>,
    relevant: &HashMap<Q, HashSet<DocId>>,
    k: usize,
) -> RetrievalMetrics
where
    Q: Ord + Hash + Eq,
{
    let mut precisions = Vec::with_capacity(results.len());
    let mut recalls = Vec::with_capacity(results.len());

    for (query, retrieved) in results {
        let Some(relevant_docs) = relevant.get(query).filter(|r| !r.is_empty()) else {
            continue;
        };
        let hits = retrieved.iter().take(k).filter(|id| relevant_docs.contains(*id)).count();
        // k == 0 retrieves nothing, so both metrics are 0.
        let precision = if k == 0 { 0.0 } else { hits as f64 / k as f64 };
        precisions.push(precision);
        recalls.push(hits as f64 / relevant_docs.len() as f64);
    }

    RetrievalMetrics {
        k,
        precision_at_k: mean(&precisions),
        recall_at_k: mean(&recalls),
        evaluated: precisions.len(),
    }
}

/// Run every query through `retriever` and score the rankings.
pub fn evaluate_retriever<R, Q>(
    retriever: &R,
    queries: &[(Q, String)],
    relevant: &HashMap<Q, HashSet<DocId>>,
    k: usize,
) -> RetrievalMetrics
where
    R: Retriever + ?Sized,
    Q: Ord + Hash + Eq + Clone,
{
    let results: BTreeMap<Q, Vec<DocId>> = queries
        .iter()
        .map(|(id, text)| (id.clone(), retriever.retrieve(text, k)))
        .collect();
    let metrics = evaluate_at_k(&results, relevant, k);
    tracing::info!(
        k,
        queries = queries.len(),
        evaluated = metrics.evaluated,
        precision = metrics.precision_at_k,
        recall = metrics.recall_at_k,
        "evaluated retriever"
    );
    metrics
}

/// Map each source key to the ids of the documents cut from it.
///
/// `sources[i]` is the source of document `i`.
pub fn group_relevance<S>(sources: &[S]) -> HashMap<S, HashSet<DocId>>
where
    S: Hash + Eq + Clone,
{
    let mut groups: HashMap<S, HashSet<DocId>> = HashMap::new();
    for (doc_id, source) in sources.iter().enumerate() {
        groups.entry(source.clone()).or_default().insert(doc_id as DocId);
    }
    groups
}
