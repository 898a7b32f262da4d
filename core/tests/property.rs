use lexrank::scoring::term_score;
use lexrank::tokenizer::tokenize;
use lexrank::{Bm25Config, Bm25Index};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn word() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["alpha", "beta", "gamma", "delta", "the", "a", "x_1", "42"]).prop_map(String::from)
}

fn document() -> impl Strategy<Value = String> {
    (prop::collection::vec(word(), 0..12), prop::sample::select(vec![" ", ", ", "! ", "\n", "--"]))
        .prop_map(|(words, sep)| words.join(sep))
}

fn corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(document(), 0..25)
}

fn config() -> impl Strategy<Value = Bm25Config> {
    (0.0..3.0f64, 0.0..=1.0f64).prop_map(|(k1, b)| Bm25Config { k1, b })
}

/// Straightforward single-threaded construction to compare against.
fn reference_postings(docs: &[String]) -> BTreeMap<String, Vec<(u32, u32)>> {
    let mut out: BTreeMap<String, BTreeMap<u32, u32>> = BTreeMap::new();
    for (id, doc) in docs.iter().enumerate() {
        for term in tokenize(doc) {
            *out.entry(term).or_default().entry(id as u32).or_insert(0) += 1;
        }
    }
    out.into_iter().map(|(t, m)| (t, m.into_iter().collect())).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn doc_lengths_align_with_corpus(docs in corpus()) {
        let idx = Bm25Index::with_defaults(&docs).unwrap();
        prop_assert_eq!(idx.num_docs(), docs.len());
        for (i, doc) in docs.iter().enumerate() {
            prop_assert_eq!(idx.doc_length(i as u32), Some(tokenize(doc).len() as u32));
        }
    }

    #[test]
    fn postings_are_in_range_positive_and_sorted(docs in corpus()) {
        let idx = Bm25Index::with_defaults(&docs).unwrap();
        for term in idx.terms() {
            let postings = idx.postings(term).unwrap();
            prop_assert!(!postings.is_empty());
            for p in postings {
                prop_assert!((p.doc_id as usize) < docs.len());
                prop_assert!(p.term_frequency >= 1);
            }
            prop_assert!(postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id));
        }
    }

    #[test]
    fn parallel_build_matches_sequential_reference(docs in corpus()) {
        let idx = Bm25Index::with_defaults(&docs).unwrap();
        let reference = reference_postings(&docs);
        prop_assert_eq!(idx.num_terms(), reference.len());
        for (term, expected) in &reference {
            let got: Vec<(u32, u32)> = idx
                .postings(term)
                .unwrap()
                .iter()
                .map(|p| (p.doc_id, p.term_frequency))
                .collect();
            prop_assert_eq!(&got, expected);
            prop_assert_eq!(idx.document_frequency(term), Some(expected.len()));
        }
    }

    #[test]
    fn idf_is_finite_and_defined_for_exactly_the_vocabulary(docs in corpus()) {
        let idx = Bm25Index::with_defaults(&docs).unwrap();
        let vocab: BTreeSet<String> = docs.iter().flat_map(|d| tokenize(d)).collect();
        prop_assert_eq!(idx.terms().count(), vocab.len());
        for term in &vocab {
            let df = idx.document_frequency(term).unwrap();
            prop_assert!(df >= 1 && df <= docs.len());
            let idf = idx.idf(term).unwrap();
            prop_assert!(idf.is_finite());
            prop_assert!(idf > 0.0);
        }
    }

    #[test]
    fn contribution_never_decreases_with_frequency(
        idf in 0.0..10.0f64,
        f in 0u32..200,
        dl in 0u32..500,
        avg in 0.0..300.0f64,
        cfg in config(),
    ) {
        let lo = term_score(idf, f as f64, dl as f64, avg, cfg.k1, cfg.b);
        let hi = term_score(idf, (f + 1) as f64, dl as f64, avg, cfg.k1, cfg.b);
        prop_assert!(lo.is_finite() && hi.is_finite());
        prop_assert!(hi + 1e-12 >= lo, "f={} lo={} hi={}", f, lo, hi);
    }

    #[test]
    fn results_are_sorted_deterministic_and_sparse(docs in corpus(), query in document(), cfg in config()) {
        let idx = Bm25Index::build(&docs, cfg).unwrap();
        let ranked = idx.score(&query);
        let again = idx.score(&query);
        prop_assert_eq!(&ranked, &again);

        let query_terms: BTreeSet<String> = tokenize(&query).into_iter().collect();
        for pair in ranked.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].doc_id < pair[1].doc_id)
            );
        }
        for hit in &ranked {
            prop_assert!(hit.score > 0.0);
            let doc_terms: BTreeSet<String> = tokenize(&docs[hit.doc_id as usize]).into_iter().collect();
            prop_assert!(!doc_terms.is_disjoint(&query_terms));
        }
        // Every document sharing a term must appear.
        let matching = docs
            .iter()
            .filter(|d| tokenize(d).iter().any(|t| query_terms.contains(t)))
            .count();
        prop_assert_eq!(ranked.len(), matching);
    }

    #[test]
    fn top_k_is_a_prefix_of_score(docs in corpus(), query in document(), k in 0usize..10) {
        let idx = Bm25Index::with_defaults(&docs).unwrap();
        let full: Vec<u32> = idx.score(&query).into_iter().map(|d| d.doc_id).collect();
        let top = idx.top_k(&query, k);
        prop_assert_eq!(top.len(), k.min(full.len()));
        prop_assert_eq!(&top[..], &full[..top.len()]);
    }

    #[test]
    fn rebuild_equals_fresh_build(first in corpus(), second in corpus(), query in document()) {
        let mut idx = Bm25Index::with_defaults(&first).unwrap();
        idx.rebuild(&second).unwrap();
        let fresh = Bm25Index::with_defaults(&second).unwrap();
        prop_assert_eq!(idx.doc_lengths(), fresh.doc_lengths());
        prop_assert_eq!(idx.num_terms(), fresh.num_terms());
        prop_assert_eq!(idx.score(&query), fresh.score(&query));
    }
}
