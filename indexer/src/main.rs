mod corpus;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use corpus::{load_corpus, load_queries, InputDoc, InputQuery};
use lexrank::eval::{evaluate_retriever, group_relevance, RetrievalMetrics};
use lexrank::{Bm25Index, DocId, RetrievalConfig};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a BM25 index over a corpus and query or evaluate it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Corpus path (file or directory of .json/.jsonl)
    #[arg(long)]
    input: PathBuf,
    /// JSON file with retrieval settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Term frequency saturation (overrides config)
    #[arg(long)]
    k1: Option<f64>,
    /// Length normalization strength in [0, 1] (overrides config)
    #[arg(long)]
    b: Option<f64>,
    /// Number of results per query (overrides config)
    #[arg(long)]
    k: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the corpus against one query
    Search {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        query: String,
    },
    /// Precision@k / recall@k for a JSONL query set
    Eval {
        #[command(flatten)]
        index: IndexArgs,
        /// Queries as {"source": ..., "query": ...} lines
        #[arg(long)]
        queries: PathBuf,
        /// Evaluate at most this many queries
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    took_s: f64,
    total_hits: usize,
    results: Vec<SearchHit>,
}

#[derive(Serialize)]
struct SearchHit {
    doc_id: DocId,
    id: String,
    score: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { index, query } => search(&index, &query),
        Commands::Eval { index, queries, limit } => eval(&index, &queries, limit),
    }
}

fn resolve_config(args: &IndexArgs) -> Result<RetrievalConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            RetrievalConfig::from_json_str(&text).with_context(|| format!("loading config {}", path.display()))?
        }
        None => RetrievalConfig::default(),
    };
    if let Some(k1) = args.k1 {
        config.bm25.k1 = k1;
    }
    if let Some(b) = args.b {
        config.bm25.b = b;
    }
    if let Some(k) = args.k {
        config.top_k = k;
    }
    config.validate()?;
    Ok(config)
}

fn build_index(input: &Path, config: &RetrievalConfig) -> Result<(Vec<InputDoc>, Bm25Index)> {
    let docs = load_corpus(input)?;
    let bodies: Vec<&str> = docs.iter().map(|d| d.body.as_str()).collect();
    let start = Instant::now();
    let index = Bm25Index::build(&bodies, config.bm25)?;
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), took_s = start.elapsed().as_secs_f64(), "index ready");
    Ok((docs, index))
}

fn search(args: &IndexArgs, query: &str) -> Result<()> {
    let config = resolve_config(args)?;
    let (docs, index) = build_index(&args.input, &config)?;

    let start = Instant::now();
    let ranked = index.score(query);
    let took_s = start.elapsed().as_secs_f64();
    let total_hits = ranked.len();
    let results = ranked
        .into_iter()
        .take(config.top_k)
        .map(|hit| SearchHit { doc_id: hit.doc_id, id: docs[hit.doc_id as usize].id.clone(), score: hit.score })
        .collect();

    let response = SearchResponse { query: query.to_string(), took_s, total_hits, results };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn eval(args: &IndexArgs, queries_path: &Path, limit: Option<usize>) -> Result<()> {
    let config = resolve_config(args)?;
    let (docs, index) = build_index(&args.input, &config)?;

    let mut queries = load_queries(queries_path)?;
    if let Some(n) = limit {
        queries.truncate(n);
    }
    let metrics = evaluate_queries(&docs, &index, queries, config.top_k);
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

/// Relevant documents for a query are those sharing its source. Each query is
/// keyed by `(source, position)` so repeated sources are evaluated separately.
fn evaluate_queries(docs: &[InputDoc], index: &Bm25Index, queries: Vec<InputQuery>, k: usize) -> RetrievalMetrics {
    let sources: Vec<String> = docs.iter().map(|d| d.source().to_string()).collect();
    let relevant = group_relevance(&sources);

    let missing = queries.iter().filter(|q| !relevant.contains_key(&q.source)).count();
    if missing > 0 {
        tracing::warn!(missing, "queries reference sources absent from the corpus and will be skipped");
    }
    let keyed: Vec<((String, usize), String)> = queries
        .into_iter()
        .enumerate()
        .map(|(i, q)| ((q.source, i), q.query))
        .collect();
    let relevant_by_query: HashMap<(String, usize), HashSet<DocId>> = keyed
        .iter()
        .filter_map(|(key, _)| relevant.get(&key.0).map(|r| (key.clone(), r.clone())))
        .collect();

    evaluate_retriever(index, &keyed, &relevant_by_query, k)
}
