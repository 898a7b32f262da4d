pub mod config;
pub mod error;
pub mod eval;
mod index;
pub mod retriever;
pub mod scoring;
pub mod shared;
pub mod tokenizer;

pub use config::{Bm25Config, RetrievalConfig};
pub use error::{Error, Result};
pub use index::*;
pub use retriever::Retriever;
pub use scoring::ScoredDoc;
pub use shared::SharedIndex;
