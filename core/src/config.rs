use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default BM25 term frequency saturation.
pub const DEFAULT_K1: f64 = 1.5;
/// Default BM25 length normalization strength.
pub const DEFAULT_B: f64 = 0.75;
/// Default number of documents a retriever returns.
pub const DEFAULT_TOP_K: usize = 5;

/// BM25 parameters, fixed once an index is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Config {
    /// Term frequency saturation. Larger values let repeated occurrences keep
    /// adding weight for longer. Must be finite and >= 0.
    pub k1: f64,
    /// Length normalization strength: 0 disables it, 1 normalizes fully.
    pub b: f64,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self { k1: DEFAULT_K1, b: DEFAULT_B }
    }
}

impl Bm25Config {
    pub fn new(k1: f64, b: f64) -> Result<Self> {
        let config = Self { k1, b };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() {
            return Err(Error::InvalidConfig { param: "k1", value: self.k1, reason: "must be finite" });
        }
        if self.k1 < 0.0 {
            return Err(Error::InvalidConfig { param: "k1", value: self.k1, reason: "must be >= 0" });
        }
        if !self.b.is_finite() || !(0.0..=1.0).contains(&self.b) {
            return Err(Error::InvalidConfig { param: "b", value: self.b, reason: "must be within [0, 1]" });
        }
        Ok(())
    }
}

/// Retriever-level settings: BM25 parameters plus the default cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub bm25: Bm25Config,
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { bm25: Bm25Config::default(), top_k: DEFAULT_TOP_K }
    }
}

impl RetrievalConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: RetrievalConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.bm25.validate()
    }
}
