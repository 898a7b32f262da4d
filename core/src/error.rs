pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {param} = {value} ({reason})")]
    InvalidConfig {
        param: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("corpus of {0} documents exceeds the document id space")]
    CorpusTooLarge(usize),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
