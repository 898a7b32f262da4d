use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Deserialize)]
pub struct InputDoc {
    pub id: String,
    pub body: String,
    /// Grouping key for chunks cut from the same document; defaults to `id`.
    #[serde(default)]
    pub source: Option<String>,
}

impl InputDoc {
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputQuery {
    pub source: String,
    pub query: String,
}

/// `.json` / `.jsonl` files under `input`, in sorted path order.
pub fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input path {} does not exist", input.display());
    }
    Ok(files)
}

/// Read records from one file: JSONL line by line, JSON as an array or a single object.
pub fn read_records<T: DeserializeOwned>(file: &Path) -> Result<Vec<T>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut out: Vec<T> = Vec::new();
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let rec: T = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: invalid record", file.display(), lineno + 1))?;
            out.push(rec);
        }
    } else {
        let json: serde_json::Value =
            serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
        match json {
            serde_json::Value::Array(arr) => {
                for v in arr {
                    out.push(serde_json::from_value(v)?);
                }
            }
            serde_json::Value::Object(_) => out.push(serde_json::from_value(json)?),
            _ => tracing::warn!(file = %file.display(), "skipping file without object or array"),
        }
    }
    Ok(out)
}

/// Every document under `input`; position in the result is the document id.
pub fn load_corpus(input: &Path) -> Result<Vec<InputDoc>> {
    let mut docs = Vec::new();
    for file in collect_files(input)? {
        let before = docs.len();
        docs.extend(read_records::<InputDoc>(&file)?);
        tracing::debug!(file = %file.display(), docs = docs.len() - before, "loaded corpus file");
    }
    Ok(docs)
}

pub fn load_queries(path: &Path) -> Result<Vec<InputQuery>> {
    read_records(path)
}
