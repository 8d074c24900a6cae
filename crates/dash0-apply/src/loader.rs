//! Document loading
//!
//! Turns a file, stdin (`-`) or a directory tree into a flat list of
//! [`RawDocument`]s, one per YAML (or JSON) document.

use serde::Deserialize;
use serde_yaml::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{ApplyError, DocumentRef, Result};
use crate::kind::resolve_kind;

/// Path argument selecting stdin
pub const STDIN_PATH: &str = "-";

/// One document as read from the input
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Normalized kind name; empty when it could not be determined
    pub kind: String,
    /// The document re-serialized on its own, parseable without its neighbours
    pub content: String,
    /// File the document came from; `None` for stdin
    pub source_file: Option<PathBuf>,
    /// 1-based position of the document in its stream
    pub source_index: usize,
}

impl RawDocument {
    pub fn location(&self) -> DocumentRef {
        DocumentRef::new(self.source_file.clone(), self.source_index)
    }

    /// Decode the content generically
    pub fn value(&self) -> Result<Value> {
        serde_yaml::from_str(&self.content).map_err(|e| ApplyError::Yaml {
            location: self.location(),
            message: e.to_string(),
        })
    }
}

/// Load documents from a path, `-` meaning stdin
pub fn load(path: &str) -> Result<Vec<RawDocument>> {
    if path == STDIN_PATH {
        return load_reader(std::io::stdin().lock());
    }

    let path = Path::new(path);
    let metadata = std::fs::metadata(path).map_err(|e| ApplyError::io(path, e))?;
    if metadata.is_dir() {
        load_dir(path)
    } else {
        load_file(path)
    }
}

/// Load documents from a reader (stdin)
pub fn load_reader(mut reader: impl Read) -> Result<Vec<RawDocument>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| ApplyError::io("<stdin>", e))?;

    let documents = parse_stream(&content, None)?;
    if documents.is_empty() {
        return Err(ApplyError::EmptyInput {
            source_name: "stdin".to_string(),
        });
    }
    Ok(documents)
}

/// Load documents from a single file
pub fn load_file(path: &Path) -> Result<Vec<RawDocument>> {
    let documents = read_file(path)?;
    if documents.is_empty() {
        return Err(ApplyError::EmptyInput {
            source_name: path.display().to_string(),
        });
    }
    Ok(documents)
}

/// Load documents from every `.yaml`/`.yml` file under a directory
///
/// Files are visited in sorted path order; files without documents are skipped.
pub fn load_dir(dir: &Path) -> Result<Vec<RawDocument>> {
    let files = yaml_files(dir)?;
    if files.is_empty() {
        return Err(ApplyError::NoYamlFiles {
            path: dir.to_path_buf(),
        });
    }

    let mut documents = Vec::new();
    for file in files {
        let loaded = read_file(&file)?;
        if loaded.is_empty() {
            tracing::debug!(file = %file.display(), "skipping file without documents");
        }
        documents.extend(loaded);
    }

    if documents.is_empty() {
        return Err(ApplyError::EmptyInput {
            source_name: dir.display().to_string(),
        });
    }
    Ok(documents)
}

fn read_file(path: &Path) -> Result<Vec<RawDocument>> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplyError::io(path, e))?;
    parse_stream(&content, Some(path.to_path_buf()))
}

/// List YAML files under a directory, sorted
fn yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ApplyError::io(path, e.into())
        })?;
        let path = entry.path();
        if path.is_file() {
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "yaml" | "yml") {
                    files.push(path.to_path_buf());
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Split a YAML stream into documents
///
/// Empty documents are dropped. When the stream yields nothing but the input
/// is not blank, the whole input is parsed once as a single document.
pub fn parse_stream(content: &str, source_file: Option<PathBuf>) -> Result<Vec<RawDocument>> {
    let mut documents = Vec::new();

    for (position, de) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let index = position + 1;
        let value = Value::deserialize(de).map_err(|e| ApplyError::Yaml {
            location: DocumentRef::new(source_file.clone(), index),
            message: e.to_string(),
        })?;
        if let Some(document) = to_document(value, &source_file, index)? {
            documents.push(document);
        }
    }

    if documents.is_empty() && !content.trim().is_empty() {
        match serde_yaml::from_str::<Value>(content) {
            Ok(value) => {
                if let Some(document) = to_document(value, &source_file, 1)? {
                    documents.push(document);
                }
            }
            Err(e) => tracing::debug!(error = %e, "whole-input parse found no document"),
        }
    }

    Ok(documents)
}

fn to_document(
    value: Value,
    source_file: &Option<PathBuf>,
    index: usize,
) -> Result<Option<RawDocument>> {
    if value.is_null() {
        return Ok(None);
    }

    let content = serde_yaml::to_string(&value).map_err(|e| ApplyError::Yaml {
        location: DocumentRef::new(source_file.clone(), index),
        message: e.to_string(),
    })?;

    Ok(Some(RawDocument {
        kind: resolve_kind(&value),
        content,
        source_file: source_file.clone(),
        source_index: index,
    }))
}
