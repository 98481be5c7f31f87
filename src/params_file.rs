//! Parameter files.
//!
//! A parameter file is a JSON object. Keys may already be dotted
//! (`"item.0.service": "orders"`) or nested naturally
//! (`"item": [{"service": "orders"}]`); both flatten to the same key/value
//! table. Numbers and booleans are kept as their JSON text, `null` means absent.
//! Every key may be given once: a repeated JSON key is a duplicate just like a
//! dotted key colliding with a nested one.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParamsFileError {
    #[error("failed to read parameter file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: at JSON path {json_path} → {message}")]
    Json { path: PathBuf, json_path: String, message: String },

    #[error("duplicate parameter '{0}' after flattening")]
    Duplicate(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParamNode {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Null(()),
    List(Vec<ParamNode>),
    Table(Entries),
}

/// Object members in document order, repeated keys included.
#[derive(Debug)]
struct Entries(Vec<(String, ParamNode)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of parameters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, ParamNode>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

pub fn from_str(src: &str) -> Result<IndexMap<String, String>, ParamsFileError> {
    from_str_at(src, Path::new("<inline>"))
}

pub fn from_path(path: &Path) -> Result<IndexMap<String, String>, ParamsFileError> {
    let src = std::fs::read_to_string(path).map_err(|source| ParamsFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_str_at(&src, path)
}

fn from_str_at(src: &str, path: &Path) -> Result<IndexMap<String, String>, ParamsFileError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    let root = match serde_path_to_error::deserialize::<_, Entries>(de) {
        Ok(v) => v,
        Err(err) => {
            return Err(ParamsFileError::Json {
                path: path.to_path_buf(),
                json_path: err.path().to_string(),
                message: err.into_inner().to_string(),
            });
        }
    };
    let mut out = IndexMap::new();
    for (key, node) in root.0 {
        flatten_into(&mut out, key, node)?;
    }
    Ok(out)
}

fn flatten_into(out: &mut IndexMap<String, String>, key: String, node: ParamNode) -> Result<(), ParamsFileError> {
    let leaf = match node {
        ParamNode::Text(s) => s,
        ParamNode::Number(n) => n.to_string(),
        ParamNode::Flag(b) => b.to_string(),
        ParamNode::Null(()) => return Ok(()),
        ParamNode::List(items) => {
            for (index, item) in items.into_iter().enumerate() {
                flatten_into(out, format!("{key}.{index}"), item)?;
            }
            return Ok(());
        }
        ParamNode::Table(fields) => {
            for (name, item) in fields.0 {
                flatten_into(out, format!("{key}.{name}"), item)?;
            }
            return Ok(());
        }
    };
    if out.contains_key(&key) {
        return Err(ParamsFileError::Duplicate(key));
    }
    out.insert(key, leaf);
    Ok(())
}

/// Parse `key=value`; the value may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
