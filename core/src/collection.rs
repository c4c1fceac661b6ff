//! The collection document: a JSON file loaded and saved wholesale.
//!
//! The album array is either the whole document or sits under one of
//! [`WRAPPER_KEYS`]. Whatever shape was loaded is written back.

use crate::error::{Error, Result};
use crate::models::Album;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const WRAPPER_KEYS: [&str; 3] = ["records", "collection", "items"];

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    List,
    /// Object document; `key` names the album array if one was found.
    Wrapped {
        wrapper: Map<String, Value>,
        key: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDocument {
    shape: Shape,
    pub albums: Vec<Album>,
}

impl CollectionDocument {
    pub fn from_albums(albums: Vec<Album>) -> Self {
        Self {
            shape: Shape::List,
            albums,
        }
    }

    pub fn from_value(raw: Value) -> Result<Self> {
        match raw {
            Value::Array(items) => Ok(Self {
                shape: Shape::List,
                albums: parse_albums(items)?,
            }),
            Value::Object(mut wrapper) => {
                let key = WRAPPER_KEYS
                    .iter()
                    .find(|key| matches!(wrapper.get(**key), Some(Value::Array(_))))
                    .map(|key| key.to_string());

                let albums = match key.as_deref().and_then(|key| wrapper.remove(key)) {
                    Some(Value::Array(items)) => parse_albums(items)?,
                    _ => Vec::new(),
                };

                Ok(Self {
                    shape: Shape::Wrapped { wrapper, key },
                    albums,
                })
            }
            other => Err(Error::Collection(format!(
                "expected an array or object, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Result<Value> {
        let albums = self
            .albums
            .into_iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Collection(e.to_string()))?;

        Ok(match self.shape {
            Shape::List => Value::Array(albums),
            Shape::Wrapped { mut wrapper, key } => {
                if let Some(key) = key {
                    wrapper.insert(key, Value::Array(albums));
                }
                Value::Object(wrapper)
            }
        })
    }
}

fn parse_albums(items: Vec<Value>) -> Result<Vec<Album>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(_) => serde_json::from_value(item)
                .map_err(|e| Error::Collection(format!("record {}: {}", index, e))),
            other => Err(Error::Collection(format!(
                "record {} is {}, expected an object",
                index,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone)]
pub struct CollectionStore {
    path: PathBuf,
}

impl CollectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<CollectionDocument> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::io(&self.path, e))?;
        let raw: Value = serde_json::from_slice(&bytes).map_err(|e| Error::json(&self.path, e))?;
        CollectionDocument::from_value(raw)
    }

    /// Backs up the current file, then replaces it via a temp file.
    /// A failed backup is logged and does not stop the save.
    pub async fn save(&self, document: CollectionDocument) -> Result<()> {
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
            let backup_path = self.sibling(&format!(".bak.{}", timestamp));
            match tokio::fs::copy(&self.path, &backup_path).await {
                Ok(_) => tracing::info!("Backed up {:?} -> {:?}", self.path, backup_path),
                Err(e) => tracing::warn!("Failed to create backup {:?}: {}", backup_path, e),
            }
        }

        let value = document.into_value()?;
        let serialized =
            serde_json::to_vec_pretty(&value).map_err(|e| Error::json(&self.path, e))?;

        let temp_path = self.sibling(".tmp");
        tokio::fs::write(&temp_path, serialized)
            .await
            .map_err(|e| Error::io(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::io(&self.path, e))?;

        tracing::info!("Wrote {:?}", self.path);
        Ok(())
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}
