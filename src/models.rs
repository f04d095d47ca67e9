//! Typed records for rpp.v1 document bundles and per-section metadata.
//!
//! Bundles are parsed and validated once on entry; missing or `null` ids and
//! text take the defaults the ingester has always used (`"unknown"` ids,
//! empty text).

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

fn unknown() -> Scalar {
    Scalar::Text("unknown".to_string())
}

fn empty() -> Scalar {
    Scalar::Text(String::new())
}

fn scalar_or_unknown<'de, D>(deserializer: D) -> std::result::Result<Scalar, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.unwrap_or_else(unknown))
}

fn scalar_or_empty<'de, D>(deserializer: D) -> std::result::Result<Scalar, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.unwrap_or_else(empty))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Only called when the key is present, so `null` becomes `Some(Scalar::Null)`
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Some)
}

/// Top-level rpp.v1 bundle (`documents[].sections[]`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RppBundle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    #[serde(default = "unknown", deserialize_with = "scalar_or_unknown")]
    pub doc_id: Scalar,

    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Source,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Source {
    #[serde(default = "empty", deserialize_with = "scalar_or_empty")]
    pub uri: Scalar,

    #[serde(
        rename = "type",
        default = "unknown",
        deserialize_with = "scalar_or_unknown"
    )]
    pub source_type: Scalar,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            uri: empty(),
            source_type: unknown(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    #[serde(default = "unknown", deserialize_with = "scalar_or_unknown")]
    pub section_id: Scalar,

    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    #[serde(default, deserialize_with = "present")]
    pub section_version: Option<Scalar>,

    #[serde(default, deserialize_with = "present")]
    pub section_updated: Option<Scalar>,

    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "present")]
    pub page: Option<Scalar>,

    #[serde(default, deserialize_with = "present")]
    pub section_title: Option<Scalar>,
}

/// A JSON scalar allowed as a metadata value
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::UInt(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

/// Flat metadata attached to a stored section
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Scalar>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.0.iter()
    }

    /// Serialize to the JSON string sent in the `metadata` form field
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl RppBundle {
    /// Parse and validate a bundle from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidBundle(e.to_string()))
    }

    /// Read and parse a bundle file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
            .map_err(|e| Error::InvalidBundle(format!("{}: {}", path.display(), e)))
    }

    pub fn section_count(&self) -> usize {
        self.documents.iter().map(|doc| doc.sections.len()).sum()
    }
}

impl Section {
    /// Sections without text are never stored
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Title sent to the API and printed in reports
    pub fn title(&self) -> String {
        self.section_id.to_string()
    }

    /// Build the flat metadata for this section within `doc`.
    ///
    /// Optional fields are copied only when their key is present (a present
    /// `null` stays `null`); `location.*` is flattened into `location_page` /
    /// `location_section_title`.
    pub fn metadata(&self, doc: &Document) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("doc_id", doc.doc_id.clone());
        metadata.insert("section_id", self.section_id.clone());
        metadata.insert("source_type", doc.source.source_type.clone());
        metadata.insert("source_uri", doc.source.uri.clone());

        if let Some(version) = &self.section_version {
            metadata.insert("section_version", version.clone());
        }
        if let Some(updated) = &self.section_updated {
            metadata.insert("section_updated", updated.clone());
        }

        if let Some(location) = &self.location {
            if let Some(page) = &location.page {
                metadata.insert("location_page", page.clone());
            }
            if let Some(title) = &location.section_title {
                metadata.insert("location_section_title", title.clone());
            }
        }

        metadata
    }
}
