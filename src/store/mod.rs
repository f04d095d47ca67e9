//! RAG EM API document store
//!
//! This module provides:
//! - The `DocumentStore` trait the ingester drives
//! - The form payload for the `storeDocument` action
//! - An HTTP client for the REDCap external module endpoint

mod http_backend;
mod payload;

pub use http_backend::*;
pub use payload::*;

use crate::error::Result;
use crate::models::Metadata;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of a `storeDocument` call.
///
/// Only `status` and `error` drive behavior; the rest is kept for reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl StoreResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// The `error` value as display text
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "no error reported".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Something that can store one section of text for embedding
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a single document; one call, no retries
    async fn store_document(
        &self,
        title: &str,
        content: &str,
        metadata: Option<&Metadata>,
    ) -> Result<StoreResponse>;
}
