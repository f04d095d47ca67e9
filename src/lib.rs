//! rag-em-ingest - store rpp.v1 document sections in the RAG EM API
//!
//! This crate provides:
//! - Typed records for rpp.v1 bundles and per-section metadata
//! - A client for the REDCap `redcap_rag` external module's `storeDocument` action
//! - A sequential ingester that stores every section with text and reports outcomes

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
