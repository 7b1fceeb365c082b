// src/models/mod.rs

//! Domain models for the watcher.
//!
//! This module contains the configuration tree and the document/record
//! types that flow through the pipeline.

mod config;
mod posting;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, DigestFormat, GithubConfig, NotifyConfig, NotifyMethod, RegionConfig,
    SourcesConfig, StorageConfig,
};
pub use posting::{CandidateLine, PostingRecord, SourceDocument, UNKNOWN};
