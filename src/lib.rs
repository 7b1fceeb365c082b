// src/lib.rs

//! internwatch library
//!
//! Scans markdown job lists for new postings in a target region, dedups
//! them against a persisted seen set, and delivers a digest.

pub mod digest;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod sources;
pub mod storage;
pub mod utils;
