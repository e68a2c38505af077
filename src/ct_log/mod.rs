// src/ct_log/mod.rs
pub mod client;
pub mod log_list;
pub mod registry;
pub mod types;

pub use client::CtLogClient;
pub use log_list::LogListFetcher;
pub use registry::CtLogRegistry;
pub use types::{CtLog, CtLogList, LogState, MerkleAuditProof, SignedTreeHead};
