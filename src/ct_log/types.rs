// src/ct_log/types.rs
use serde::{Deserialize, Serialize};

/// Response from CT log's get-sth endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTreeHead {
    pub tree_size: u64,
    pub timestamp: u64,
    pub sha256_root_hash: String,
    #[serde(default)]
    pub tree_head_signature: String,
}

/// Response from CT log's get-proof-by-hash endpoint.
///
/// The audit path length is whatever the log returned; this core does not
/// re-derive it from the tree size, the log server is the trust boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerkleAuditProof {
    pub leaf_index: u64,
    pub audit_path: Vec<String>,
}

/// Google's CT log list V3 format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtLogList {
    pub version: String,
    pub log_list_timestamp: String,
    pub operators: Vec<Operator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default)]
    pub logs: Vec<CtLog>,
}

/// Metadata for a single CT log from the log list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtLog {
    #[serde(default)]
    pub description: String,
    /// Base64 of the SHA-256 hash of the log's public key
    pub log_id: String,
    /// Base64 DER SubjectPublicKeyInfo
    #[serde(default)]
    pub key: String,
    pub url: String,
    /// Maximum merge delay in seconds
    #[serde(default = "default_mmd")]
    pub mmd: u64,
    #[serde(default)]
    pub state: Option<LogState>,
    #[serde(default)]
    pub temporal_interval: Option<TemporalInterval>,
}

fn default_mmd() -> u64 {
    86400
}

/// Lifecycle state of a CT log.
///
/// Exactly one state can exist at a time; the log list encodes it as an
/// object with a single key, which maps onto an externally tagged enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogState {
    Pending { timestamp: String },
    Qualified { timestamp: String },
    Usable { timestamp: String },
    Readonly {
        timestamp: String,
        final_tree_head: FinalTreeHead,
    },
    Retired { timestamp: String },
    Rejected { timestamp: String },
}

impl LogState {
    /// Whether the log is still accepting new entries
    pub fn is_usable(&self) -> bool {
        matches!(self, LogState::Usable { .. } | LogState::Qualified { .. })
    }

    pub fn is_readonly(&self) -> bool {
        matches!(self, LogState::Readonly { .. })
    }

    pub fn is_retired(&self) -> bool {
        matches!(self, LogState::Retired { .. })
    }
}

/// Frozen tree head recorded when a log goes readonly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalTreeHead {
    pub sha256_root_hash: String,
    pub tree_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalInterval {
    pub start_inclusive: String,
    pub end_exclusive: String,
}
