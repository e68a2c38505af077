// src/ct_log/client.rs
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

use super::types::{MerkleAuditProof, SignedTreeHead};

/// HTTP client for the Certificate Transparency log RFC 6962 API
pub struct CtLogClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl CtLogClient {
    /// Create a new CT log client for one log's base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            // Log list URLs carry a trailing slash
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Get Signed Tree Head (current log size, timestamp and root hash)
    /// Endpoint: GET {base_url}/ct/v1/get-sth
    pub async fn get_sth(&self) -> Result<SignedTreeHead> {
        let url = format!("{}/ct/v1/get-sth", self.base_url);

        debug!("Fetching STH from {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch STH")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "STH request failed with status {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        let sth: SignedTreeHead = response
            .json()
            .await
            .context("Failed to parse STH JSON")?;

        debug!(
            "STH received: tree_size={}, timestamp={}",
            sth.tree_size, sth.timestamp
        );

        Ok(sth)
    }

    /// Get an inclusion proof for a leaf hash at a given tree size
    /// Endpoint: GET {base_url}/ct/v1/get-proof-by-hash?hash=...&tree_size=...
    pub async fn get_proof_by_hash(
        &self,
        b64_leaf_hash: &str,
        tree_size: u64,
    ) -> Result<MerkleAuditProof> {
        let url = format!("{}/ct/v1/get-proof-by-hash", self.base_url);

        debug!(
            "Fetching inclusion proof for {} at tree_size={} from {}",
            b64_leaf_hash, tree_size, url
        );

        let tree_size = tree_size.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[("hash", b64_leaf_hash), ("tree_size", tree_size.as_str())])
            .send()
            .await
            .context("Failed to fetch inclusion proof")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Proof request failed with status {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        let proof: MerkleAuditProof = response
            .json()
            .await
            .context("Failed to parse inclusion proof JSON")?;

        debug!(
            "Proof received: leaf_index={}, path length={}",
            proof.leaf_index,
            proof.audit_path.len()
        );

        Ok(proof)
    }
}
