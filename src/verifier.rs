// src/verifier.rs
use std::time::Duration;

use anyhow::Result;
use base64::Engine;
use futures_util::future::join_all;
use tracing::{debug, warn};
use x509_cert::Certificate;

use crate::cert_parser::{self, EmbeddedSct};
use crate::ct_log::client::CtLogClient;
use crate::ct_log::registry::CtLogRegistry;
use crate::error::VerifyError;
use crate::leaf_hash::leaf_hash_for_precert;
use crate::merkle::{self, ProofVerification};

/// Verdict for one SCT.
///
/// Verification failure is a reportable result, not an error: a mismatching
/// root, an unknown log or a failed fetch never aborts the other SCTs.
#[derive(Debug, Clone)]
pub enum SctVerdict {
    /// Recomputed root matches the log's published root
    Verified(ProofVerification),
    /// Proof replayed cleanly but the roots differ
    RootMismatch(ProofVerification),
    /// SCT references a log id the registry does not know
    UnknownLog,
    /// Tree-head or proof fetch failed
    Network(String),
    /// Certificate could not be reassembled for hashing
    Malformed(String),
}

impl SctVerdict {
    pub fn is_verified(&self) -> bool {
        matches!(self, SctVerdict::Verified(_))
    }
}

/// Result of verifying one embedded SCT
#[derive(Debug, Clone)]
pub struct SctOutcome {
    /// Position of the SCT in the certificate's SCT list
    pub index: usize,
    /// Base64 log id the SCT claims
    pub log_id: String,
    /// Description from the registry, when the log is known
    pub log_description: Option<String>,
    pub verdict: SctVerdict,
}

/// Verify every SCT embedded in `cert` against the logs they claim.
///
/// SCT verifications are independent units of work: each resolves its log,
/// rebuilds the leaf hash, fetches the signed tree head plus an inclusion
/// proof, and replays the proof. They run concurrently and their per-unit
/// failures are captured in the returned outcomes.
///
/// Errors are reserved for malformed input that sinks the whole certificate
/// (an undecodable SCT-list extension).
pub async fn verify_embedded_scts(
    cert: &Certificate,
    issuer: &Certificate,
    registry: &CtLogRegistry,
    http_timeout: Duration,
) -> Result<Vec<SctOutcome>> {
    let scts = cert_parser::scts_from_cert(cert)?;
    debug!("Found {} SCTs in certificate", scts.len());

    let tasks = scts
        .iter()
        .enumerate()
        .map(|(index, sct)| verify_one_sct(index, sct, cert, issuer, registry, http_timeout));

    Ok(join_all(tasks).await)
}

async fn verify_one_sct(
    index: usize,
    sct: &EmbeddedSct,
    cert: &Certificate,
    issuer: &Certificate,
    registry: &CtLogRegistry,
    http_timeout: Duration,
) -> SctOutcome {
    let log_id = sct.log_id_base64();

    let log = match registry.get_by_id(&log_id).await {
        Ok(Some(log)) => log,
        Ok(None) => {
            warn!("CT Log {} not found", log_id);
            return SctOutcome {
                index,
                log_id,
                log_description: None,
                verdict: SctVerdict::UnknownLog,
            };
        }
        Err(e) => {
            return SctOutcome {
                index,
                log_id,
                log_description: None,
                verdict: SctVerdict::Network(format!("{:#}", e)),
            };
        }
    };

    let leaf_hash = match leaf_hash_for_precert(cert, issuer, sct.timestamp, &sct.extensions) {
        Ok(hash) => hash,
        Err(e) => {
            return SctOutcome {
                index,
                log_id,
                log_description: Some(log.description.clone()),
                verdict: SctVerdict::Malformed(e.to_string()),
            };
        }
    };

    let verdict = match fetch_and_verify(&log.url, &leaf_hash, http_timeout).await {
        Ok(result) if result.success => SctVerdict::Verified(result),
        Ok(result) => SctVerdict::RootMismatch(result),
        Err(e) => SctVerdict::Network(e.to_string()),
    };

    SctOutcome {
        index,
        log_id,
        log_description: Some(log.description),
        verdict,
    }
}

/// Fetch the signed tree head and an inclusion proof for `leaf_hash`,
/// then replay the proof against the tree head's root hash.
async fn fetch_and_verify(
    log_url: &str,
    leaf_hash: &[u8; 32],
    http_timeout: Duration,
) -> Result<ProofVerification, VerifyError> {
    let client =
        CtLogClient::new(log_url, http_timeout).map_err(|e| VerifyError::Network(format!("{:#}", e)))?;

    let sth = client
        .get_sth()
        .await
        .map_err(|e| VerifyError::Network(format!("{:#}", e)))?;

    let expected_root = base64::engine::general_purpose::STANDARD
        .decode(&sth.sha256_root_hash)
        .map_err(|e| VerifyError::Network(format!("undecodable sha256_root_hash in STH: {}", e)))?;

    let b64_leaf_hash = base64::engine::general_purpose::STANDARD.encode(leaf_hash);
    let proof = client
        .get_proof_by_hash(&b64_leaf_hash, sth.tree_size)
        .await
        .map_err(|e| VerifyError::Network(format!("{:#}", e)))?;

    Ok(merkle::verify_inclusion(&proof, leaf_hash, &expected_root))
}
