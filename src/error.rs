// src/error.rs
use thiserror::Error;

/// Errors produced by the verification core.
///
/// Proof mismatches are deliberately not represented here: a recomputed root
/// that differs from the log's published root is a reportable verification
/// outcome, not an error.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// ASN.1 decode failure on the certificate itself
    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),

    /// SCT-list extension present but undecodable
    #[error("malformed SCT extension: {0}")]
    MalformedExtension(String),

    /// SCT references a log id the registry does not know
    #[error("CT log {0} not found in registry")]
    UnknownLog(String),

    /// Tree-head or proof fetch failure
    #[error("network error: {0}")]
    Network(String),

    /// Caller bypassed registry initialization
    #[error("log registry not initialized, call ensure_initialized() first")]
    RegistryUninitialized,
}

/// Result type for the verification core
pub type Result<T> = std::result::Result<T, VerifyError>;
