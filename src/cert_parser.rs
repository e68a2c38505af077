// src/cert_parser.rs
use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use x509_cert::{
    Certificate,
    der::DecodePem,
    ext::pkix::SignedCertificateTimestampList,
};

use crate::error::VerifyError;

/// One SCT lifted out of a certificate's SCT-list extension
/// (OID 1.3.6.1.4.1.11129.2.4.2).
#[derive(Debug, Clone)]
pub struct EmbeddedSct {
    /// SHA-256 hash of the issuing log's public key
    pub log_id: [u8; 32],
    /// Milliseconds since epoch
    pub timestamp: u64,
    /// Opaque SCT extensions, 0-65535 bytes
    pub extensions: Vec<u8>,
}

impl EmbeddedSct {
    /// Log id in the base64 form the log list uses as a key
    pub fn log_id_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.log_id)
    }

    /// Log id as colon-separated hex, for diagnostics
    pub fn log_id_hex(&self) -> String {
        self.log_id
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// Load a single PEM-encoded certificate from disk
pub fn load_certificate_pem(path: &Path) -> Result<Certificate> {
    let pem = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read certificate file {}", path.display()))?;

    Certificate::from_pem(pem.as_bytes())
        .with_context(|| format!("Failed to parse PEM certificate {}", path.display()))
}

/// Extract all SCTs embedded in a certificate, in encoded order.
///
/// A certificate without the SCT-list extension legitimately carries no
/// SCTs, so absence yields an empty vector, not an error. An extension
/// that is present but undecodable is a `MalformedExtension` failure.
pub fn scts_from_cert(cert: &Certificate) -> Result<Vec<EmbeddedSct>, VerifyError> {
    let sct_list: SignedCertificateTimestampList = match cert.tbs_certificate.get() {
        Ok(Some((_, ext))) => ext,
        Ok(None) => return Ok(Vec::new()),
        Err(e) => {
            return Err(VerifyError::MalformedExtension(format!(
                "failed to decode SCT list extension: {}",
                e
            )));
        }
    };

    let serialized = sct_list
        .parse_timestamps()
        .map_err(|e| VerifyError::MalformedExtension(format!("failed to parse SCT list: {:?}", e)))?;

    let mut scts = Vec::with_capacity(serialized.len());
    for entry in serialized {
        let sct = entry
            .parse_timestamp()
            .map_err(|e| VerifyError::MalformedExtension(format!("failed to parse SCT: {:?}", e)))?;

        scts.push(EmbeddedSct {
            log_id: sct.log_id.key_id,
            timestamp: sct.timestamp,
            extensions: sct.extensions.clone().into(),
        });
    }

    Ok(scts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_cert_with_embedded_sct() {
        let cert = load_certificate_pem(&fixture("cert.pem")).unwrap();
        let scts = scts_from_cert(&cert).unwrap();

        assert_eq!(scts.len(), 1);
        assert_eq!(scts[0].timestamp, 1_700_000_000_000);
        assert!(scts[0].extensions.is_empty());
        // SHA-256("ct-verify test log"), the fixture's synthetic log id
        assert_eq!(
            scts[0].log_id_base64(),
            "3vsSHOVZBvuFdCFdwMV00G/XJLUnL1YLaVbPufGHugA="
        );
    }

    #[test]
    fn test_cert_without_sct_extension_is_empty_not_error() {
        let cert = load_certificate_pem(&fixture("issuer.pem")).unwrap();
        let scts = scts_from_cert(&cert).unwrap();
        assert!(scts.is_empty());
    }

    #[test]
    fn test_malformed_sct_extension() {
        let cert = load_certificate_pem(&fixture("cert-malformed-sct.pem")).unwrap();
        let err = scts_from_cert(&cert).unwrap_err();
        assert!(matches!(err, VerifyError::MalformedExtension(_)));
    }

    #[test]
    fn test_missing_certificate_file() {
        assert!(load_certificate_pem(Path::new("/nonexistent/cert.pem")).is_err());
    }

    #[test]
    fn test_log_id_hex_format() {
        let sct = EmbeddedSct {
            log_id: [0xde; 32],
            timestamp: 0,
            extensions: vec![],
        };
        assert!(sct.log_id_hex().starts_with("DE:DE:"));
    }
}
