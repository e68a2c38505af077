// src/cli.rs
use clap::Parser;

/// ct-verify: RFC 6962 SCT inclusion verifier
///
/// Verify that the Signed Certificate Timestamps embedded in a certificate
/// are genuinely included in the CT logs they claim, by recomputing each
/// log's Merkle root from an inclusion proof.
#[derive(Parser, Debug, Clone)]
#[command(name = "ct-verify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the PEM-encoded certificate to verify
    pub certificate: String,

    /// Path to the PEM-encoded issuer certificate
    pub issuer: String,

    /// Path to TOML config file
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override the CT log list URL from config
    #[arg(long = "log-list-url")]
    pub log_list_url: Option<String>,

    /// Verbose logging (set log level to debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Quiet logging (set log level to warn)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Validate flag combinations and return errors for invalid usage
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.verbose && self.quiet {
            anyhow::bail!("Cannot specify both --verbose and --quiet");
        }
        Ok(())
    }

    /// Determine log level based on verbose/quiet flags
    pub fn log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::parse_from(["ct-verify", "cert.pem", "issuer.pem"]);
        assert_eq!(cli.certificate, "cert.pem");
        assert_eq!(cli.issuer, "issuer.pem");
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_missing_issuer_is_usage_error() {
        assert!(Cli::try_parse_from(["ct-verify", "cert.pem"]).is_err());
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::parse_from(["ct-verify", "cert.pem", "issuer.pem", "-c", "custom.toml"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_log_list_url_override() {
        let cli = Cli::parse_from([
            "ct-verify",
            "cert.pem",
            "issuer.pem",
            "--log-list-url",
            "https://example.com/list.json",
        ]);
        assert_eq!(
            cli.log_list_url.as_deref(),
            Some("https://example.com/list.json")
        );
    }

    #[test]
    fn test_verbose_and_quiet_invalid() {
        let cli = Cli::parse_from(["ct-verify", "cert.pem", "issuer.pem", "-v", "-q"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_log_level_verbose() {
        let cli = Cli::parse_from(["ct-verify", "cert.pem", "issuer.pem", "--verbose"]);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_log_level_default() {
        let cli = Cli::parse_from(["ct-verify", "cert.pem", "issuer.pem"]);
        assert_eq!(cli.log_level(), "info");
    }
}
