//! Configuration types for the Origin Guard.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the Origin Guard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginGuardConfig {
    /// Reference signature sets
    pub signatures: SignatureConfig,

    /// Client IP extraction settings
    pub client_ip: ClientIpConfig,

    /// Response sent to blocked requests
    pub response: BlockResponseConfig,
}

impl OriginGuardConfig {
    /// Load configuration from a JSON or YAML file (chosen by extension).
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        load_file(path)
    }
}

/// Signature sets consulted by the classifier.
///
/// Matching on `user_agents`, `ip_exact` and `referers` is substring
/// containment, not equality. A short fragment such as `"10."` matches every
/// address containing it. This is deliberately broad; keep entries specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// User-Agent substrings (case-insensitive)
    pub user_agents: Vec<String>,

    /// IP fragments, matched by containment after `::ffff:` stripping
    pub ip_exact: Vec<String>,

    /// Inclusive dotted-quad `[min, max]` pairs
    pub ip_ranges: Vec<(String, String)>,

    /// CIDR blocks (a bare address is a single-host block)
    pub ip_cidrs: Vec<String>,

    /// Regular expressions searched (unanchored) in the IP string
    pub ip_patterns: Vec<String>,

    /// Referer/Origin substrings (case-insensitive)
    pub referers: Vec<String>,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            user_agents: default_user_agents(),
            ip_exact: vec![],
            ip_ranges: vec![],
            ip_cidrs: vec![],
            ip_patterns: vec![],
            referers: vec![],
        }
    }
}

impl SignatureConfig {
    /// Load a standalone signatures file (JSON or YAML).
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        load_file(path)
    }
}

/// Generic automation markers found in crawler and scripted-client UAs.
fn default_user_agents() -> Vec<String> {
    [
        // Generic crawler indicators
        "bot",
        "crawler",
        "spider",
        "scraper",
        // Command-line tools
        "curl",
        "wget",
        "httpie",
        // Programming libraries
        "python-requests",
        "python-urllib",
        "go-http-client",
        "okhttp",
        "node-fetch",
        // Headless browsers
        "headless",
        "phantomjs",
        "puppeteer",
        "playwright",
        "selenium",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Client IP extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientIpConfig {
    /// Take the client IP from the forwarded header when present
    pub trust_forwarded_for: bool,

    /// Forwarded header name
    pub forwarded_header: String,

    /// Keep only the first comma-separated hop instead of the whole header
    /// value. With the whole value, exact fragments and patterns can match
    /// any hop in the chain.
    pub first_hop_only: bool,
}

impl Default for ClientIpConfig {
    fn default() -> Self {
        Self {
            trust_forwarded_for: true,
            forwarded_header: "x-forwarded-for".to_string(),
            first_hop_only: false,
        }
    }
}

/// Response for blocked requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockResponseConfig {
    /// HTTP status code
    pub status: u16,

    /// Plain-text body
    pub body: String,
}

impl Default for BlockResponseConfig {
    fn default() -> Self {
        Self {
            status: 404,
            body: "Not Found".to_string(),
        }
    }
}

fn load_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OriginGuardConfig::default();
        assert!(config.signatures.user_agents.contains(&"bot".to_string()));
        assert!(config.signatures.ip_cidrs.is_empty());
        assert!(config.client_ip.trust_forwarded_for);
        assert_eq!(config.client_ip.forwarded_header, "x-forwarded-for");
        assert!(!config.client_ip.first_hop_only);
        assert_eq!(config.response.status, 404);
        assert_eq!(config.response.body, "Not Found");
    }

    #[test]
    fn test_config_serialization() {
        let config = OriginGuardConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: OriginGuardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.signatures, config.signatures);
        assert_eq!(parsed.response.status, config.response.status);
    }

    #[test]
    fn test_ranges_parse_as_pairs() {
        let json = r#"{"ip_ranges": [["10.0.0.0", "10.0.0.255"]]}"#;
        let sigs: SignatureConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            sigs.ip_ranges,
            vec![("10.0.0.0".to_string(), "10.0.0.255".to_string())]
        );
        // Unspecified fields fall back to defaults
        assert!(!sigs.user_agents.is_empty());
    }

    #[test]
    fn test_yaml_config() {
        let yaml = r#"
signatures:
  user_agents: [crawler]
  ip_cidrs: ["192.168.0.0/16"]
  ip_ranges:
    - ["10.0.0.0", "10.0.0.255"]
response:
  status: 410
"#;
        let config: OriginGuardConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.signatures.user_agents, vec!["crawler".to_string()]);
        assert_eq!(config.signatures.ip_cidrs, vec!["192.168.0.0/16".to_string()]);
        assert_eq!(config.signatures.ip_ranges.len(), 1);
        assert_eq!(config.response.status, 410);
        assert_eq!(config.response.body, "Not Found");
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = OriginGuardConfig::from_path(Path::new("/nonexistent/origin-guard.json"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
