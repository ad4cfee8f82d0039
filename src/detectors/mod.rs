//! Signature matchers.
//!
//! Each matcher inspects one request attribute and reports the first
//! configured signature it finds.

pub mod ip;
pub mod referer;
pub mod user_agent;

pub use ip::IpMatcher;
pub use referer::RefererMatcher;
pub use user_agent::UserAgentMatcher;

use crate::verdict::{MatchedRule, RuleKind};
use tracing::warn;

/// Request attributes consulted by the classifier.
///
/// Absent fields are treated as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationRequest {
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Client IP address as text
    pub ip_address: Option<String>,
    /// Referer header, or Origin when Referer is absent
    pub referer: Option<String>,
}

impl ClassificationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or_default()
    }

    pub fn ip_address(&self) -> &str {
        self.ip_address.as_deref().unwrap_or_default()
    }

    pub fn referer(&self) -> &str {
        self.referer.as_deref().unwrap_or_default()
    }
}

/// Trait for signature matchers.
pub trait Matcher: Send + Sync {
    /// Return the first rule matching `value`, if any.
    fn find(&self, value: &str) -> Option<MatchedRule>;

    /// Returns true if any rule matches `value`.
    fn is_match(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    /// Get the matcher name.
    fn name(&self) -> &'static str;
}

/// Lower-cased substring signatures, shared by the UA and Referer matchers.
#[derive(Debug, Clone)]
pub(crate) struct SubstringSignatures {
    kind: RuleKind,
    entries: Vec<String>,
}

impl SubstringSignatures {
    pub(crate) fn compile(kind: RuleKind, entries: &[String]) -> Self {
        let entries = entries
            .iter()
            .filter_map(|e| {
                let e = e.trim().to_lowercase();
                if e.is_empty() {
                    warn!(kind = kind.as_str(), "Skipping empty signature");
                    None
                } else {
                    Some(e)
                }
            })
            .collect();

        Self { kind, entries }
    }

    pub(crate) fn find(&self, value: &str) -> Option<MatchedRule> {
        if value.is_empty() {
            return None;
        }

        let value = value.to_lowercase();
        self.entries
            .iter()
            .find(|sig| value.contains(sig.as_str()))
            .map(|sig| MatchedRule::new(self.kind, sig.clone()))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
