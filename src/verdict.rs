//! Classification verdict types.

use serde::{Deserialize, Serialize};

/// Which request attribute produced a positive match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedSignal {
    /// User-Agent header
    UserAgent,
    /// Client IP address
    Ip,
    /// Referer header (or Origin when Referer is absent)
    Referer,
    /// Nothing matched
    #[default]
    None,
}

impl MatchedSignal {
    /// Returns the signal as a string for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchedSignal::UserAgent => "user_agent",
            MatchedSignal::Ip => "ip",
            MatchedSignal::Referer => "referer",
            MatchedSignal::None => "none",
        }
    }
}

/// The concrete rule family that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    UserAgent,
    IpExact,
    IpRange,
    IpCidr,
    IpPattern,
    Referer,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::UserAgent => "user_agent",
            RuleKind::IpExact => "ip_exact",
            RuleKind::IpRange => "ip_range",
            RuleKind::IpCidr => "ip_cidr",
            RuleKind::IpPattern => "ip_pattern",
            RuleKind::Referer => "referer",
        }
    }

    /// The request attribute this rule family inspects.
    pub fn signal(&self) -> MatchedSignal {
        match self {
            RuleKind::UserAgent => MatchedSignal::UserAgent,
            RuleKind::IpExact | RuleKind::IpRange | RuleKind::IpCidr | RuleKind::IpPattern => {
                MatchedSignal::Ip
            }
            RuleKind::Referer => MatchedSignal::Referer,
        }
    }
}

/// A single signature hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedRule {
    /// Rule family
    pub kind: RuleKind,
    /// Configured signature text that matched (range pairs render as `min-max`)
    pub signature: String,
}

impl MatchedRule {
    pub fn new(kind: RuleKind, signature: impl Into<String>) -> Self {
        Self {
            kind,
            signature: signature.into(),
        }
    }
}

/// Outcome of classifying one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// First signal that fired in evaluation order
    pub signal: MatchedSignal,
    /// Rule detail for diagnostics
    pub rule: Option<MatchedRule>,
}

impl Verdict {
    /// Verdict for a request that matched nothing.
    pub fn browser() -> Self {
        Self::default()
    }

    /// Verdict for a request flagged by `rule`.
    pub fn bot(rule: MatchedRule) -> Self {
        Self {
            signal: rule.kind.signal(),
            rule: Some(rule),
        }
    }

    /// Returns true if the request is automated traffic.
    pub fn is_bot(&self) -> bool {
        self.signal != MatchedSignal::None
    }
}
