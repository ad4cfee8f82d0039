//! User-Agent signature matcher.

use super::{Matcher, SubstringSignatures};
use crate::verdict::{MatchedRule, RuleKind};

/// Matches configured substrings against the lower-cased User-Agent.
#[derive(Debug, Clone)]
pub struct UserAgentMatcher {
    signatures: SubstringSignatures,
}

impl UserAgentMatcher {
    pub fn new(signatures: &[String]) -> Self {
        Self {
            signatures: SubstringSignatures::compile(RuleKind::UserAgent, signatures),
        }
    }

    /// Number of usable signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Matcher for UserAgentMatcher {
    fn find(&self, ua: &str) -> Option<MatchedRule> {
        self.signatures.find(ua)
    }

    fn name(&self) -> &'static str {
        "user_agent_matcher"
    }
}
