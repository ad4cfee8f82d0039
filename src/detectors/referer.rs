//! Referer/Origin signature matcher.

use super::{Matcher, SubstringSignatures};
use crate::verdict::{MatchedRule, RuleKind};

/// Matches configured substrings against the lower-cased Referer value.
#[derive(Debug, Clone)]
pub struct RefererMatcher {
    signatures: SubstringSignatures,
}

impl RefererMatcher {
    pub fn new(signatures: &[String]) -> Self {
        Self {
            signatures: SubstringSignatures::compile(RuleKind::Referer, signatures),
        }
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Matcher for RefererMatcher {
    fn find(&self, referer: &str) -> Option<MatchedRule> {
        self.signatures.find(referer)
    }

    fn name(&self) -> &'static str {
        "referer_matcher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referer_match() {
        let m = RefererMatcher::new(&["scanner.example".to_string()]);
        assert!(m.is_match("https://Scanner.Example/report?id=1"));
        assert!(!m.is_match("https://www.example.com/"));
        assert_eq!(
            m.find("http://scanner.example").unwrap().kind,
            RuleKind::Referer
        );
    }

    #[test]
    fn test_empty_referer() {
        let m = RefererMatcher::new(&["scanner.example".to_string()]);
        assert!(!m.is_match(""));
    }

    #[test]
    fn test_no_signatures() {
        let m = RefererMatcher::new(&[]);
        assert!(m.is_empty());
        assert!(!m.is_match("https://anything.example"));
        assert_eq!(m.name(), "referer_matcher");
    }
}
