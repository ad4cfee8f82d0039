//! Request-origin classifier.

use crate::config::SignatureConfig;
use crate::detectors::{ClassificationRequest, IpMatcher, Matcher, RefererMatcher, UserAgentMatcher};
use crate::verdict::Verdict;
use tracing::info;

/// Decides whether a request comes from automated traffic.
///
/// Built once from a [`SignatureConfig`] and immutable afterwards, so a
/// single instance can be shared across tasks behind an `Arc`.
#[derive(Debug, Clone)]
pub struct OriginClassifier {
    user_agent: UserAgentMatcher,
    ip: IpMatcher,
    referer: RefererMatcher,
}

impl OriginClassifier {
    /// Compile the signature sets.
    pub fn new(signatures: &SignatureConfig) -> Self {
        let classifier = Self {
            user_agent: UserAgentMatcher::new(&signatures.user_agents),
            ip: IpMatcher::new(
                &signatures.ip_exact,
                &signatures.ip_ranges,
                &signatures.ip_cidrs,
                &signatures.ip_patterns,
            ),
            referer: RefererMatcher::new(&signatures.referers),
        };

        let loaded: [(&dyn Matcher, usize); 3] = [
            (&classifier.user_agent, classifier.user_agent.len()),
            (&classifier.ip, classifier.ip.len()),
            (&classifier.referer, classifier.referer.len()),
        ];
        for (matcher, rules) in loaded {
            info!(matcher = matcher.name(), rules, "Signature matcher loaded");
        }

        classifier
    }

    /// Returns true if any User-Agent signature occurs in `ua`.
    pub fn classify_user_agent(&self, ua: &str) -> bool {
        self.user_agent.is_match(ua)
    }

    /// Returns true if `ip` hits any exact, range, CIDR or pattern rule.
    pub fn classify_ip(&self, ip: &str) -> bool {
        self.ip.is_match(ip)
    }

    /// Returns true if any Referer signature occurs in `referer`.
    pub fn classify_referer(&self, referer: &str) -> bool {
        self.referer.is_match(referer)
    }

    /// Classify a request, checking User-Agent, then IP, then Referer.
    ///
    /// The first attribute that matches is reported in the verdict.
    pub fn classify(&self, request: &ClassificationRequest) -> Verdict {
        let checks: [(&dyn Matcher, &str); 3] = [
            (&self.user_agent, request.user_agent()),
            (&self.ip, request.ip_address()),
            (&self.referer, request.referer()),
        ];

        checks
            .iter()
            .find_map(|(matcher, value)| matcher.find(value))
            .map(Verdict::bot)
            .unwrap_or_else(Verdict::browser)
    }
}

impl Default for OriginClassifier {
    fn default() -> Self {
        Self::new(&SignatureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::{MatchedSignal, RuleKind};

    fn classifier() -> OriginClassifier {
        OriginClassifier::new(&SignatureConfig {
            user_agents: vec!["bot".to_string(), "crawler".to_string()],
            ip_exact: vec!["198.51.100.23".to_string()],
            ip_ranges: vec![("10.0.0.0".to_string(), "10.0.0.255".to_string())],
            ip_cidrs: vec!["192.168.0.0/16".to_string()],
            ip_patterns: vec![r"203\.0\.113\.\d+".to_string()],
            referers: vec!["scanner.example".to_string()],
        })
    }

    const CHROME: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    #[test]
    fn test_browser_passes() {
        let c = classifier();
        let req = ClassificationRequest::new()
            .with_user_agent(CHROME)
            .with_ip_address("8.8.8.8")
            .with_referer("https://www.example.com/");
        let verdict = c.classify(&req);
        assert!(!verdict.is_bot());
        assert_eq!(verdict.signal, MatchedSignal::None);
    }

    #[test]
    fn test_each_signal() {
        let c = classifier();

        let v = c.classify(&ClassificationRequest::new().with_user_agent("Mozilla/5.0 Googlebot"));
        assert_eq!(v.signal, MatchedSignal::UserAgent);

        let v = c.classify(&ClassificationRequest::new().with_ip_address("192.168.5.5"));
        assert_eq!(v.signal, MatchedSignal::Ip);
        assert_eq!(v.rule.unwrap().kind, RuleKind::IpCidr);

        let v = c.classify(&ClassificationRequest::new().with_referer("https://scanner.example/x"));
        assert_eq!(v.signal, MatchedSignal::Referer);
    }

    #[test]
    fn test_user_agent_reported_first() {
        let c = classifier();
        let req = ClassificationRequest::new()
            .with_user_agent("crawler/1.0")
            .with_ip_address("10.0.0.1")
            .with_referer("https://scanner.example/");
        assert_eq!(c.classify(&req).signal, MatchedSignal::UserAgent);

        let req = ClassificationRequest::new()
            .with_user_agent(CHROME)
            .with_ip_address("10.0.0.1")
            .with_referer("https://scanner.example/");
        assert_eq!(c.classify(&req).signal, MatchedSignal::Ip);
    }

    #[test]
    fn test_empty_request() {
        let c = classifier();
        assert!(!c.classify(&ClassificationRequest::new()).is_bot());
        assert!(!c.classify_user_agent(""));
        assert!(!c.classify_ip(""));
        assert!(!c.classify_referer(""));
    }

    #[test]
    fn test_idempotent() {
        let c = classifier();
        let req = ClassificationRequest::new().with_ip_address("::ffff:10.0.0.9");
        assert_eq!(c.classify(&req), c.classify(&req));
    }

    #[test]
    fn test_default_classifier_flags_curl() {
        let c = OriginClassifier::default();
        assert!(c.classify_user_agent("curl/8.4.0"));
        assert!(!c.classify_user_agent(CHROME));
        assert!(!c.classify_ip("8.8.8.8"));
    }
}
