//! Client IP signature matcher.
//!
//! Checks a client address against four rule families, in order:
//! - Exact fragments (substring containment)
//! - Numeric dotted-quad ranges
//! - CIDR blocks
//! - Regular-expression patterns
//!
//! A leading `::ffff:` (IPv4-mapped IPv6) prefix is removed before any check.

use super::Matcher;
use crate::verdict::{MatchedRule, RuleKind};
use ipnet::IpNet;
use regex::Regex;
use std::net::IpAddr;
use tracing::warn;

const MAPPED_PREFIX: &str = "::ffff:";

/// Strip a leading IPv4-mapped IPv6 prefix.
pub fn normalize(ip: &str) -> &str {
    match ip.get(..MAPPED_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(MAPPED_PREFIX) => &ip[MAPPED_PREFIX.len()..],
        _ => ip,
    }
}

/// Encode a dotted quad as its zero-padded octets concatenated.
///
/// `10.0.0.255` becomes `010000000255`. Returns `None` unless the input is
/// exactly four decimal octets in `0..=255`, so `10.0.0.256` never lands
/// inside a range.
pub fn octet_number(ip: &str) -> Option<u64> {
    let mut value = 0u64;
    let mut octets = 0;

    for part in ip.split('.') {
        if octets == 4 || part.is_empty() || part.len() > 3 {
            return None;
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let octet: u64 = part.parse().ok()?;
        if octet > 255 {
            return None;
        }
        value = value * 1000 + octet;
        octets += 1;
    }

    (octets == 4).then_some(value)
}

/// Inclusive numeric range.
#[derive(Debug, Clone)]
struct NumericRange {
    min: u64,
    max: u64,
    label: String,
}

impl NumericRange {
    fn contains(&self, value: u64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// IP matcher with all rule families compiled up front.
#[derive(Debug, Clone)]
pub struct IpMatcher {
    exact: Vec<String>,
    ranges: Vec<NumericRange>,
    cidrs: Vec<(IpNet, String)>,
    patterns: Vec<Regex>,
}

impl IpMatcher {
    /// Compile the rule families. Malformed entries are logged and skipped.
    pub fn new(
        exact: &[String],
        ranges: &[(String, String)],
        cidrs: &[String],
        patterns: &[String],
    ) -> Self {
        let exact = exact
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect();

        let ranges = ranges
            .iter()
            .filter_map(|(min, max)| Self::compile_range(min, max))
            .collect();

        let cidrs = cidrs
            .iter()
            .filter_map(|c| Self::compile_cidr(c))
            .collect();

        let patterns = patterns
            .iter()
            .filter_map(|p| Self::compile_pattern(p))
            .collect();

        Self {
            exact,
            ranges,
            cidrs,
            patterns,
        }
    }

    fn compile_range(min: &str, max: &str) -> Option<NumericRange> {
        match (octet_number(min.trim()), octet_number(max.trim())) {
            (Some(lo), Some(hi)) => {
                if lo > hi {
                    warn!(min, max, "IP range has min above max and will never match");
                }
                Some(NumericRange {
                    min: lo,
                    max: hi,
                    label: format!("{}-{}", min.trim(), max.trim()),
                })
            }
            _ => {
                warn!(min, max, "Skipping IP range with non dotted-quad bound");
                None
            }
        }
    }

    fn compile_cidr(entry: &str) -> Option<(IpNet, String)> {
        let entry = entry.trim();
        let net = entry.parse::<IpNet>().ok().or_else(|| {
            let addr: IpAddr = entry.parse().ok()?;
            let prefix = if addr.is_ipv4() { 32 } else { 128 };
            IpNet::new(addr, prefix).ok()
        });

        match net {
            Some(net) => Some((net, entry.to_string())),
            None => {
                warn!(cidr = entry, "Skipping invalid CIDR block");
                None
            }
        }
    }

    fn compile_pattern(pattern: &str) -> Option<Regex> {
        if pattern.is_empty() {
            warn!("Skipping empty IP pattern");
            return None;
        }
        match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern, error = %e, "Skipping invalid IP pattern");
                None
            }
        }
    }

    /// Number of usable rules across all families.
    pub fn len(&self) -> usize {
        self.exact.len() + self.ranges.len() + self.cidrs.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find_exact(&self, ip: &str) -> Option<MatchedRule> {
        self.exact
            .iter()
            .find(|e| ip.contains(e.as_str()))
            .map(|e| MatchedRule::new(RuleKind::IpExact, e.clone()))
    }

    fn find_range(&self, ip: &str) -> Option<MatchedRule> {
        let value = octet_number(ip)?;
        self.ranges
            .iter()
            .find(|r| r.contains(value))
            .map(|r| MatchedRule::new(RuleKind::IpRange, r.label.clone()))
    }

    fn find_cidr(&self, ip: &str) -> Option<MatchedRule> {
        let addr: IpAddr = ip.parse().ok()?;
        self.cidrs
            .iter()
            .find(|(net, _)| net.contains(&addr))
            .map(|(_, label)| MatchedRule::new(RuleKind::IpCidr, label.clone()))
    }

    fn find_pattern(&self, ip: &str) -> Option<MatchedRule> {
        self.patterns
            .iter()
            .find(|re| re.is_match(ip))
            .map(|re| MatchedRule::new(RuleKind::IpPattern, re.as_str()))
    }
}

impl Matcher for IpMatcher {
    fn find(&self, ip: &str) -> Option<MatchedRule> {
        let ip = normalize(ip);
        if ip.is_empty() {
            return None;
        }

        self.find_exact(ip)
            .or_else(|| self.find_range(ip))
            .or_else(|| self.find_cidr(ip))
            .or_else(|| self.find_pattern(ip))
    }

    fn name(&self) -> &'static str {
        "ip_matcher"
    }
}
