//! Origin Guard for Zentinel
//!
//! Classifies incoming requests as automated traffic or browsers and
//! rejects the former with a plain not-found response.
//!
//! # Features
//!
//! - User-Agent substring signatures
//! - Client IP rules: exact fragments, numeric ranges, CIDR blocks, patterns
//! - Referer/Origin substring signatures
//! - axum middleware with X-Forwarded-For support
//!
//! # Example
//!
//! ```ignore
//! use zentinel_origin_guard::{ClassificationRequest, OriginClassifier, SignatureConfig};
//!
//! let classifier = OriginClassifier::new(&SignatureConfig::default());
//! let verdict = classifier.classify(
//!     &ClassificationRequest::new().with_user_agent("curl/8.4.0"),
//! );
//! assert!(verdict.is_bot());
//! ```

pub mod classifier;
pub mod config;
pub mod detectors;
pub mod middleware;
pub mod verdict;

pub use classifier::OriginClassifier;
pub use config::{OriginGuardConfig, SignatureConfig};
pub use detectors::ClassificationRequest;
pub use middleware::OriginGuard;
pub use verdict::{MatchedRule, MatchedSignal, RuleKind, Verdict};
