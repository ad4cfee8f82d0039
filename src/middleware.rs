//! HTTP middleware that rejects automated traffic.
//!
//! ```ignore
//! let guard = Arc::new(OriginGuard::new(config)?);
//! let app = middleware::router(guard, Path::new("public"));
//! ```

use crate::classifier::OriginClassifier;
use crate::config::{ClientIpConfig, OriginGuardConfig};
use crate::detectors::ClassificationRequest;
use anyhow::Context;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, info};

/// Classifier plus the request/response settings around it.
#[derive(Debug, Clone)]
pub struct OriginGuard {
    classifier: OriginClassifier,
    client_ip: ClientIpConfig,
    block_status: StatusCode,
    block_body: String,
}

impl OriginGuard {
    /// Build the guard. Fails if the configured block status is not a valid HTTP status.
    pub fn new(config: OriginGuardConfig) -> anyhow::Result<Self> {
        let block_status = StatusCode::from_u16(config.response.status)
            .with_context(|| format!("invalid block status {}", config.response.status))?;

        Ok(Self {
            classifier: OriginClassifier::new(&config.signatures),
            client_ip: config.client_ip,
            block_status,
            block_body: config.response.body,
        })
    }

    pub fn classifier(&self) -> &OriginClassifier {
        &self.classifier
    }

    /// Pull User-Agent, client IP and Referer from a request.
    pub fn build_request(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> ClassificationRequest {
        let forwarded = if self.client_ip.trust_forwarded_for {
            let value = header_str(headers, &self.client_ip.forwarded_header);
            if self.client_ip.first_hop_only {
                value.and_then(|v| v.split(',').next()).map(str::trim)
            } else {
                value.map(str::trim)
            }
        } else {
            None
        };

        ClassificationRequest {
            user_agent: header_str(headers, header::USER_AGENT.as_str()).map(String::from),
            ip_address: non_empty(forwarded)
                .map(String::from)
                .or_else(|| peer.map(|addr| addr.ip().to_string())),
            referer: non_empty(header_str(headers, header::REFERER.as_str()))
                .or_else(|| header_str(headers, header::ORIGIN.as_str()))
                .map(String::from),
        }
    }

    fn block_response(&self) -> Response {
        (self.block_status, self.block_body.clone()).into_response()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// Empty header values fall through to the next source.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Router serving `static_dir` behind the guard. `/health` bypasses it.
pub fn router(guard: Arc<OriginGuard>, static_dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn_with_state(guard, self::guard))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
}

/// Middleware entry point for `axum::middleware::from_fn_with_state`.
pub async fn guard(State(guard): State<Arc<OriginGuard>>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let req = guard.build_request(request.headers(), peer);
    let verdict = guard.classifier().classify(&req);

    if verdict.is_bot() {
        let (rule_kind, signature) = verdict
            .rule
            .as_ref()
            .map(|r| (r.kind.as_str(), r.signature.as_str()))
            .unwrap_or_default();

        info!(
            user_agent = req.user_agent(),
            client_ip = req.ip_address(),
            referer = req.referer(),
            signal = verdict.signal.as_str(),
            rule = rule_kind,
            signature,
            path = %request.uri().path(),
            "Blocked request"
        );
        return guard.block_response();
    }

    debug!(
        client_ip = req.ip_address(),
        path = %request.uri().path(),
        "Request passed origin check"
    );
    next.run(request).await
}
