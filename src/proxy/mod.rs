// Proxy module - Pingora ProxyHttp implementation
//
// Nothing is ever proxied upstream: every request is answered from
// request_filter, either by a built-in endpoint or by running the resize
// pipeline and writing its redirect or error.

pub mod special_endpoints;

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::metrics::Metrics;
use crate::pipeline::{RequestContext, ResizePipeline};
use crate::response::ResizeResponse;
use crate::storage::BlobStore;
use special_endpoints::{
    handle_health, handle_method_not_allowed, handle_metrics, handle_pipeline_error,
    EndpointResponse, HEALTH_PATH, METRICS_PATH,
};

/// ResizeService implements the Pingora ProxyHttp trait
/// and serves the resize pipeline over HTTP
pub struct ResizeService {
    pipeline: ResizePipeline,
    metrics: Arc<Metrics>,
    /// Service start time (for uptime calculation in /health endpoint)
    start_time: Instant,
}

impl ResizeService {
    pub fn new(config: Arc<Config>, store: Arc<dyn BlobStore>) -> Self {
        let metrics = Arc::new(Metrics::new());
        let pipeline = ResizePipeline::new(config, store, metrics.clone());

        Self {
            pipeline,
            metrics,
            start_time: Instant::now(),
        }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Decide what a request gets, without touching the session
    ///
    /// HEAD is answered by the built-in endpoints only. The pipeline writes
    /// to the bucket, so it runs for GET alone.
    pub async fn respond(&self, ctx: &RequestContext) -> Reply {
        match (ctx.method(), ctx.path()) {
            ("GET" | "HEAD", HEALTH_PATH) => Reply::Endpoint(handle_health(self.start_time)),
            ("GET" | "HEAD", METRICS_PATH) => Reply::Endpoint(handle_metrics(&self.metrics)),
            ("GET", _) => match self.pipeline.handle(ctx).await {
                Ok(redirect) => Reply::Redirect(redirect),
                Err(e) => Reply::Endpoint(handle_pipeline_error(&e)),
            },
            (method, _) => Reply::Endpoint(handle_method_not_allowed(method)),
        }
    }

    async fn write_endpoint(
        session: &mut Session,
        response: EndpointResponse,
        head_only: bool,
    ) -> Result<()> {
        let mut header = ResponseHeader::build(response.status, None)?;
        header.insert_header("Content-Type", response.content_type)?;
        header.insert_header("Content-Length", response.body.len().to_string())?;

        session
            .write_response_header(Box::new(header), head_only)
            .await?;
        if !head_only {
            session
                .write_response_body(Some(response.body.into()), true)
                .await?;
        }
        Ok(())
    }

    async fn write_redirect(session: &mut Session, redirect: ResizeResponse) -> Result<()> {
        let mut header = ResponseHeader::build(redirect.status_code, None)?;
        for (name, value) in redirect.headers {
            header.insert_header(name, value)?;
        }
        header.insert_header("Content-Length", redirect.body.len().to_string())?;

        session.write_response_header(Box::new(header), true).await?;
        Ok(())
    }
}

/// What gets written back for one request
#[derive(Debug, Clone)]
pub enum Reply {
    Redirect(ResizeResponse),
    Endpoint(EndpointResponse),
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Reply::Redirect(r) => r.status_code,
            Reply::Endpoint(r) => r.status,
        }
    }
}

#[async_trait]
impl ProxyHttp for ResizeService {
    type CTX = RequestContext;

    /// Create a new request context for each incoming request
    fn new_ctx(&self) -> Self::CTX {
        RequestContext::new("GET".to_string(), "/".to_string())
    }

    /// Requests never reach an upstream; request_filter answers all of them
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "resize service has no upstream",
        ))
    }

    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        *ctx = RequestContext::from_raw_query(
            req.method.to_string(),
            req.uri.path().to_string(),
            req.uri.query(),
        );
        let head_only = ctx.method() == "HEAD";

        tracing::debug!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            "Received request"
        );

        match self.respond(ctx).await {
            Reply::Redirect(redirect) => Self::write_redirect(session, redirect).await?,
            Reply::Endpoint(response) => {
                Self::write_endpoint(session, response, head_only).await?
            }
        }

        Ok(true) // Request handled
    }

    /// Log request completion
    async fn logging(
        &self,
        session: &mut Session,
        e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let status_code = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(500);

        if let Some(e) = e {
            tracing::error!(
                request_id = %ctx.request_id(),
                error = %e,
                "Request ended with a server error"
            );
        }

        tracing::info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            status_code = status_code,
            duration_ms = ctx.elapsed().as_millis() as u64,
            "Request completed"
        );
    }
}
