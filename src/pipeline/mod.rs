// Request pipeline module - the resize flow from query to redirect
//
// parse key -> load dimension config -> resolve size -> fetch original
// -> resize -> store -> redirect
//
// Every step must succeed before the next one starts. The first failure ends
// the invocation; nothing is retried and nothing already written is undone.

mod context;

pub use context::RequestContext;

use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::dimensions::{DimensionConfig, Dimensions};
use crate::error::ResizeError;
use crate::metrics::Metrics;
use crate::request::ResizeRequest;
use crate::resizer::{resize_image, OutputFormat, IMAGE_MEDIA_PREFIX};
use crate::response::ResizeResponse;
use crate::storage::BlobStore;

/// Stage labels used for logging and the stage duration histogram
pub const STAGE_CONFIG: &str = "config";
pub const STAGE_FETCH: &str = "fetch";
pub const STAGE_RESIZE: &str = "resize";
pub const STAGE_STORE: &str = "store";

/// A validated original image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub body: Bytes,
    pub content_type: String,
}

pub struct ResizePipeline {
    config: Arc<Config>,
    store: Arc<dyn BlobStore>,
    metrics: Arc<Metrics>,
}

impl ResizePipeline {
    pub fn new(config: Arc<Config>, store: Arc<dyn BlobStore>, metrics: Arc<Metrics>) -> Self {
        Self {
            config,
            store,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Run one invocation and record its outcome
    pub async fn handle(&self, ctx: &RequestContext) -> Result<ResizeResponse, ResizeError> {
        let result = self.run(ctx).await;

        match &result {
            Ok(response) => {
                self.metrics.record_redirect();
                tracing::info!(
                    request_id = %ctx.request_id(),
                    location = response.location().unwrap_or_default(),
                    duration_ms = ctx.elapsed().as_millis() as u64,
                    "Resize completed"
                );
            }
            Err(e) => {
                self.metrics.record_error(e.kind());
                if e.is_client_error() {
                    tracing::warn!(
                        request_id = %ctx.request_id(),
                        error_type = e.kind(),
                        error = %e,
                        "Resize request rejected"
                    );
                } else {
                    tracing::error!(
                        request_id = %ctx.request_id(),
                        error_type = e.kind(),
                        error = %e,
                        "Resize request failed"
                    );
                }
            }
        }

        result
    }

    async fn run(&self, ctx: &RequestContext) -> Result<ResizeResponse, ResizeError> {
        let request = ResizeRequest::from_query(ctx.query_params())?;
        tracing::debug!(
            request_id = %ctx.request_id(),
            key = %request.key,
            original_key = %request.original_key,
            width = request.dimensions.width,
            height = request.dimensions.height,
            "Parsed resize request"
        );

        // Resolution never shrinks a size, so an oversized request is final
        let limits = self.config.dimension_limits();
        limits.validate(request.dimensions.width, request.dimensions.height)?;

        let dimension_config = self.load_dimension_config(ctx).await?;
        let target = dimension_config.resolve(request.dimensions);
        limits.validate(target.width, target.height)?;
        tracing::debug!(
            request_id = %ctx.request_id(),
            requested = %request.dimensions,
            resolved = %target,
            "Resolved target dimensions"
        );

        let source = self.fetch_original(ctx, &request.original_key).await?;
        let resized = self.resize(ctx, &source, target).await?;
        self.store(ctx, &request.key, resized, &source.content_type)
            .await?;

        Ok(ResizeResponse::redirect(&self.config.url, &request.key))
    }

    /// Fetch and parse the supported-dimensions blob
    pub async fn load_dimension_config(
        &self,
        ctx: &RequestContext,
    ) -> Result<DimensionConfig, ResizeError> {
        let started = Instant::now();
        let blob = self
            .store
            .get(&self.config.conf_bucket, &self.config.conf_file)
            .await?;
        let config = DimensionConfig::from_json(&blob.body)?;
        self.metrics.observe_stage(STAGE_CONFIG, started.elapsed());

        tracing::debug!(
            request_id = %ctx.request_id(),
            stage = STAGE_CONFIG,
            bucket = %self.config.conf_bucket,
            key = %self.config.conf_file,
            entries = config.supported_dimensions.len(),
            "Loaded dimension configuration"
        );
        Ok(config)
    }

    /// Fetch the original and check it is a usable image object
    pub async fn fetch_original(
        &self,
        ctx: &RequestContext,
        original_key: &str,
    ) -> Result<SourceImage, ResizeError> {
        let started = Instant::now();
        let object = self.store.get(&self.config.bucket, original_key).await?;
        self.metrics.observe_stage(STAGE_FETCH, started.elapsed());

        if object.body.is_empty() {
            return Err(ResizeError::InvalidAsset(format!(
                "object '{}' has no body",
                original_key
            )));
        }
        let content_type = match object.content_type {
            Some(ct) if !ct.trim().is_empty() => ct,
            _ => {
                return Err(ResizeError::InvalidAsset(format!(
                    "object '{}' has no content type",
                    original_key
                )))
            }
        };
        if !content_type.starts_with(IMAGE_MEDIA_PREFIX) {
            return Err(ResizeError::NotAnImage { content_type });
        }

        tracing::debug!(
            request_id = %ctx.request_id(),
            stage = STAGE_FETCH,
            bucket = %self.config.bucket,
            key = %original_key,
            content_type = %content_type,
            bytes = object.body.len(),
            "Fetched original image"
        );
        Ok(SourceImage {
            body: object.body,
            content_type,
        })
    }

    async fn resize(
        &self,
        ctx: &RequestContext,
        source: &SourceImage,
        target: Dimensions,
    ) -> Result<Bytes, ResizeError> {
        let format = OutputFormat::from_content_type(&source.content_type)?;
        let options = self.config.resize_options();
        let body = source.body.clone();

        let started = Instant::now();
        let resized = tokio::task::spawn_blocking(move || {
            resize_image(&body, target.width, target.height, format, options)
        })
        .await
        .map_err(|e| ResizeError::ResizeFailed(format!("resize task failed: {}", e)))??;
        self.metrics.observe_stage(STAGE_RESIZE, started.elapsed());

        tracing::debug!(
            request_id = %ctx.request_id(),
            stage = STAGE_RESIZE,
            width = target.width,
            height = target.height,
            format = format.as_str(),
            bytes = resized.len(),
            "Resized image"
        );
        Ok(Bytes::from(resized))
    }

    async fn store(
        &self,
        ctx: &RequestContext,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), ResizeError> {
        let size = body.len();
        let started = Instant::now();
        self.store
            .put(&self.config.bucket, key, body, content_type)
            .await?;
        self.metrics.observe_stage(STAGE_STORE, started.elapsed());
        self.metrics.add_stored_bytes(size);

        tracing::debug!(
            request_id = %ctx.request_id(),
            stage = STAGE_STORE,
            bucket = %self.config.bucket,
            key = %key,
            bytes = size,
            "Stored resized image"
        );
        Ok(())
    }
}
