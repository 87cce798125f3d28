// Request context - everything the pipeline needs to know about one request

use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::request::parse_query_string;

/// Request context that holds all information about an HTTP request
/// as it flows through the resize pipeline
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    query_params: HashMap<String, String>,
    started_at: Instant,
}

impl RequestContext {
    /// Create a new RequestContext from HTTP request information
    /// Automatically generates a unique request ID (UUID v4) and captures the start time
    pub fn new(method: String, path: String) -> Self {
        Self::with_query_params(method, path, HashMap::new())
    }

    /// Create a new RequestContext with already decoded query parameters
    pub fn with_query_params(
        method: String,
        path: String,
        query_params: HashMap<String, String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            path,
            query_params,
            started_at: Instant::now(),
        }
    }

    /// Create a new RequestContext from a raw (still percent-encoded) query string
    pub fn from_raw_query(method: String, path: String, query: Option<&str>) -> Self {
        let params = query.map(parse_query_string).unwrap_or_default();
        Self::with_query_params(method, path, params)
    }

    /// Get the unique request ID
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Time since the context was created
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
