//! Stateless HTTP request builder and response parser for Rhino Compute.
//!
//! # Design
//! `ComputeClient` holds only the base URL and the credentials attached to
//! every request; it carries no mutable state between calls. Each operation
//! is split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. A `Transport` executes
//! the round-trip in between, keeping this type deterministic and free of
//! I/O.

use serde::Deserialize;
use serde_json::Value;

use crate::batch;
use crate::config::ComputeConfig;
use crate::decode::Output;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::intersection::Operation;

const USER_AGENT: &str = concat!("compute.rhino3d.rs/", env!("CARGO_PKG_VERSION"));

/// Versions reported by `GET /version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub rhino: String,
    #[serde(default)]
    pub compute: String,
    #[serde(default)]
    pub git_sha: Option<String>,
}

/// Synchronous, stateless client for the compute service.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    base_url: String,
    api_key: Option<String>,
    auth_token: Option<String>,
    stop_at: Option<u32>,
}

impl ComputeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            auth_token: None,
            stop_at: None,
        }
    }

    pub fn from_config(config: &ComputeConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            auth_token: config.auth_token.clone(),
            stop_at: config.stop_at,
            ..Self::new(&config.url)
        }
    }

    /// Sent as the `RhinoComputeKey` header.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sent as `Authorization: Bearer <token>`.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Ask the server to stop evaluating after `stop_at` steps (debugging aid).
    pub fn with_stop_at(mut self, stop_at: u32) -> Self {
        self.stop_at = Some(stop_at);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `path`, with the batching flag and `stopat` appended
    /// as needed.
    pub fn endpoint_url(&self, path: &str, multiple: bool) -> String {
        let mut url = format!("{}/{}", self.base_url, path);
        let mut separator = '?';
        if multiple {
            url.push_str("?multiple=true");
            separator = '&';
        }
        if let Some(stop_at) = self.stop_at {
            url.push(separator);
            url.push_str(&format!("stopat={stop_at}"));
        }
        url
    }

    /// Build a single call of `op`.
    ///
    /// # Panics
    /// If `args.len()` differs from the operation's arity.
    pub fn build_call(&self, op: Operation, args: &[Value]) -> Result<HttpRequest, ApiError> {
        let descriptor = op.descriptor();
        assert_eq!(
            args.len(),
            descriptor.arity(),
            "{} takes {} arguments ({:?})",
            descriptor.name,
            descriptor.arity(),
            descriptor.params
        );
        let body = serde_json::to_string(args).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.post(self.endpoint_url(descriptor.path, false), body))
    }

    /// Build a batched call of `op`: one column per parameter, transposed
    /// into one argument tuple per item.
    ///
    /// Columns of different lengths are truncated to the shortest.
    ///
    /// # Panics
    /// If `columns.len()` differs from the operation's arity.
    pub fn build_call_multiple(&self, op: Operation, columns: Vec<Vec<Value>>) -> Result<HttpRequest, ApiError> {
        let descriptor = op.descriptor();
        assert_eq!(
            columns.len(),
            descriptor.arity(),
            "{} takes {} argument lists ({:?})",
            descriptor.name,
            descriptor.arity(),
            descriptor.params
        );
        if !batch::is_rectangular(&columns) {
            let lengths: Vec<usize> = columns.iter().map(Vec::len).collect();
            tracing::warn!(
                operation = descriptor.name,
                ?lengths,
                "batched argument lists differ in length, extra items are dropped"
            );
        }
        let rows: Vec<Vec<Value>> = batch::transpose(columns).collect();
        let body = serde_json::to_string(&rows).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.post(self.endpoint_url(descriptor.path, true), body))
    }

    pub fn build_healthcheck(&self) -> HttpRequest {
        self.get(format!("{}/healthcheck", self.base_url))
    }

    pub fn build_version(&self) -> HttpRequest {
        self.get(format!("{}/version", self.base_url))
    }

    /// Decode the response to a single call, applying the operation's
    /// decoder when it declares one.
    pub fn parse_call(&self, op: Operation, response: HttpResponse) -> Result<Output, ApiError> {
        let raw = parse_json(response)?;
        Output::from_raw(raw, op.descriptor().decode)
    }

    /// Decode the response to a batched call: a JSON array with one result
    /// per item, each decoded on its own.
    pub fn parse_call_multiple(&self, op: Operation, response: HttpResponse) -> Result<Vec<Output>, ApiError> {
        let decode = op.descriptor().decode;
        match parse_json(response)? {
            Value::Array(items) => items.into_iter().map(|raw| Output::from_raw(raw, decode)).collect(),
            other => Err(ApiError::DecodeError(format!(
                "batched {} response is not an array: {other}",
                op.descriptor().name
            ))),
        }
    }

    pub fn parse_healthcheck(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_version(&self, response: HttpResponse) -> Result<VersionInfo, ApiError> {
        let raw = parse_json(response)?;
        serde_json::from_value(raw).map_err(|e| ApiError::DecodeError(e.to_string()))
    }

    fn post(&self, url: String, body: String) -> HttpRequest {
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        headers.extend(self.common_headers());
        HttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            body: Some(body),
        }
    }

    fn get(&self, url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: self.common_headers(),
            body: None,
        }
    }

    fn common_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("user-agent".to_string(), USER_AGENT.to_string())];
        if let Some(key) = &self.api_key {
            headers.push(("RhinoComputeKey".to_string(), key.clone()));
        }
        if let Some(token) = &self.auth_token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }
}

/// Map non-success status codes to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json(response: HttpResponse) -> Result<Value, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
