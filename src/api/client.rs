use std::time::{Duration, Instant};

use anyhow::Result;
use log::debug;
use reqwest::blocking::{RequestBuilder, Response};
use thiserror::Error;

use super::types::{Block, ErrorBody, ListResponse, Page, QueryDatabaseRequest};

const API_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const BLOCK_PAGE_SIZE: u32 = 100;

/// Safely slice a string at UTF-8 character boundaries.
/// Returns a substring from `start` to `end` byte positions, adjusted to valid char boundaries.
fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = s.floor_char_boundary(start);
    let end = s.ceil_char_boundary(end.min(s.len()));
    &s[start..end]
}

/// Truncate a string for log output, appending "..." if truncated.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", safe_slice(s, 0, max_len))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. `code` and `message` come from Notion's error
    /// object when the body parses as one; `body` is always the raw text.
    #[error("Notion API request failed ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        body: String,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    fn from_error_response(status: u16, body: String) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
        let code = parsed.as_ref().and_then(|p| p.code.clone());
        let message = parsed
            .and_then(|p| p.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("unexpected status")
                    .to_string()
            });
        ApiError::Api {
            status,
            code,
            message,
            body,
        }
    }
}

/// Source of database rows for a sync run.
pub trait QueryRows {
    /// Run the published-posts query against `database_id`.
    fn query_database(&self, database_id: &str) -> Result<Vec<Page>, ApiError>;
}

/// Source of page body blocks.
pub trait BlockSource {
    /// All direct children of `block_id`, in order.
    fn block_children(&self, block_id: &str) -> Result<Vec<Block>, ApiError>;
}

pub struct ApiClient {
    token: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, API_URL.to_string())
    }

    /// Client against a different API root (e.g. a local mock server).
    pub(crate) fn with_base_url(token: String, base_url: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(format!("notion-posts/{}", env!("NOTION_POSTS_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            token,
            base_url,
            client,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_VERSION)
    }

    /// Send a prepared request and decode a successful JSON body
    fn send<T: serde::de::DeserializeOwned>(
        &self,
        label: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let start = Instant::now();
        let response = self.authorized(request).send().map_err(|e| {
            debug!("  network error after {:?}: {}", start.elapsed(), e);
            ApiError::NetworkError(e.to_string())
        })?;

        debug!("  {} -> {} in {:?}", label, response.status(), start.elapsed());
        decode_response(response)
    }
}

fn decode_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    // Read body as text first so we can include it in error messages
    let body = response
        .text()
        .map_err(|e| ApiError::InvalidResponse(format!("failed to read body: {}", e)))?;

    if !status.is_success() {
        debug!("  error ({}): {}", status.as_u16(), truncate_for_log(&body, 500));
        return Err(ApiError::from_error_response(status.as_u16(), body));
    }

    debug!("  response body: {} bytes", body.len());
    debug!("  response preview: {}", truncate_for_log(&body, 200));
    parse_body(&body)
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        debug!("  deserialization error: {}", e);
        let col = e.column();
        let context = if col > 0 && col <= body.len() {
            let start = col.saturating_sub(100);
            format!(
                "Context around column {}:\n...{}...",
                col,
                safe_slice(body, start, col + 100)
            )
        } else {
            format!("Response body:\n{}", truncate_for_log(body, 500))
        };
        ApiError::InvalidResponse(format!("{}\n\n{}", e, context))
    })
}

impl QueryRows for ApiClient {
    fn query_database(&self, database_id: &str) -> Result<Vec<Page>, ApiError> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        let request = QueryDatabaseRequest::published_posts();
        debug!("POST {}", url);

        let response: ListResponse<Page> =
            self.send("query", self.client.post(&url).json(&request))?;
        debug!(
            "  got {} rows (has_more={})",
            response.results.len(),
            response.has_more
        );
        Ok(response.results)
    }
}

impl BlockSource for ApiClient {
    fn block_children(&self, block_id: &str) -> Result<Vec<Block>, ApiError> {
        let url = format!("{}/blocks/{}/children", self.base_url, block_id);
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            debug!("GET {} (cursor={:?})", url, cursor);
            let mut request = self
                .client
                .get(&url)
                .query(&[("page_size", BLOCK_PAGE_SIZE.to_string())]);
            if let Some(ref c) = cursor {
                request = request.query(&[("start_cursor", c)]);
            }

            let page: ListResponse<Block> = self.send("children", request)?;
            blocks.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        debug!("  {} blocks under {}", blocks.len(), block_id);
        Ok(blocks)
    }
}
