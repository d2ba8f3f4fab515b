//! HTTP requests.
//!
//! Only the request/response contract lives here. Responses can be mocked
//! by URL pattern (`--mock-response <regex>:<file>`) so scripts run
//! deterministically; requests that match no mock go to a fallback client.

use std::fmt;
use std::path::PathBuf;

use regex::Regex;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub duration_seconds: f64,
    /// Pattern of the mock that produced this response.
    pub mocked_by: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("No HTTP transport available for {method} {url}")]
    Unavailable { method: HttpMethod, url: String },
    #[error("Failed to read mock response file {path}: {source}")]
    MockFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid mock response {spec:?}: expected <regex>:<file>")]
    MockSpec { spec: String },
    #[error("Invalid mock response regex {pattern:?}: {source}")]
    MockRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub trait HttpClient {
    /// Perform one request.
    ///
    /// # Errors
    ///
    /// The request could not be made. A non-2xx status is still `Ok`.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Fails every request; no network transport is built in.
#[derive(Debug, Default)]
pub struct UnavailableHttpClient;

impl HttpClient for UnavailableHttpClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        Err(HttpError::Unavailable {
            method: request.method,
            url: request.url.clone(),
        })
    }
}

#[derive(Debug)]
enum MockBody {
    File(PathBuf),
    Inline(String),
}

/// One URL pattern and the body it answers with.
#[derive(Debug)]
pub struct MockResponse {
    pattern: Regex,
    body: MockBody,
}

impl MockResponse {
    /// Parse `<regex>:<file>`. The last `:` separates the two, so patterns
    /// may themselves contain colons.
    ///
    /// # Errors
    ///
    /// Missing separator or an invalid regex.
    pub fn parse(spec: &str) -> Result<Self, HttpError> {
        let Some((pattern, path)) = spec.rsplit_once(':') else {
            return Err(HttpError::MockSpec {
                spec: spec.to_string(),
            });
        };
        if path.is_empty() {
            return Err(HttpError::MockSpec {
                spec: spec.to_string(),
            });
        }
        Ok(MockResponse {
            pattern: compile(pattern)?,
            body: MockBody::File(PathBuf::from(path)),
        })
    }

    /// Answer matching URLs with `body` directly.
    ///
    /// # Errors
    ///
    /// An invalid regex.
    pub fn inline(pattern: &str, body: impl Into<String>) -> Result<Self, HttpError> {
        Ok(MockResponse {
            pattern: compile(pattern)?,
            body: MockBody::Inline(body.into()),
        })
    }

    fn load(&self) -> Result<String, HttpError> {
        match &self.body {
            MockBody::Inline(body) => Ok(body.clone()),
            MockBody::File(path) => {
                std::fs::read_to_string(path).map_err(|source| HttpError::MockFile {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, HttpError> {
    Regex::new(pattern).map_err(|source| HttpError::MockRegex {
        pattern: pattern.to_string(),
        source,
    })
}

/// Serves mocked responses and hands anything else to `fallback`.
pub struct MockHttpClient {
    mocks: Vec<MockResponse>,
    fallback: Box<dyn HttpClient>,
}

impl MockHttpClient {
    pub fn new(mocks: Vec<MockResponse>) -> Self {
        Self::with_fallback(mocks, Box::new(UnavailableHttpClient))
    }

    pub fn with_fallback(mocks: Vec<MockResponse>, fallback: Box<dyn HttpClient>) -> Self {
        MockHttpClient { mocks, fallback }
    }
}

impl HttpClient for MockHttpClient {
    #[tracing::instrument(level = "debug", skip_all, fields(method = %request.method, url = %request.url))]
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        for mock in &self.mocks {
            if mock.pattern.is_match(&request.url) {
                debug!(pattern = mock.pattern.as_str(), "serving mocked response");
                return Ok(HttpResponse {
                    status: 200,
                    body: mock.load()?,
                    duration_seconds: 0.0,
                    mocked_by: Some(mock.pattern.as_str().to_string()),
                });
            }
            trace!(pattern = mock.pattern.as_str(), "no match");
        }
        self.fallback.send(request)
    }
}
