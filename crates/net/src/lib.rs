//! Blocking text fetch and the HTTP-backed document loader.
//!
//! Everything here is shell: the repair engine only ever sees the in-memory
//! models this crate hands it.

use session::{DocumentLoader, LoadError};
use std::io::Read;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

// Pages and stylesheets, not downloads; anything larger is suspect.
const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "pagemend/0.1 (+https://pagemend)";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),
}

pub struct FetchedText {
    pub url: String,           // final URL after redirects
    pub requested_url: String, // what we asked for
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
    pub duration_ms: u128,
}

impl FetchedText {
    pub fn was_redirected(&self) -> bool {
        self.url != self.requested_url
    }
}

pub fn fetch_text(agent: &ureq::Agent, url: &str) -> Result<FetchedText, FetchError> {
    let start = Instant::now();
    let response = agent
        .get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => FetchError::Status(code),
            other => FetchError::Request(other.to_string()),
        })?;

    let status = response.status();
    let final_url = response.get_url().to_string();
    let content_type = response.header("content-type").map(|s| s.to_string());

    let mut body = String::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)?;

    let fetched = FetchedText {
        url: final_url,
        requested_url: url.to_string(),
        status,
        content_type,
        body,
        duration_ms: start.elapsed().as_millis(),
    };
    log::debug!(
        target: "net",
        "fetched {}: status {}, {} bytes in {}ms",
        fetched.requested_url,
        fetched.status,
        fetched.body.len(),
        fetched.duration_ms
    );
    if fetched.was_redirected() {
        log::debug!(target: "net", "{} redirected to {}", fetched.requested_url, fetched.url);
    }
    Ok(fetched)
}

pub fn is_css(content_type: Option<&str>) -> bool {
    content_type
        .map(|s| s.to_ascii_lowercase().starts_with("text/css"))
        .unwrap_or(false)
}

/// `DocumentLoader` over HTTP: fetch, then parse into the engine's models.
pub struct HttpLoader {
    agent: ureq::Agent,
}

impl HttpLoader {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build(),
        }
    }
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader for HttpLoader {
    fn load(&self, url: &str) -> Result<dom::Tree, LoadError> {
        let fetched = fetch_text(&self.agent, url).map_err(|e| LoadError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(dom::parse_document(&fetched.body))
    }

    fn load_stylesheet(&self, url: &str) -> Result<css::Stylesheet, LoadError> {
        let fetched = fetch_text(&self.agent, url).map_err(|e| LoadError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !is_css(fetched.content_type.as_deref()) {
            log::warn!(
                target: "net",
                "{url}: content-type {:?} is not text/css, parsing anyway",
                fetched.content_type
            );
        }
        Ok(css::parse_stylesheet(url, &fetched.body))
    }

    fn resolve_href(&self, base: &str, href: &str) -> String {
        Url::parse(base)
            .and_then(|b| b.join(href))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}
