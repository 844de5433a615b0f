//! Document text source
//!
//! HTTP client that downloads a page and returns the text of one structural
//! element. A non-success status or an absent element means "no text", which
//! the pipeline treats as fatal.

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

/// Port for retrieving the raw document text
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetch the document body at `url`.
    ///
    /// Returns `Ok(None)` when the source answered but had no usable text.
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError>;
}

/// Fetches a page over HTTP and extracts the element matching a CSS selector
pub struct HtmlTextSource {
    http: Client,
    selector: String,
}

impl HtmlTextSource {
    pub fn new(selector: impl Into<String>, user_agent: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http,
            selector: selector.into(),
        })
    }

    /// Fetch and extract, reporting why no text was found
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        extract_element_text(&body, &self.selector)
    }
}

#[async_trait]
impl TextSource for HtmlTextSource {
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError> {
        match self.fetch_text(url).await {
            Ok(text) => Ok(Some(text)),
            Err(e @ (FetchError::Status { .. } | FetchError::MissingElement { .. })) => {
                tracing::warn!(url = %url, "No document text: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Text content of the first element matching `selector`.
///
/// Whitespace runs inside a line collapse to one space and blank lines are
/// dropped, so paragraphs come back as newline-separated lines.
pub fn extract_element_text(html: &str, selector: &str) -> Result<String, FetchError> {
    let parsed = Selector::parse(selector).map_err(|e| FetchError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    let element = document
        .select(&parsed)
        .next()
        .ok_or_else(|| FetchError::MissingElement {
            selector: selector.to_string(),
        })?;

    let raw: String = element.text().collect();
    Ok(raw
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}
