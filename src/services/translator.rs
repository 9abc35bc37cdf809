//! Translation lookup service
//!
//! Looks up the target-language translation of a word through Google's
//! public `translate_a/single` endpoint. The provider answers with a nested
//! JSON array; on overload or bad requests it may instead return an HTML
//! error page with a 200 status, so the body is inspected before parsing.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use crate::config::TranslatorConfig;
use crate::utils::errors::{LookupError, LookupResult, VocabError, Result};

/// Source-to-target text lookup
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> LookupResult<String>;
}

/// Translator backed by the Google Translate web endpoint
#[derive(Clone)]
#[derive(Debug)]
pub struct GoogleTranslator {
    client: Client,
    config: TranslatorConfig,
}

impl GoogleTranslator {
    /// Create a new GoogleTranslator instance
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        // Fail at startup rather than on the first lookup
        Url::parse(&config.api_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("vocab_drill-bot/1.0")
            .build()
            .map_err(VocabError::Http)?;

        Ok(Self { client, config })
    }

    fn request_url(&self, text: &str) -> LookupResult<Url> {
        Url::parse_with_params(
            &self.config.api_url,
            &[
                ("client", "gtx"),
                ("sl", self.config.source_language.as_str()),
                ("tl", self.config.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| LookupError::RequestFailed(e.to_string()))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> LookupResult<String> {
        let url = self.request_url(text)?;
        debug!(text = %text, "Requesting translation");

        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout
                } else {
                    LookupError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Translation provider is rate limiting requests");
            return Err(LookupError::RateLimited);
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(LookupError::RequestFailed(format!("HTTP {}", status)));
        }

        parse_translation(&body)
    }
}

/// Extract the translated text from a provider response body
///
/// The first element of the top-level array lists translated segments, each
/// of which starts with the translated text of that segment.
pub fn parse_translation(body: &str) -> LookupResult<String> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        return Err(LookupError::ErrorPage(html_title(trimmed)));
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| LookupError::InvalidResponse("missing translation segments".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let translated = translated.trim();
    if translated.is_empty() {
        return Err(LookupError::EmptyTranslation);
    }

    Ok(translated.to_string())
}

fn html_title(page: &str) -> String {
    page.split_once("<title>")
        .and_then(|(_, rest)| rest.split_once("</title>"))
        .map(|(title, _)| title.trim().to_string())
        .unwrap_or_else(|| "untitled error page".to_string())
}
