//! Translation and language classification over the Google translate web
//! endpoint.
//!
//! Uses the unauthenticated `translate_a/single` endpoint with the `gtx`
//! client. The response is a loosely-typed JSON array; element 0 holds the
//! translated sentence fragments and element 2 the detected source language.

use crate::error::{Result, SublinguaError};
use crate::services::{LanguageClassifier, Translator};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the Google translate web endpoint.
///
/// Implements both [`Translator`] and [`LanguageClassifier`]: classification
/// is a translate call with `sl=auto`, reading back the detected language.
pub struct GoogleWebTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleWebTranslator {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Construct against a custom endpoint URL. Used by tests to point at a
    /// local stub server.
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SublinguaError::Translation {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    async fn request(&self, text: &str, source: &str, target: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| SublinguaError::Translation {
                message: format!("translate request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SublinguaError::Translation {
                message: format!("translate endpoint returned HTTP {}", status),
            });
        }

        response
            .json()
            .await
            .map_err(|e| SublinguaError::Translation {
                message: format!("translate response was not valid JSON: {}", e),
            })
    }
}

/// Concatenate the translated fragments from `value[0][i][0]`.
fn parse_translation(value: &serde_json::Value) -> Result<String> {
    let fragments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| SublinguaError::Translation {
            message: "unexpected translate response shape".to_string(),
        })?;

    let mut out = String::new();
    for fragment in fragments {
        if let Some(text) = fragment.get(0).and_then(|v| v.as_str()) {
            out.push_str(text);
        }
    }
    Ok(out)
}

/// Read the detected source language from `value[2]`.
fn parse_detected_language(value: &serde_json::Value) -> Result<String> {
    value
        .get(2)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| SublinguaError::LanguageDetection {
            message: "translate response carried no detected language".to_string(),
        })
}

#[async_trait]
impl Translator for GoogleWebTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let value = self.request(text, source, target).await?;
        parse_translation(&value)
    }
}

#[async_trait]
impl LanguageClassifier for GoogleWebTranslator {
    async fn classify(&self, text: &str) -> Result<String> {
        // Target language is irrelevant here; only the detection result is read.
        let value = self
            .request(text, "auto", "en")
            .await
            .map_err(|e| SublinguaError::LanguageDetection {
                message: e.to_string(),
            })?;
        parse_detected_language(&value)
    }
}
