//! External service boundaries.
//!
//! The speech-to-text, machine-translation and language-classification
//! engines are black boxes behind these traits. Service objects are
//! constructed once at startup and passed into the pipeline by handle,
//! which keeps them mockable and avoids hidden global state.

pub mod google;
#[cfg(feature = "whisper")]
pub mod whisper;

use crate::error::{Result, SublinguaError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Speech-to-text over one audio chunk.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe 16kHz mono i16 samples to plain text.
    ///
    /// A failure here is fatal to the job: a missing chunk transcript would
    /// corrupt timing alignment downstream.
    async fn transcribe(&self, samples: &[i16]) -> Result<String>;
}

/// Machine translation of one text unit.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target` (canonical codes).
    ///
    /// Called many times per job; failures are treated as transient and
    /// retried by the caller.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Language classification of a text sample.
#[async_trait]
pub trait LanguageClassifier: Send + Sync {
    /// Return the dominant language code of `text` (not yet normalized).
    async fn classify(&self, text: &str) -> Result<String>;
}

#[async_trait]
impl<T: Transcriber> Transcriber for Arc<T> {
    async fn transcribe(&self, samples: &[i16]) -> Result<String> {
        (**self).transcribe(samples).await
    }
}

#[async_trait]
impl<T: Translator> Translator for Arc<T> {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        (**self).translate(text, source, target).await
    }
}

#[async_trait]
impl<T: LanguageClassifier> LanguageClassifier for Arc<T> {
    async fn classify(&self, text: &str) -> Result<String> {
        (**self).classify(text).await
    }
}

/// The three service handles a job needs, bundled.
#[derive(Clone)]
pub struct Services {
    pub transcriber: Arc<dyn Transcriber>,
    pub translator: Arc<dyn Translator>,
    pub classifier: Arc<dyn LanguageClassifier>,
}

/// Mock transcriber for testing.
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    response: String,
    should_fail: bool,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self {
            response: "mock transcription".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on transcribe.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _samples: &[i16]) -> Result<String> {
        if self.should_fail {
            Err(SublinguaError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}

/// Mock translator with scripted failures, for retry testing.
///
/// Fails the first `failures` calls, then succeeds by uppercasing the
/// input (so tests can distinguish translated output from pass-through).
pub struct MockTranslator {
    failures: Mutex<u32>,
    calls: Mutex<u32>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::failing_times(0)
    }

    pub fn failing_times(failures: u32) -> Self {
        Self {
            failures: Mutex::new(failures),
            calls: Mutex::new(0),
        }
    }

    /// Total translate calls observed.
    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(SublinguaError::Translation {
                message: "mock translation failure".to_string(),
            });
        }
        Ok(text.to_uppercase())
    }
}

/// Mock classifier returning a fixed code.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    language: String,
    should_fail: bool,
}

impl MockClassifier {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            should_fail: false,
        }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl LanguageClassifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<String> {
        if self.should_fail {
            Err(SublinguaError::LanguageDetection {
                message: "mock classification failure".to_string(),
            })
        } else {
            Ok(self.language.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_transcriber_returns_response() {
        let transcriber = MockTranscriber::new().with_response("hello world");

        let result = transcriber.transcribe(&[0i16; 1000]).await;

        assert_eq!(result.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn mock_transcriber_fails_when_configured() {
        let transcriber = MockTranscriber::new().with_failure();

        let result = transcriber.transcribe(&[0i16; 1000]).await;

        assert!(matches!(
            result,
            Err(SublinguaError::Transcription { .. })
        ));
    }

    #[tokio::test]
    async fn mock_translator_uppercases() {
        let translator = MockTranslator::new();
        let result = translator.translate("hello", "en", "pt").await.unwrap();
        assert_eq!(result, "HELLO");
        assert_eq!(translator.call_count(), 1);
    }

    #[tokio::test]
    async fn mock_translator_scripted_failures() {
        let translator = MockTranslator::failing_times(2);

        assert!(translator.translate("a", "en", "pt").await.is_err());
        assert!(translator.translate("a", "en", "pt").await.is_err());
        assert_eq!(translator.translate("a", "en", "pt").await.unwrap(), "A");
        assert_eq!(translator.call_count(), 3);
    }

    #[tokio::test]
    async fn mock_classifier_returns_language() {
        let classifier = MockClassifier::new("pt");
        assert_eq!(classifier.classify("olá mundo").await.unwrap(), "pt");
    }

    #[tokio::test]
    async fn traits_are_object_safe() {
        let transcriber: Arc<dyn Transcriber> = Arc::new(MockTranscriber::new());
        let translator: Arc<dyn Translator> = Arc::new(MockTranslator::new());
        let classifier: Arc<dyn LanguageClassifier> = Arc::new(MockClassifier::new("en"));

        assert!(transcriber.transcribe(&[]).await.is_ok());
        assert!(translator.translate("x", "en", "en").await.is_ok());
        assert!(classifier.classify("x").await.is_ok());
    }

    #[tokio::test]
    async fn arc_blanket_impl_delegates() {
        let inner = Arc::new(MockTranscriber::new().with_response("shared"));
        let result = inner.transcribe(&[]).await.unwrap();
        assert_eq!(result, "shared");
    }
}
