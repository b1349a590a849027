//! OpenAI-style chat-completions responder.
//!
//! Implements the [`Responder`] port over any endpoint speaking the
//! `/chat/completions` protocol. Transient failures (transport errors,
//! 429/5xx, unparsable bodies) are retried here with exponential backoff
//! up to a configured bound; exhausting it is fatal for the current
//! question, which the use cases translate into a skip.

use async_trait::async_trait;
use madnet_application::ports::responder::{RawAnswer, Responder, ResponderError};
use madnet_domain::parse_answer_text;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Settings for the OpenAI-style responder
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderSettings {
    /// Model identifier sent with every request
    pub model: String,
    /// API base, e.g. "https://api.openai.com/v1"
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Total attempts before giving up on a call
    pub max_retries: usize,
    /// First backoff delay; doubles per retry
    pub backoff_ms: u64,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_retries: 5,
            backoff_ms: 500,
            timeout_secs: 60,
        }
    }
}

/// Responder adapter for OpenAI-compatible chat endpoints
pub struct OpenAiResponder {
    client: reqwest::Client,
    settings: ResponderSettings,
    api_key: String,
}

impl OpenAiResponder {
    /// Create the adapter, reading the API key from the configured
    /// environment variable
    pub fn new(settings: ResponderSettings) -> Result<Self, ResponderError> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            ResponderError::Other(format!(
                "environment variable {} is not set",
                settings.api_key_env
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ResponderError::Transport {
                status: None,
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            settings,
            api_key,
        })
    }

    async fn try_once(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> Result<RawAnswer, ResponderError> {
        let body = json!({
            "model": self.settings.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": temperature,
        });

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ResponderError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResponderError::Transport {
                status: Some(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| ResponderError::Malformed(e.to_string()))?;
        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ResponderError::Malformed("response carries no message content".to_string())
            })?;

        let (choice, rationale) = parse_answer_text(content).ok_or_else(|| {
            ResponderError::Malformed(format!(
                "no answer found in: {}",
                content.chars().take(120).collect::<String>()
            ))
        })?;
        Ok(RawAnswer::new(choice, rationale))
    }
}

/// Whether an HTTP status is worth another attempt
fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Whether an error from one attempt should be retried.
///
/// Auth and client errors are final; everything transient (including an
/// unparsable body, which a re-sample often fixes) gets another attempt.
/// A transport error without a status never got a response, so it is
/// treated as transient.
fn retryable(error: &ResponderError) -> bool {
    match error {
        ResponderError::Malformed(_) => true,
        ResponderError::Transport { status, .. } => match status {
            Some(code) => StatusCode::from_u16(*code).is_ok_and(retryable_status),
            None => true,
        },
        _ => false,
    }
}

#[async_trait]
impl Responder for OpenAiResponder {
    async fn respond(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> Result<RawAnswer, ResponderError> {
        let mut delay = Duration::from_millis(self.settings.backoff_ms);

        for attempt in 1..=self.settings.max_retries {
            match self.try_once(system_prompt, user_prompt, temperature).await {
                Ok(answer) => {
                    debug!(attempt, choice = answer.choice, "responder answered");
                    return Ok(answer);
                }
                Err(e) if retryable(&e) && attempt < self.settings.max_retries => {
                    warn!(attempt, error = %e, "responder attempt failed, backing off");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) if retryable(&e) => {
                    warn!(attempt, error = %e, "responder attempt failed, giving up");
                }
                Err(e) => return Err(e),
            }
        }

        Err(ResponderError::RetriesExhausted {
            attempts: self.settings.max_retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = ResponderSettings::default();
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.max_retries, 5);
    }

    fn transport(status: Option<u16>) -> ResponderError {
        ResponderError::Transport {
            status,
            message: "request failed".into(),
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(retryable(&ResponderError::Malformed("junk".into())));
        // No status means the request never got a response
        assert!(retryable(&transport(None)));
        assert!(retryable(&transport(Some(429))));
        assert!(retryable(&transport(Some(503))));

        assert!(!retryable(&transport(Some(401))));
        assert!(!retryable(&transport(Some(404))));
        assert!(!retryable(&ResponderError::Other("no api key".into())));
        assert!(!retryable(&ResponderError::RetriesExhausted {
            attempts: 3
        }));
    }
}
