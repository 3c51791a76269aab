//! Health assistant — request/response client for the remote
//! generative-language service.
//!
//! The boundary never surfaces a structured error to the caller: with no
//! credential configured it answers with a fixed notice, and any
//! transport or API failure becomes a fixed apology string. Chat UIs
//! render whatever comes back.

use serde::{Deserialize, Serialize};

/// Env var holding the service credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const NOT_CONFIGURED_MESSAGE: &str =
    "AI Assistant is not configured. Please add a valid API_KEY to the environment variables.";
const EMPTY_RESPONSE_MESSAGE: &str = "I'm sorry, I couldn't generate a response at this time.";
const CONNECTION_TROUBLE_MESSAGE: &str =
    "I'm having trouble connecting to the service. Please try again later.";

/// Assistant persona and guardrails, sent as the system instruction.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful, empathetic medical assistant for a \
hospital app called 'Care Connect'. You provide general health information and symptom checking \
but ALWAYS include a disclaimer that you are an AI and not a doctor. Keep responses concise \
(under 150 words) unless asked for detail. If the user asks to book an appointment, guide them \
to the 'Book Appointment' page.";

#[derive(Debug, thiserror::Error)]
enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Client for the generative-language service.
pub struct HealthAssistant {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl HealthAssistant {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Read the credential from the environment; absent or empty means
    /// the assistant runs unconfigured.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).ok())
    }

    /// Point at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one user message, receive one assistant message. Always
    /// returns displayable text.
    pub async fn chat(&self, message: &str) -> String {
        let Some(key) = &self.api_key else {
            return NOT_CONFIGURED_MESSAGE.to_string();
        };

        match self.generate(key, message).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_RESPONSE_MESSAGE.to_string(),
            Err(e) => {
                tracing::error!(error = %e, "Assistant request failed");
                CONNECTION_TROUBLE_MESSAGE.to_string()
            }
        }
    }

    async fn generate(&self, key: &str, message: &str) -> Result<Option<String>, AssistantError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty()))
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_assistant_says_so_without_calling_out() {
        let assistant = HealthAssistant::new(None);
        assert!(!assistant.is_configured());
        let reply = assistant.chat("What is a healthy resting heart rate?").await;
        assert_eq!(reply, NOT_CONFIGURED_MESSAGE);
    }

    #[test]
    fn empty_key_counts_as_unconfigured() {
        let assistant = HealthAssistant::new(Some(String::new()));
        assert!(!assistant.is_configured());
    }

    #[tokio::test]
    async fn transport_failure_becomes_apology_text() {
        // Nothing listens on this port; the request errors immediately
        let assistant =
            HealthAssistant::new(Some("test-key".into())).with_base_url("http://127.0.0.1:1");
        let reply = assistant.chat("hello").await;
        assert_eq!(reply, CONNECTION_TROUBLE_MESSAGE);
    }

    #[test]
    fn request_body_uses_service_wire_format() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hi".into(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.into(),
                }],
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"contents\""));
        assert!(json.contains("Care Connect"));
    }

    #[test]
    fn response_text_extraction_handles_missing_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());

        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Stay hydrated."}]}}]}"#,
        )
        .unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text);
        assert_eq!(text.as_deref(), Some("Stay hydrated."));
    }
}
