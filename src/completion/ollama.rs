use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{CompletionBackend, CompletionError};

/// Instructions sent with every fallback generation. The session hint is
/// appended on its own line.
const SYSTEM_PROMPT: &str = "You are MedAssist, a healthcare assistant replying on WhatsApp. \
Answer in at most five short lines. Do not diagnose. \
If the message could describe an emergency, tell the user to call 108. \
Ask the user to describe their symptoms when the message is unclear.";

/// Ollama HTTP client for fallback generation.
pub struct OllamaCompletion {
    base_url: String,
    model: String,
    timeout_secs: u64,
    // Built on first use: the blocking client must not be created on an
    // async worker thread.
    client: Mutex<Option<reqwest::blocking::Client>>,
}

impl OllamaCompletion {
    /// Create a client pointing at an Ollama instance.
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_secs,
            client: Mutex::new(None),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> Result<reqwest::blocking::Client, CompletionError> {
        let mut slot = self
            .client
            .lock()
            .map_err(|_| CompletionError::HttpClient("client lock poisoned".into()))?;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| CompletionError::HttpClient(e.to_string()))?;
        *slot = Some(client.clone());
        Ok(client)
    }

    fn map_send_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_connect() {
            CompletionError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            CompletionError::HttpClient(format!(
                "Request timed out after {}s",
                self.timeout_secs
            ))
        } else {
            CompletionError::HttpClient(e.to_string())
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

fn system_prompt(context_hint: &str) -> String {
    if context_hint.is_empty() {
        SYSTEM_PROMPT.to_string()
    } else {
        format!("{SYSTEM_PROMPT}\nConversation state: {context_hint}")
    }
}

impl CompletionBackend for OllamaCompletion {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn complete(&self, prompt: &str, context_hint: &str) -> Result<String, CompletionError> {
        let url = format!("{}/api/generate", self.base_url);
        let system = system_prompt(context_hint);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            system: &system,
            stream: false,
        };

        let response = self
            .client()?
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| CompletionError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response.trim().to_string())
    }
}
