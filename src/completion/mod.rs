pub mod ollama;

pub use ollama::OllamaCompletion;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Every variant means "generation unavailable"; callers recover with the
/// fixed fallback prompt.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion backend disabled")]
    Disabled,

    #[error("Cannot connect to completion backend at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Completion backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Failed to parse completion response: {0}")]
    ResponseParsing(String),

    #[error("Completion backend returned an empty response")]
    EmptyResponse,

    #[error("Completion timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Completion task failed: {0}")]
    TaskFailed(String),
}

/// Free-form text generation used only when no rule matched.
///
/// Implementations are blocking; the dispatcher runs them on the blocking
/// pool under a timeout.
pub trait CompletionBackend: Send + Sync {
    /// Backend name for logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Generate a reply to `prompt`. `context_hint` is a short serialized
    /// session summary, never user text.
    fn complete(&self, prompt: &str, context_hint: &str) -> Result<String, CompletionError>;
}

/// Run `backend.complete` off the async runtime, bounded by `timeout`.
pub async fn complete_with_timeout(
    backend: Arc<dyn CompletionBackend>,
    prompt: String,
    context_hint: String,
    timeout: Duration,
) -> Result<String, CompletionError> {
    let task = tokio::task::spawn_blocking(move || backend.complete(&prompt, &context_hint));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => {
            let text = result?;
            if text.trim().is_empty() {
                Err(CompletionError::EmptyResponse)
            } else {
                Ok(text)
            }
        }
        Ok(Err(join_err)) => Err(CompletionError::TaskFailed(join_err.to_string())),
        Err(_) => Err(CompletionError::TimedOut(timeout)),
    }
}

/// Backend used when no generator is configured. Always unavailable.
pub struct DisabledCompletion;

impl CompletionBackend for DisabledCompletion {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn complete(&self, _prompt: &str, _context_hint: &str) -> Result<String, CompletionError> {
        Err(CompletionError::Disabled)
    }
}

enum MockBehavior {
    Reply(String),
    Fail,
    Slow(Duration, String),
}

/// Mock completion backend for testing.
pub struct MockCompletion {
    behavior: MockBehavior,
    calls: AtomicUsize,
    last_hint: std::sync::Mutex<Option<String>>,
}

impl MockCompletion {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_hint: std::sync::Mutex::new(None),
        }
    }

    pub fn new(response: &str) -> Self {
        Self::with_behavior(MockBehavior::Reply(response.to_string()))
    }

    pub fn failing() -> Self {
        Self::with_behavior(MockBehavior::Fail)
    }

    /// Sleeps for `delay` before replying.
    pub fn slow(delay: Duration, response: &str) -> Self {
        Self::with_behavior(MockBehavior::Slow(delay, response.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_hint(&self) -> Option<String> {
        self.last_hint.lock().ok().and_then(|h| h.clone())
    }
}

impl CompletionBackend for MockCompletion {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn complete(&self, _prompt: &str, context_hint: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut hint) = self.last_hint.lock() {
            *hint = Some(context_hint.to_string());
        }
        match &self.behavior {
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::Fail => Err(CompletionError::Connection("mock".into())),
            MockBehavior::Slow(delay, text) => {
                std::thread::sleep(*delay);
                Ok(text.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_backend_text() {
        let backend = Arc::new(MockCompletion::new("Drink water and rest."));
        let text = complete_with_timeout(
            backend.clone(),
            "tired".into(),
            "onboarding_step=4".into(),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(text, "Drink water and rest.");
        assert_eq!(backend.calls(), 1);
        assert_eq!(backend.last_hint().as_deref(), Some("onboarding_step=4"));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let backend = Arc::new(MockCompletion::slow(Duration::from_millis(300), "late"));
        let timeout = Duration::from_millis(20);
        let err = complete_with_timeout(backend, "x".into(), String::new(), timeout)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::TimedOut(_)));
    }

    #[tokio::test]
    async fn failure_is_propagated() {
        let backend = Arc::new(MockCompletion::failing());
        let err = complete_with_timeout(backend, "x".into(), String::new(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Connection(_)));
    }

    #[tokio::test]
    async fn blank_reply_counts_as_unavailable() {
        let backend = Arc::new(MockCompletion::new("   "));
        let err = complete_with_timeout(backend, "x".into(), String::new(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::EmptyResponse));
    }

    #[test]
    fn disabled_backend_is_always_unavailable() {
        let err = DisabledCompletion.complete("x", "").unwrap_err();
        assert!(matches!(err, CompletionError::Disabled));
        assert_eq!(DisabledCompletion.name(), "disabled");
    }
}
