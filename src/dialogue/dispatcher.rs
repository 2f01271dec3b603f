use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use uuid::Uuid;

use crate::completion::{complete_with_timeout, CompletionBackend};
use crate::models::{Intent, Session};
use crate::session::{SessionStore, UserLocks};
use crate::templates::{render, TemplateName, TemplateParams};

use super::classify::classify;
use super::router::{RouteOutcome, Router};
use super::DispatchError;

/// Result of processing one inbound message.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedMessage {
    pub message_id: Uuid,
    pub reply_text: String,
    pub intent: Intent,
    pub session: Session,
}

/// Owns the classify → route → render pipeline and the session lifecycle.
pub struct Dispatcher {
    store: Arc<dyn SessionStore>,
    locks: UserLocks,
    router: Router,
    completion: Arc<dyn CompletionBackend>,
    completion_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn SessionStore>,
        router: Router,
        completion: Arc<dyn CompletionBackend>,
        completion_timeout: Duration,
    ) -> Self {
        Self {
            store,
            locks: UserLocks::new(),
            router,
            completion,
            completion_timeout,
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn completion_backend(&self) -> &'static str {
        self.completion.name()
    }

    /// Process one message for `user_id` and persist the resulting session.
    ///
    /// Holds the user's lock for the whole load → route → complete → save
    /// sequence. A first message always persists a session; afterwards only
    /// stateful intents write.
    pub async fn process_message(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<ProcessedMessage, DispatchError> {
        if user_id.trim().is_empty() {
            return Err(DispatchError::EmptyUserId);
        }
        let start = Instant::now();
        let message_id = Uuid::new_v4();

        let _guard = self.locks.acquire(user_id).await;
        let stored = self.store.load(user_id)?;
        let existed = stored.is_some();
        let mut session = stored.unwrap_or_else(|| Session::new(user_id));

        let intent = classify(text, &session);
        let reply_text = match self.router.handle(intent, text, &mut session)? {
            RouteOutcome::Reply(reply) => reply,
            RouteOutcome::NeedsCompletion {
                prompt,
                context_hint,
            } => self.complete_or_fallback(message_id, prompt, context_hint).await?,
        };

        // Read-only replies leave an existing session byte-for-byte unchanged.
        if !(existed && intent.is_read_only()) {
            self.store.put(&mut session)?;
        }

        tracing::info!(
            %message_id,
            user_id,
            intent = %intent,
            read_only = intent.is_read_only(),
            input_len = text.len(),
            reply_len = reply_text.len(),
            onboarding_step = session.onboarding_step,
            emergency_mode = session.emergency_mode,
            duration_ms = start.elapsed().as_millis() as u64,
            "Message processed"
        );

        Ok(ProcessedMessage {
            message_id,
            reply_text,
            intent,
            session,
        })
    }

    async fn complete_or_fallback(
        &self,
        message_id: Uuid,
        prompt: String,
        context_hint: String,
    ) -> Result<String, DispatchError> {
        match complete_with_timeout(
            self.completion.clone(),
            prompt,
            context_hint,
            self.completion_timeout,
        )
        .await
        {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(
                    %message_id,
                    backend = self.completion.name(),
                    error = %e,
                    "Completion unavailable, sending fallback prompt"
                );
                Ok(render(TemplateName::FallbackPrompt, &TemplateParams::new())?)
            }
        }
    }

    /// Read-only view of a user's session. `None` if the user has no session.
    pub fn snapshot(&self, user_id: &str) -> Result<Option<Session>, DispatchError> {
        Ok(self.store.snapshot(user_id)?)
    }

    /// Drop a user's session, waiting for any in-flight message to finish.
    pub async fn clear(&self, user_id: &str) -> Result<bool, DispatchError> {
        let _guard = self.locks.acquire(user_id).await;
        let existed = self.store.clear(user_id)?;
        tracing::info!(user_id, existed, "Session cleared");
        Ok(existed)
    }
}
