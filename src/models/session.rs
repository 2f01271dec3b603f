use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Intent, Language, SymptomKey};

/// Onboarding step after which the flow is complete.
pub const ONBOARDING_COMPLETE: u8 = 4;

/// The follow-up the previous reply is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingReply {
    /// An onboarding question (language, name, age or city) is open.
    Onboarding,
    /// "I understood: <symptom>. Is this correct?"
    VoiceConfirmation { symptom: SymptomKey },
    /// A medication reminder awaits ✅ or ⏰.
    MedicationConfirmation,
}

/// Per-user conversational state carried across messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub onboarding_step: u8,
    pub emergency_mode: bool,
    pub last_intent: Option<Intent>,
    pub medication_streak: u32,
    pub language_preference: Option<Language>,
    #[serde(default)]
    pub pending: Option<PendingReply>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Fresh session for a user seen for the first time.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            onboarding_step: 0,
            emergency_mode: false,
            last_intent: None,
            medication_streak: 0,
            language_preference: None,
            pending: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn onboarding_complete(&self) -> bool {
        self.onboarding_step >= ONBOARDING_COMPLETE
    }

    /// Advance onboarding by exactly one step, saturating at the terminal step.
    pub fn advance_onboarding(&mut self) {
        if self.onboarding_step < ONBOARDING_COMPLETE {
            self.onboarding_step += 1;
        }
    }

    /// Stamp `updated_at`. Called by the store layer on every write.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Short state summary handed to the completion backend.
    ///
    /// Carries no free text from the user.
    pub fn context_hint(&self) -> String {
        let mut parts = vec![format!("onboarding_step={}", self.onboarding_step)];
        if self.emergency_mode {
            parts.push("emergency_mode=true".to_string());
        }
        if let Some(intent) = self.last_intent {
            parts.push(format!("last_intent={intent}"));
        }
        if let Some(lang) = self.language_preference {
            parts.push(format!("language={lang}"));
        }
        if self.medication_streak > 0 {
            parts.push(format!("medication_streak={}", self.medication_streak));
        }
        parts.join("; ")
    }

    /// True when the dialogue-relevant state matches, ignoring timestamps.
    pub fn same_state(&self, other: &Session) -> bool {
        self.user_id == other.user_id
            && self.onboarding_step == other.onboarding_step
            && self.emergency_mode == other.emergency_mode
            && self.last_intent == other.last_intent
            && self.medication_streak == other.medication_streak
            && self.language_preference == other.language_preference
            && self.pending == other.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_step_zero() {
        let session = Session::new("919800000001");
        assert_eq!(session.user_id, "919800000001");
        assert_eq!(session.onboarding_step, 0);
        assert!(!session.emergency_mode);
        assert!(session.last_intent.is_none());
        assert_eq!(session.medication_streak, 0);
        assert!(session.language_preference.is_none());
        assert!(session.pending.is_none());
        assert!(!session.onboarding_complete());
    }

    #[test]
    fn onboarding_saturates_at_terminal_step() {
        let mut session = Session::new("u");
        for expected in 1..=ONBOARDING_COMPLETE {
            session.advance_onboarding();
            assert_eq!(session.onboarding_step, expected);
        }
        session.advance_onboarding();
        assert_eq!(session.onboarding_step, ONBOARDING_COMPLETE);
        assert!(session.onboarding_complete());
    }

    #[test]
    fn context_hint_lists_state_only() {
        let mut session = Session::new("u");
        session.emergency_mode = true;
        session.last_intent = Some(Intent::Emergency);
        session.language_preference = Some(Language::Hindi);
        let hint = session.context_hint();
        assert!(hint.contains("onboarding_step=0"));
        assert!(hint.contains("emergency_mode=true"));
        assert!(hint.contains("last_intent=emergency"));
        assert!(hint.contains("language=hindi"));
        assert!(!hint.contains("medication_streak"));
    }

    #[test]
    fn pending_reply_serializes_with_kind_tag() {
        let pending = PendingReply::VoiceConfirmation {
            symptom: SymptomKey::StomachPain,
        };
        let json = serde_json::to_value(pending).unwrap();
        assert_eq!(json["kind"], "voice_confirmation");
        assert_eq!(json["symptom"], "stomach_pain");
    }

    #[test]
    fn same_state_ignores_timestamps() {
        let a = Session::new("u");
        let mut b = a.clone();
        b.touch();
        assert!(a.same_state(&b));
        b.medication_streak = 3;
        assert!(!a.same_state(&b));
    }

    #[test]
    fn session_json_round_trip_keeps_state() {
        let mut session = Session::new("u");
        session.pending = Some(PendingReply::MedicationConfirmation);
        session.medication_streak = 12;
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
