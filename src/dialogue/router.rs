//! Per-intent state machine.
//!
//! The router decides which template to render and how the session moves.
//! It never performs I/O: the fallback branch returns a completion request
//! that the dispatcher executes under its timeout.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::knowledge::{self, EmergencyCategory, HEALTH_TIPS};
use crate::models::{Intent, Language, PendingReply, Session, SymptomKey};
use crate::templates::{self, render, TemplateError, TemplateName, TemplateParams};

use super::classify::{self, advice_topic, symptom_key};
use super::voice;

/// What the router produced for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A fully rendered reply.
    Reply(String),
    /// No rule applies; ask the completion backend.
    NeedsCompletion { prompt: String, context_hint: String },
}

pub struct Router {
    web_app_link: String,
    tip_rng: Mutex<StdRng>,
}

impl Router {
    /// `tip_seed` fixes the tip sequence; `None` seeds from OS entropy.
    pub fn new(web_app_link: &str, tip_seed: Option<u64>) -> Self {
        let rng = match tip_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            web_app_link: web_app_link.to_string(),
            tip_rng: Mutex::new(rng),
        }
    }

    /// Route one classified message, mutating `session` for stateful intents.
    ///
    /// Read-only intents leave the session untouched, including
    /// `last_intent`.
    pub fn handle(
        &self,
        intent: Intent,
        text: &str,
        session: &mut Session,
    ) -> Result<RouteOutcome, TemplateError> {
        let text = text.trim();
        let lower = text.to_lowercase();

        let reply = match intent {
            Intent::Welcome => self.onboarding(text, session)?,
            Intent::Emergency => emergency(text, session)?,
            Intent::SymptomCheck => {
                session.pending = None;
                self.symptom_reply(symptom_key(&lower).unwrap_or(SymptomKey::Unclassified))?
            }
            Intent::VoiceMessage => self.voice(text, &lower, session)?,
            Intent::Medication => medication(&lower, session)?,
            Intent::HealthTip
            | Intent::WebApp
            | Intent::FamilyCare
            | Intent::CorporateWellness
            | Intent::GeneralAdvice
            | Intent::Fallback => return self.read_only(intent, text, &lower, session),
        };

        session.last_intent = Some(intent);
        Ok(RouteOutcome::Reply(reply))
    }

    fn onboarding(&self, text: &str, session: &mut Session) -> Result<String, TemplateError> {
        let params = TemplateParams::new();
        // Every question re-arms the follow-up; other intents may have cleared it.
        session.pending = Some(PendingReply::Onboarding);
        let reply = match session.onboarding_step {
            0 => {
                session.advance_onboarding();
                render(TemplateName::Welcome, &params)?
            }
            1 => match Language::from_choice(text) {
                Some(language) => {
                    session.language_preference = Some(language);
                    session.advance_onboarding();
                    render(TemplateName::OnboardingName, &params)?
                }
                // Not a menu answer: show the menu again.
                None => render(TemplateName::Welcome, &params)?,
            },
            2 => {
                session.advance_onboarding();
                render(TemplateName::OnboardingAge, &params.text("name", text))?
            }
            3 => {
                session.advance_onboarding();
                render(TemplateName::OnboardingCity, &params)?
            }
            _ => {
                session.pending = None;
                render(
                    TemplateName::OnboardingComplete,
                    &params.text("web_app_link", &self.web_app_link),
                )?
            }
        };
        Ok(reply)
    }

    /// Reply for one symptom key. Shared by typed symptoms and confirmed
    /// voice messages.
    fn symptom_reply(&self, key: SymptomKey) -> Result<String, TemplateError> {
        if let Some(entry) = knowledge::yellow_alert(key) {
            return render(
                TemplateName::YellowAlert,
                &templates::yellow_alert_params(entry, &self.web_app_link),
            );
        }
        match key {
            SymptomKey::ChestPain => render(
                TemplateName::EmergencyProtocol,
                &templates::emergency_protocol_params(EmergencyCategory::ChestPain.protocol()),
            ),
            SymptomKey::StomachPain => render(
                TemplateName::SymptomAnalysis,
                &templates::symptom_analysis_params(&knowledge::STOMACH_PAIN),
            ),
            _ => render(
                TemplateName::SymptomIntake,
                &TemplateParams::new()
                    .list("questions", knowledge::TIMING_QUESTIONS.iter().copied()),
            ),
        }
    }

    fn voice(
        &self,
        text: &str,
        lower: &str,
        session: &mut Session,
    ) -> Result<String, TemplateError> {
        if let Some(transcript) = voice::extract_transcript(text) {
            let symptom = voice::understood_symptom(transcript);
            session.pending = Some(PendingReply::VoiceConfirmation { symptom });
            return render(
                TemplateName::VoiceConfirmation,
                &TemplateParams::new().text("understood", symptom.label()),
            );
        }

        let confirmed = match session.pending {
            Some(PendingReply::VoiceConfirmation { symptom }) => Some(symptom),
            _ => None,
        };
        session.pending = None;
        match confirmed {
            Some(symptom) if classify::is_affirmative(lower) => self.symptom_reply(symptom),
            _ => render(TemplateName::VoiceCorrection, &TemplateParams::new()),
        }
    }

    fn read_only(
        &self,
        intent: Intent,
        text: &str,
        lower: &str,
        session: &Session,
    ) -> Result<RouteOutcome, TemplateError> {
        let link = self.web_app_link.as_str();
        let reply = match intent {
            Intent::HealthTip => render(
                TemplateName::HealthTip,
                &TemplateParams::new()
                    .text("tip", self.next_tip())
                    .text("web_app_link", link),
            )?,
            Intent::WebApp => render(
                TemplateName::WebAppTransition,
                &TemplateParams::new()
                    .text("web_app_link", link)
                    .list("features", knowledge::WEB_APP_FEATURES.iter().copied()),
            )?,
            Intent::FamilyCare => render(
                TemplateName::FamilyCareUpdate,
                &templates::family_update_params(&knowledge::FAMILY_UPDATE, link),
            )?,
            Intent::CorporateWellness => render(
                TemplateName::CorporateWellness,
                &templates::corporate_summary_params(&knowledge::CORPORATE_SUMMARY, link),
            )?,
            Intent::GeneralAdvice => match advice_topic(lower) {
                Some(topic) => render(
                    TemplateName::GeneralAdvice,
                    &templates::advice_params(topic.entry()),
                )?,
                None => return Ok(completion_request(text, session)),
            },
            _ => return Ok(completion_request(text, session)),
        };
        Ok(RouteOutcome::Reply(reply))
    }

    fn next_tip(&self) -> &'static str {
        let mut rng = self.tip_rng.lock().unwrap_or_else(|e| e.into_inner());
        HEALTH_TIPS.choose(&mut *rng).copied().unwrap_or_default()
    }
}

fn completion_request(text: &str, session: &Session) -> RouteOutcome {
    RouteOutcome::NeedsCompletion {
        prompt: text.to_string(),
        context_hint: session.context_hint(),
    }
}

fn emergency(text: &str, session: &mut Session) -> Result<String, TemplateError> {
    session.pending = None;
    if !session.emergency_mode {
        session.emergency_mode = true;
        return render(
            TemplateName::EmergencyMenu,
            &TemplateParams::new().list(
                "categories",
                EmergencyCategory::MENU.iter().map(|c| c.menu_label()),
            ),
        );
    }

    let protocol = match EmergencyCategory::from_selector(text) {
        Some(category) => category.protocol(),
        None => &knowledge::GENERIC_EMERGENCY_PROTOCOL,
    };
    render(
        TemplateName::EmergencyProtocol,
        &templates::emergency_protocol_params(protocol),
    )
}

fn medication(lower: &str, session: &mut Session) -> Result<String, TemplateError> {
    let plan = &knowledge::DEFAULT_MEDICATION;

    if classify::is_affirmative(lower) {
        // Only an open reminder counts; a repeated ✅ re-sends the same streak.
        if session.pending == Some(PendingReply::MedicationConfirmation) {
            session.medication_streak = session.medication_streak.saturating_add(1);
            session.pending = None;
        }
        return render(
            TemplateName::MedicationConfirmation,
            &templates::medication_confirmation_params(plan, session.medication_streak),
        );
    }

    session.pending = Some(PendingReply::MedicationConfirmation);
    if classify::is_snooze(lower) {
        return render(
            TemplateName::MedicationSnooze,
            &TemplateParams::new().text("medication", plan.name),
        );
    }
    render(
        TemplateName::MedicationReminder,
        &templates::medication_reminder_params(plan, session.medication_streak),
    )
}
