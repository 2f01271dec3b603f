//! Keyword classifier: ordered rules, first match wins.
//!
//! Every rule sees the lowercased input. Triggers for one concept in
//! several scripts (Latin, transliterated Hindi, Devanagari) live in the
//! same list. Short Latin triggers that are common fragments of other words
//! match whole words only; everything else is a substring match.

use crate::knowledge::AdviceTopic;
use crate::models::{Intent, PendingReply, Session, SymptomKey};

use super::voice;

/// Triggers that only match as a whole word.
const WHOLE_WORD_TRIGGERS: &[&str] = &[
    "hi", "hey", "app", "web", "tip", "tips", "help", "hot", "bp", "start", "begin",
];

const EMERGENCY_TRIGGERS: &[&str] = &[
    "emergency",
    "urgent",
    "help",
    "ambulance",
    "तत्काल",
    "जरूरी",
    "tatkal",
    "इमरजेंसी",
];

const CHEST_TRIGGERS: &[&str] = &["chest", "heart", "सीने", "seene"];

const FEVER_TRIGGERS: &[&str] = &["fever", "bukhar", "बुखार", "temperature"];

const HEADACHE_TRIGGERS: &[&str] = &["headache", "sir dard", "सिर दर्द", "माथे", "migraine"];

const STOMACH_TRIGGERS: &[&str] = &[
    "stomach",
    "abdominal",
    "belly",
    "pet mein",
    "pet dard",
    "पेट",
];

const GENERIC_SYMPTOM_TRIGGERS: &[&str] = &[
    "symptom",
    "pain",
    "dard",
    "दर्द",
    "hurt",
    "ache",
    "sick",
    "बीमार",
    "not feeling well",
    "hot",
];

const MEDICATION_TRIGGERS: &[&str] = &[
    "medication",
    "medicine",
    "pill",
    "tablet",
    "💊",
    "dawai",
    "दवा",
    "reminder",
];

const TIP_TRIGGERS: &[&str] = &["tip", "tips", "health tip", "टिप्स"];

const WEB_APP_TRIGGERS: &[&str] = &[
    "web",
    "app",
    "website",
    "detailed",
    "comprehensive",
    "dashboard",
];

const FAMILY_TRIGGERS: &[&str] = &["family", "relative", "परिवार"];

const CORPORATE_TRIGGERS: &[&str] = &["corporate", "company", "employee", "workplace"];

const DIABETES_TRIGGERS: &[&str] = &["diabetes", "diabetic", "sugar", "मधुमेह"];

const HYPERTENSION_TRIGGERS: &[&str] = &["hypertension", "blood pressure", "bp"];

const GREETING_TRIGGERS: &[&str] = &[
    "hi", "hello", "hey", "start", "begin", "namaste", "नमस्ते",
];

const AFFIRMATIVES: &[&str] = &[
    "✅", "yes", "y", "haan", "han", "हाँ", "हां", "taken", "done", "ok", "okay",
];

const NEGATIVES: &[&str] = &["❌", "no", "n", "nahi", "नहीं", "wrong"];

const SNOOZE_REPLIES: &[&str] = &["⏰", "snooze", "later", "baad mein"];

/// Input as seen by the rules.
pub struct Input<'a> {
    pub raw: &'a str,
    pub lower: String,
    pub session: &'a Session,
}

/// One classification rule: fires `intent` when `test` holds.
pub struct Rule {
    pub name: &'static str,
    pub intent: Intent,
    test: fn(&Input) -> bool,
}

/// Declared precedence. Earlier rules win every overlap.
pub static RULES: &[Rule] = &[
    Rule {
        name: "emergency_follow_up",
        intent: Intent::Emergency,
        test: |input| input.session.emergency_mode && is_short_reply(&input.lower),
    },
    Rule {
        name: "emergency_trigger",
        intent: Intent::Emergency,
        test: |input| matches_any(&input.lower, EMERGENCY_TRIGGERS),
    },
    Rule {
        name: "voice_marker",
        intent: Intent::VoiceMessage,
        test: |input| voice::is_voice_message(input.raw),
    },
    Rule {
        name: "symptom_trigger",
        intent: Intent::SymptomCheck,
        test: |input| symptom_key(&input.lower).is_some(),
    },
    Rule {
        name: "medication_keyword",
        intent: Intent::Medication,
        test: |input| matches_any(&input.lower, MEDICATION_TRIGGERS),
    },
    Rule {
        name: "tip_keyword",
        intent: Intent::HealthTip,
        test: |input| matches_any(&input.lower, TIP_TRIGGERS),
    },
    Rule {
        name: "web_app_keyword",
        intent: Intent::WebApp,
        test: |input| matches_any(&input.lower, WEB_APP_TRIGGERS),
    },
    Rule {
        name: "family_keyword",
        intent: Intent::FamilyCare,
        test: |input| matches_any(&input.lower, FAMILY_TRIGGERS),
    },
    Rule {
        name: "corporate_keyword",
        intent: Intent::CorporateWellness,
        test: |input| matches_any(&input.lower, CORPORATE_TRIGGERS),
    },
    Rule {
        name: "general_advice_keyword",
        intent: Intent::GeneralAdvice,
        test: |input| advice_topic(&input.lower).is_some(),
    },
    Rule {
        name: "greeting",
        intent: Intent::Welcome,
        test: |input| matches_any(&input.lower, GREETING_TRIGGERS),
    },
    // Follow-up continuations: short answers to the previous reply.
    Rule {
        name: "onboarding_answer",
        intent: Intent::Welcome,
        test: |input| input.session.pending == Some(PendingReply::Onboarding),
    },
    Rule {
        name: "voice_confirmation_answer",
        intent: Intent::VoiceMessage,
        test: |input| {
            matches!(
                input.session.pending,
                Some(PendingReply::VoiceConfirmation { .. })
            ) && (is_affirmative(&input.lower) || is_negative(&input.lower))
        },
    },
    Rule {
        name: "medication_answer",
        intent: Intent::Medication,
        test: |input| {
            (input.session.pending == Some(PendingReply::MedicationConfirmation)
                || input.session.last_intent == Some(Intent::Medication))
                && (is_affirmative(&input.lower) || is_snooze(&input.lower))
        },
    },
];

/// Classify one message. Total: every input maps to exactly one intent.
pub fn classify(text: &str, session: &Session) -> Intent {
    matching_rule(text, session).map_or(Intent::Fallback, |rule| rule.intent)
}

/// The first rule that fires, if any. Blank input fires none.
pub fn matching_rule(text: &str, session: &Session) -> Option<&'static Rule> {
    if text.trim().is_empty() {
        return None;
    }
    let input = Input {
        raw: text,
        lower: text.trim().to_lowercase(),
        session,
    };
    RULES.iter().find(|rule| (rule.test)(&input))
}

/// Symptom key by fixed precedence: chest, fever, headache, stomach, then
/// any generic symptom word.
pub fn symptom_key(lower: &str) -> Option<SymptomKey> {
    if matches_any(lower, CHEST_TRIGGERS) {
        Some(SymptomKey::ChestPain)
    } else if matches_any(lower, FEVER_TRIGGERS) {
        Some(SymptomKey::Fever)
    } else if matches_any(lower, HEADACHE_TRIGGERS) {
        Some(SymptomKey::Headache)
    } else if matches_any(lower, STOMACH_TRIGGERS) {
        Some(SymptomKey::StomachPain)
    } else if matches_any(lower, GENERIC_SYMPTOM_TRIGGERS) {
        Some(SymptomKey::Unclassified)
    } else {
        None
    }
}

pub fn advice_topic(lower: &str) -> Option<AdviceTopic> {
    if matches_any(lower, DIABETES_TRIGGERS) {
        Some(AdviceTopic::Diabetes)
    } else if matches_any(lower, HYPERTENSION_TRIGGERS) {
        Some(AdviceTopic::Hypertension)
    } else {
        None
    }
}

pub fn is_affirmative(lower: &str) -> bool {
    is_reply_from(lower, AFFIRMATIVES)
}

pub fn is_negative(lower: &str) -> bool {
    is_reply_from(lower, NEGATIVES)
}

pub fn is_snooze(lower: &str) -> bool {
    is_reply_from(lower, SNOOZE_REPLIES)
}

/// A bare menu number or an affirmative.
fn is_short_reply(lower: &str) -> bool {
    let trimmed = lower.trim();
    let numeric =
        !trimmed.is_empty() && trimmed.len() <= 2 && trimmed.chars().all(|c| c.is_ascii_digit());
    numeric || is_affirmative(trimmed)
}

/// The whole reply (ignoring trailing punctuation) is one of `options`.
fn is_reply_from(lower: &str, options: &[&str]) -> bool {
    let trimmed = lower.trim().trim_end_matches(['.', '!', ',']).trim();
    options.contains(&trimmed)
}

fn matches_any(lower: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|trigger| matches_trigger(lower, trigger))
}

fn matches_trigger(lower: &str, trigger: &str) -> bool {
    if WHOLE_WORD_TRIGGERS.contains(&trigger) {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == trigger)
    } else {
        lower.contains(trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Session {
        Session::new("u")
    }

    fn onboarded() -> Session {
        let mut session = Session::new("u");
        session.onboarding_step = 4;
        session
    }

    #[test]
    fn blank_input_is_fallback() {
        assert_eq!(classify("", &fresh()), Intent::Fallback);
        assert_eq!(classify("   \n\t", &fresh()), Intent::Fallback);
        assert!(matching_rule("  ", &fresh()).is_none());
    }

    #[test]
    fn emergency_words_outrank_symptoms_in_every_script() {
        let session = onboarded();
        for text in [
            "emergency chest pain",
            "URGENT fever",
            "help! my stomach hurts",
            "तत्काल सीने में दर्द",
            "bahut jaruri hai, tatkal bukhar",
            "इमरजेंसी पेट दर्द",
            "[Voice message: emergency, seene mein dard]",
        ] {
            assert_eq!(classify(text, &session), Intent::Emergency, "{text}");
        }
    }

    #[test]
    fn symptom_triggers_across_scripts() {
        let session = onboarded();
        for text in [
            "I have fever",
            "mujhe bukhar hai",
            "बुखार है",
            "sir dard ho raha hai",
            "सिर दर्द",
            "chest feels tight",
            "pet dard",
            "not feeling well today",
        ] {
            assert_eq!(classify(text, &session), Intent::SymptomCheck, "{text}");
        }
    }

    #[test]
    fn symptom_key_precedence() {
        assert_eq!(symptom_key("chest pain and fever"), Some(SymptomKey::ChestPain));
        assert_eq!(symptom_key("fever with headache"), Some(SymptomKey::Fever));
        assert_eq!(symptom_key("headache and stomach ache"), Some(SymptomKey::Headache));
        assert_eq!(symptom_key("mujhe pet mein dard hai"), Some(SymptomKey::StomachPain));
        assert_eq!(symptom_key("my knee hurts"), Some(SymptomKey::Unclassified));
        assert_eq!(symptom_key("feeling hot"), Some(SymptomKey::Unclassified));
        assert_eq!(symptom_key("a shot of espresso"), None);
    }

    #[test]
    fn voice_marker_beats_symptom_words() {
        let session = onboarded();
        assert_eq!(
            classify("[Voice message: Mujhe pet mein dard hai]", &session),
            Intent::VoiceMessage
        );
    }

    #[test]
    fn domain_keywords() {
        let session = onboarded();
        assert_eq!(classify("medicine reminder", &session), Intent::Medication);
        assert_eq!(classify("💊", &session), Intent::Medication);
        assert_eq!(classify("tips", &session), Intent::HealthTip);
        assert_eq!(classify("daily health tip please", &session), Intent::HealthTip);
        assert_eq!(classify("web", &session), Intent::WebApp);
        assert_eq!(classify("open the app", &session), Intent::WebApp);
        assert_eq!(classify("family update", &session), Intent::FamilyCare);
        assert_eq!(classify("corporate wellness", &session), Intent::CorporateWellness);
        assert_eq!(classify("diabetes diet", &session), Intent::GeneralAdvice);
        assert_eq!(classify("my bp is high", &session), Intent::GeneralAdvice);
    }

    #[test]
    fn short_triggers_need_whole_words() {
        let session = onboarded();
        // "this" contains "hi", "happy" contains "app", "stipend" contains "tip"
        assert_eq!(classify("this is happy stipend", &session), Intent::Fallback);
        assert_eq!(classify("Hi", &session), Intent::Welcome);
        assert_eq!(classify("hi there", &session), Intent::Welcome);
    }

    #[test]
    fn greetings() {
        for text in ["Hello", "namaste", "नमस्ते", "start"] {
            assert_eq!(classify(text, &fresh()), Intent::Welcome, "{text}");
        }
    }

    #[test]
    fn emergency_mode_captures_short_replies() {
        let mut session = onboarded();
        session.emergency_mode = true;
        session.last_intent = Some(Intent::Emergency);
        assert_eq!(classify("1", &session), Intent::Emergency);
        assert_eq!(classify("5", &session), Intent::Emergency);
        assert_eq!(classify("yes", &session), Intent::Emergency);
        // Longer text still classifies normally.
        assert_eq!(classify("daily tips", &session), Intent::HealthTip);
    }

    #[test]
    fn numeric_reply_outside_emergency_mode_is_not_emergency() {
        assert_eq!(classify("1", &onboarded()), Intent::Fallback);
    }

    #[test]
    fn onboarding_answers_continue_onboarding() {
        let mut session = fresh();
        session.onboarding_step = 2;
        session.pending = Some(PendingReply::Onboarding);
        assert_eq!(classify("Rahul", &session), Intent::Welcome);
        session.onboarding_step = 3;
        assert_eq!(classify("28", &session), Intent::Welcome);
    }

    #[test]
    fn voice_confirmation_answers() {
        let mut session = onboarded();
        session.pending = Some(PendingReply::VoiceConfirmation {
            symptom: SymptomKey::StomachPain,
        });
        assert_eq!(classify("Yes", &session), Intent::VoiceMessage);
        assert_eq!(classify("✅", &session), Intent::VoiceMessage);
        assert_eq!(classify("No", &session), Intent::VoiceMessage);
        assert_eq!(classify("what?", &session), Intent::Fallback);
    }

    #[test]
    fn medication_answers() {
        let mut session = onboarded();
        session.pending = Some(PendingReply::MedicationConfirmation);
        session.last_intent = Some(Intent::Medication);
        assert_eq!(classify("✅", &session), Intent::Medication);
        assert_eq!(classify("taken", &session), Intent::Medication);
        assert_eq!(classify("⏰", &session), Intent::Medication);
        assert_eq!(classify("✅", &onboarded()), Intent::Fallback);
    }

    #[test]
    fn rule_order_is_declared_precedence() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
        assert!(pos("emergency_follow_up") < pos("emergency_trigger"));
        assert!(pos("emergency_trigger") < pos("voice_marker"));
        assert!(pos("voice_marker") < pos("symptom_trigger"));
        assert!(pos("symptom_trigger") < pos("medication_keyword"));
        assert!(pos("general_advice_keyword") < pos("greeting"));
        assert!(pos("greeting") < pos("onboarding_answer"));
    }

    #[test]
    fn first_match_wins_on_overlap() {
        let session = onboarded();
        // medication + tips keywords: medication is declared first
        assert_eq!(classify("medicine tips", &session), Intent::Medication);
        // symptom + greeting: symptom is declared first
        assert_eq!(classify("hello, I have fever", &session), Intent::SymptomCheck);
        let rule = matching_rule("hello, I have fever", &session).unwrap();
        assert_eq!(rule.name, "symptom_trigger");
    }

    #[test]
    fn reply_helpers_ignore_trailing_punctuation() {
        assert!(is_affirmative("yes!"));
        assert!(is_affirmative("haan"));
        assert!(is_negative("no."));
        assert!(is_snooze("snooze"));
        assert!(!is_affirmative("yesterday"));
    }
}
