use std::sync::LazyLock;

use regex::Regex;

use crate::models::SymptomKey;

use super::classify::symptom_key;

/// Transport convention for transcribed audio: `[Voice message: <transcript>]`.
static VOICE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Voice message:\s*(.*?)\]").expect("valid regex"));

pub fn is_voice_message(text: &str) -> bool {
    VOICE_MARKER_RE.is_match(text)
}

/// The transcript inside the voice marker, trimmed. `None` if there is no
/// marker; `Some("")` for an empty transcript.
pub fn extract_transcript(text: &str) -> Option<&str> {
    VOICE_MARKER_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// What the bot echoes back as "I understood: ...".
pub fn understood_symptom(transcript: &str) -> SymptomKey {
    symptom_key(&transcript.to_lowercase()).unwrap_or(SymptomKey::Unclassified)
}
