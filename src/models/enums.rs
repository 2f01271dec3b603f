use serde::{Deserialize, Serialize};

/// Raised when a wire tag does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} tag: {value:?}")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownTag {
                        kind: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Intent {
    Welcome => "welcome",
    Emergency => "emergency",
    SymptomCheck => "symptom_check",
    VoiceMessage => "voice_message",
    Medication => "medication",
    HealthTip => "health_tip",
    WebApp => "web_app",
    FamilyCare => "family_care",
    CorporateWellness => "corporate_wellness",
    GeneralAdvice => "general_advice",
    Fallback => "fallback",
});

impl Intent {
    /// Intents whose branch renders without touching the session.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::HealthTip
                | Self::WebApp
                | Self::FamilyCare
                | Self::CorporateWellness
                | Self::GeneralAdvice
                | Self::Fallback
        )
    }
}

str_enum!(SymptomKey {
    Fever => "fever",
    ChestPain => "chest_pain",
    Headache => "headache",
    StomachPain => "stomach_pain",
    Unclassified => "unclassified",
});

impl SymptomKey {
    /// Human label echoed back to the user ("I understood: ...").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fever => "Fever",
            Self::ChestPain => "Chest pain",
            Self::Headache => "Headache",
            Self::StomachPain => "Stomach pain",
            Self::Unclassified => "Medical symptom",
        }
    }
}

str_enum!(Language {
    English => "english",
    Hindi => "hindi",
    Tamil => "tamil",
    Bengali => "bengali",
});

impl Language {
    /// Menu order used by the welcome prompt (1-4).
    pub const MENU: [Language; 4] = [Self::English, Self::Hindi, Self::Tamil, Self::Bengali];

    /// Label shown in the language menu, in its own script.
    pub fn native_label(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "हिंदी",
            Self::Tamil => "தமிழ்",
            Self::Bengali => "বাংলা",
        }
    }

    /// Interpret a reply to the language menu: a menu number, an English
    /// name, or the native label.
    pub fn from_choice(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let lower = trimmed.to_lowercase();
        if let Ok(n) = lower.trim_end_matches(['.', ')']).parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::MENU.get(i).copied());
        }
        Self::MENU.iter().copied().find(|lang| {
            lower == lang.as_str() || trimmed == lang.native_label()
        })
    }
}
