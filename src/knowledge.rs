//! Static reference data behind the template catalog.
//!
//! Symptom → conditions/actions/escalation/care tables, emergency protocols,
//! and the sample payloads for the stateless branches. Read-only
//! configuration data: nothing here is derived at runtime.

use crate::models::SymptomKey;

/// Bumped whenever any table below changes content or order.
pub const KNOWLEDGE_VERSION: &str = "2024.1";

/// A nearby care option, ranked by table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CareOptionEntry {
    pub name: &'static str,
    /// Empty for options without a location (e.g. "Call: 102").
    pub distance: &'static str,
    /// Consultation cost in rupees. Empty when not applicable.
    pub cost: &'static str,
}

/// A hospital record used by emergency protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HospitalEntry {
    pub name: &'static str,
    pub distance: &'static str,
    pub phone: &'static str,
}

/// Moderate-attention ("yellow alert") guidance for one symptom.
#[derive(Debug, Clone, Copy)]
pub struct YellowAlertEntry {
    pub conditions: &'static [&'static str],
    pub actions: &'static [&'static str],
    pub see_doctor: &'static [&'static str],
    pub nearby: &'static [CareOptionEntry],
}

/// Everything an emergency protocol reply needs.
#[derive(Debug, Clone, Copy)]
pub struct EmergencyProtocolEntry {
    pub emergency_type: &'static str,
    pub care_heading: &'static str,
    pub phone_numbers: &'static [&'static str],
    pub nearest_care: &'static [HospitalEntry],
    pub waiting_instructions: &'static [&'static str],
}

/// Timing questions asked when a symptom needs more detail.
#[derive(Debug, Clone, Copy)]
pub struct SymptomAnalysisEntry {
    pub symptom: &'static str,
    pub questions: &'static [&'static str],
}

/// Condition-management advice (diabetes, hypertension).
#[derive(Debug, Clone, Copy)]
pub struct AdviceEntry {
    pub advice_type: &'static str,
    pub recommendations: &'static [&'static str],
    pub warnings: &'static [&'static str],
    pub follow_up: &'static str,
}

/// The reminder sent by the medication branch.
#[derive(Debug, Clone, Copy)]
pub struct MedicationPlan {
    pub name: &'static str,
    pub dosage: &'static str,
    pub time: &'static str,
}

/// Family-care status update payload.
#[derive(Debug, Clone, Copy)]
pub struct FamilyUpdateEntry {
    pub patient_name: &'static str,
    pub status: &'static str,
    pub location: &'static str,
    pub doctor: &'static str,
    pub last_update: &'static str,
}

/// Corporate wellness summary payload.
#[derive(Debug, Clone, Copy)]
pub struct CorporateSummaryEntry {
    pub company_name: &'static str,
    pub employee_count: u32,
    pub health_score: f32,
    pub engagement_percent: u8,
    pub achievements: &'static [&'static str],
    pub alerts: &'static [&'static str],
}

// ═══════════════════════════════════════════════════════════
// Emergency categories
// ═══════════════════════════════════════════════════════════

/// The five numbered choices of the emergency menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyCategory {
    ChestPain,
    BreathingDifficulty,
    SevereBleeding,
    Unconsciousness,
    Other,
}

impl EmergencyCategory {
    /// Menu order; index + 1 is the selector the user replies with.
    pub const MENU: [EmergencyCategory; 5] = [
        Self::ChestPain,
        Self::BreathingDifficulty,
        Self::SevereBleeding,
        Self::Unconsciousness,
        Self::Other,
    ];

    /// Resolve a reply like "1" or " 3 " to a category. Anything else is `None`.
    pub fn from_selector(reply: &str) -> Option<Self> {
        let n: usize = reply.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::MENU.get(i).copied())
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            Self::ChestPain => "Chest pain/Heart attack",
            Self::BreathingDifficulty => "Breathing difficulty",
            Self::SevereBleeding => "Severe bleeding",
            Self::Unconsciousness => "Unconsciousness",
            Self::Other => "Other emergency",
        }
    }

    pub fn protocol(&self) -> &'static EmergencyProtocolEntry {
        match self {
            Self::ChestPain => &CHEST_PAIN_PROTOCOL,
            Self::BreathingDifficulty => &BREATHING_PROTOCOL,
            Self::SevereBleeding => &BLEEDING_PROTOCOL,
            Self::Unconsciousness => &UNCONSCIOUS_PROTOCOL,
            Self::Other => &GENERIC_EMERGENCY_PROTOCOL,
        }
    }
}

const EMERGENCY_NUMBERS: &[&str] = &["108 - Emergency Ambulance", "102 - Medical Emergency"];

const EMERGENCY_HOSPITALS: &[HospitalEntry] = &[
    HospitalEntry {
        name: "Apollo Hospital",
        distance: "3.2km",
        phone: "020-1234-5678",
    },
    HospitalEntry {
        name: "Ruby Hall Clinic",
        distance: "4.1km",
        phone: "020-8765-4321",
    },
];

pub static CHEST_PAIN_PROTOCOL: EmergencyProtocolEntry = EmergencyProtocolEntry {
    emergency_type: "HEART EMERGENCY",
    care_heading: "NEAREST CARDIAC CARE",
    phone_numbers: EMERGENCY_NUMBERS,
    nearest_care: EMERGENCY_HOSPITALS,
    waiting_instructions: &[
        "Sit down, don't lie flat",
        "Chew aspirin if available",
        "Stay calm, help is coming",
    ],
};

pub static BREATHING_PROTOCOL: EmergencyProtocolEntry = EmergencyProtocolEntry {
    emergency_type: "BREATHING EMERGENCY",
    care_heading: "NEAREST EMERGENCY CARE",
    phone_numbers: EMERGENCY_NUMBERS,
    nearest_care: EMERGENCY_HOSPITALS,
    waiting_instructions: &[
        "Sit upright and loosen tight clothing",
        "Use prescribed inhaler if available",
        "Move to fresh air, away from smoke",
    ],
};

pub static BLEEDING_PROTOCOL: EmergencyProtocolEntry = EmergencyProtocolEntry {
    emergency_type: "BLEEDING EMERGENCY",
    care_heading: "NEAREST TRAUMA CARE",
    phone_numbers: EMERGENCY_NUMBERS,
    nearest_care: EMERGENCY_HOSPITALS,
    waiting_instructions: &[
        "Press firmly on the wound with a clean cloth",
        "Raise the injured part above the heart if possible",
        "Do not remove soaked cloth, add more on top",
    ],
};

pub static UNCONSCIOUS_PROTOCOL: EmergencyProtocolEntry = EmergencyProtocolEntry {
    emergency_type: "UNCONSCIOUSNESS EMERGENCY",
    care_heading: "NEAREST EMERGENCY CARE",
    phone_numbers: EMERGENCY_NUMBERS,
    nearest_care: EMERGENCY_HOSPITALS,
    waiting_instructions: &[
        "Check breathing and pulse",
        "Turn on side (recovery position) if breathing",
        "Do not give food or water",
    ],
};

/// Used for category 5 and for any reply outside 1-5 in emergency mode.
pub static GENERIC_EMERGENCY_PROTOCOL: EmergencyProtocolEntry = EmergencyProtocolEntry {
    emergency_type: "EMERGENCY",
    care_heading: "NEAREST EMERGENCY CARE",
    phone_numbers: EMERGENCY_NUMBERS,
    nearest_care: EMERGENCY_HOSPITALS,
    waiting_instructions: &[
        "Stay calm",
        "Don't move if injured",
        "Keep airway clear if needed",
    ],
};

// ═══════════════════════════════════════════════════════════
// Symptom tables
// ═══════════════════════════════════════════════════════════

pub static FEVER: YellowAlertEntry = YellowAlertEntry {
    conditions: &[
        "Viral fever (most likely)",
        "Seasonal flu",
        "COVID-19 (get tested)",
    ],
    actions: &["Rest and hydrate", "Paracetamol for fever", "Monitor temperature"],
    see_doctor: &[
        "Fever >101°F for >3 days",
        "Breathing difficulty",
        "Severe weakness",
    ],
    nearby: &[
        CareOptionEntry {
            name: "Dr. Sharma Clinic",
            distance: "2km",
            cost: "200",
        },
        CareOptionEntry {
            name: "City Hospital",
            distance: "5km",
            cost: "500",
        },
        CareOptionEntry {
            name: "Call: 102 (Ambulance)",
            distance: "",
            cost: "",
        },
    ],
};

pub static HEADACHE: YellowAlertEntry = YellowAlertEntry {
    conditions: &[
        "Tension headache",
        "Migraine",
        "Sinus headache",
        "Stress-related",
    ],
    actions: &["Rest in quiet, dark room", "Stay hydrated", "Avoid triggers"],
    see_doctor: &[
        "Severe sudden headache",
        "Headache with fever",
        "Vision changes",
    ],
    nearby: &[
        CareOptionEntry {
            name: "Neurology Clinic",
            distance: "3km",
            cost: "300",
        },
        CareOptionEntry {
            name: "General Hospital",
            distance: "4km",
            cost: "400",
        },
    ],
};

/// Timing questions shared by stomach pain and unclassified symptoms.
pub const TIMING_QUESTIONS: &[&str] = &[
    "Few hours ago",
    "Today",
    "Yesterday",
    "More than a week ago",
];

pub static STOMACH_PAIN: SymptomAnalysisEntry = SymptomAnalysisEntry {
    symptom: "Stomach pain",
    questions: TIMING_QUESTIONS,
};

/// Yellow-alert table for a symptom, if it has one.
pub fn yellow_alert(key: SymptomKey) -> Option<&'static YellowAlertEntry> {
    match key {
        SymptomKey::Fever => Some(&FEVER),
        SymptomKey::Headache => Some(&HEADACHE),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════
// General advice
// ═══════════════════════════════════════════════════════════

/// Topics the general-advice branch can answer deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceTopic {
    Diabetes,
    Hypertension,
}

impl AdviceTopic {
    pub fn entry(&self) -> &'static AdviceEntry {
        match self {
            Self::Diabetes => &DIABETES_ADVICE,
            Self::Hypertension => &HYPERTENSION_ADVICE,
        }
    }
}

pub static DIABETES_ADVICE: AdviceEntry = AdviceEntry {
    advice_type: "DIABETES MANAGEMENT",
    recommendations: &[
        "Monitor blood sugar regularly",
        "Follow prescribed diet",
        "Exercise regularly",
        "Take medications as prescribed",
    ],
    warnings: &[
        "Avoid high sugar foods",
        "Check feet daily for wounds",
        "Keep emergency contacts handy",
    ],
    follow_up: "Schedule regular check-ups with your doctor",
};

pub static HYPERTENSION_ADVICE: AdviceEntry = AdviceEntry {
    advice_type: "HYPERTENSION MANAGEMENT",
    recommendations: &[
        "Reduce salt intake",
        "Exercise regularly",
        "Manage stress",
        "Monitor blood pressure",
    ],
    warnings: &[
        "Avoid excessive salt",
        "Limit alcohol consumption",
        "Don't skip medications",
    ],
    follow_up: "Visit your doctor for blood pressure monitoring",
};

// ═══════════════════════════════════════════════════════════
// Stateless branch payloads
// ═══════════════════════════════════════════════════════════

pub const HEALTH_TIPS: &[&str] = &[
    "💧 Stay hydrated! Drink 8-10 glasses of water daily",
    "🚶‍♂️ Take a 30-minute walk today for better heart health",
    "😴 Get 7-8 hours of quality sleep tonight",
    "🥗 Include more vegetables in your meals today",
    "🧘‍♀️ Practice 10 minutes of meditation for stress relief",
    "☀️ Get 15 minutes of sunlight for Vitamin D",
    "📱 Take a 5-minute break from screens every hour",
    "🏃‍♂️ Do some light stretching exercises",
];

pub static DEFAULT_MEDICATION: MedicationPlan = MedicationPlan {
    name: "Vitamin D",
    dosage: "1 tablet",
    time: "9:00 AM",
};

pub const WEB_APP_FEATURES: &[&str] = &[
    "📊 Comprehensive health analysis",
    "📈 Symptom tracking over time",
    "🏥 Doctor recommendations",
    "💊 Medication management",
    "📋 Health reports storage",
    "🎯 Personalized health goals",
];

pub static FAMILY_UPDATE: FamilyUpdateEntry = FamilyUpdateEntry {
    patient_name: "Rahul",
    status: "stable",
    location: "Apollo Hospital",
    doctor: "Sharma",
    last_update: "2 minutes ago",
};

pub static CORPORATE_SUMMARY: CorporateSummaryEntry = CorporateSummaryEntry {
    company_name: "TechCorp Ltd",
    employee_count: 250,
    health_score: 7.4,
    engagement_percent: 72,
    achievements: &[
        "23% reduction in sick days",
        "67 employees completed health assessments",
    ],
    alerts: &[
        "Flu season approaching",
        "12 employees with high stress indicators",
    ],
};
