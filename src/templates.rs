//! Template catalog: pure renderers from named parameters to one reply.
//!
//! Every reply follows the same shape: a heading marker, body sections each
//! introduced by a fixed pictographic marker, and a closing call-to-action.
//! List parameters render as one bullet line per element, in input order.
//! A missing or mistyped parameter is a broken knowledge table, so
//! rendering refuses instead of emitting an empty section.

use std::collections::BTreeMap;

use crate::knowledge::{
    AdviceEntry, CareOptionEntry, CorporateSummaryEntry, EmergencyProtocolEntry,
    FamilyUpdateEntry, HospitalEntry, MedicationPlan, SymptomAnalysisEntry, YellowAlertEntry,
};
use crate::models::Language;

const BULLET: &str = "•";

/// Catalog entries. The wire name is used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    Welcome,
    OnboardingName,
    OnboardingAge,
    OnboardingCity,
    OnboardingComplete,
    SymptomIntake,
    YellowAlert,
    EmergencyMenu,
    EmergencyProtocol,
    VoiceConfirmation,
    VoiceCorrection,
    SymptomAnalysis,
    MedicationReminder,
    MedicationConfirmation,
    MedicationSnooze,
    HealthTip,
    WebAppTransition,
    FamilyCareUpdate,
    CorporateWellness,
    GeneralAdvice,
    FallbackPrompt,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::OnboardingName => "onboarding_name",
            Self::OnboardingAge => "onboarding_age",
            Self::OnboardingCity => "onboarding_city",
            Self::OnboardingComplete => "onboarding_complete",
            Self::SymptomIntake => "symptom_intake",
            Self::YellowAlert => "yellow_alert",
            Self::EmergencyMenu => "emergency_menu",
            Self::EmergencyProtocol => "emergency_protocol",
            Self::VoiceConfirmation => "voice_confirmation",
            Self::VoiceCorrection => "voice_correction",
            Self::SymptomAnalysis => "symptom_analysis",
            Self::MedicationReminder => "medication_reminder",
            Self::MedicationConfirmation => "medication_confirmation",
            Self::MedicationSnooze => "medication_snooze",
            Self::HealthTip => "health_tip",
            Self::WebAppTransition => "web_app_transition",
            Self::FamilyCareUpdate => "family_care_update",
            Self::CorporateWellness => "corporate_wellness",
            Self::GeneralAdvice => "general_advice",
            Self::FallbackPrompt => "fallback_prompt",
        }
    }
}

impl std::fmt::Display for TemplateName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════
// Parameters
// ═══════════════════════════════════════════════════════════

/// A care location: clinic with a cost, or hospital with a phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareRecord {
    pub name: String,
    pub distance: String,
    pub cost: Option<String>,
    pub phone: Option<String>,
}

impl From<&CareOptionEntry> for CareRecord {
    fn from(entry: &CareOptionEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            distance: entry.distance.to_string(),
            cost: Some(entry.cost.to_string()).filter(|c| !c.is_empty()),
            phone: None,
        }
    }
}

impl From<&HospitalEntry> for CareRecord {
    fn from(entry: &HospitalEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            distance: entry.distance.to_string(),
            cost: None,
            phone: Some(entry.phone.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
    Records(Vec<CareRecord>),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Records(_) => "records",
        }
    }
}

/// Named parameters for one template invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateParams {
    values: BTreeMap<&'static str, ParamValue>,
}

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, ParamValue::Text(value.into()));
        self
    }

    pub fn list<I, S>(mut self, key: &'static str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.values.insert(key, ParamValue::List(items));
        self
    }

    pub fn records(mut self, key: &'static str, records: Vec<CareRecord>) -> Self {
        self.values.insert(key, ParamValue::Records(records));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Template '{template}' is missing required parameter '{param}'")]
    MissingParameter {
        template: TemplateName,
        param: &'static str,
    },

    #[error("Template '{template}' parameter '{param}' must be {expected}, got {found}")]
    WrongParameterType {
        template: TemplateName,
        param: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Typed, fail-fast access to one invocation's parameters.
struct Fields<'a> {
    template: TemplateName,
    params: &'a TemplateParams,
}

impl<'a> Fields<'a> {
    fn lookup(&self, param: &'static str) -> Result<&'a ParamValue, TemplateError> {
        self.params.get(param).ok_or(TemplateError::MissingParameter {
            template: self.template,
            param,
        })
    }

    fn mismatch(
        &self,
        param: &'static str,
        expected: &'static str,
        found: &ParamValue,
    ) -> TemplateError {
        TemplateError::WrongParameterType {
            template: self.template,
            param,
            expected,
            found: found.kind(),
        }
    }

    fn text(&self, param: &'static str) -> Result<&'a str, TemplateError> {
        match self.lookup(param)? {
            ParamValue::Text(s) => Ok(s),
            other => Err(self.mismatch(param, "text", other)),
        }
    }

    fn list(&self, param: &'static str) -> Result<&'a [String], TemplateError> {
        match self.lookup(param)? {
            ParamValue::List(items) => Ok(items),
            other => Err(self.mismatch(param, "list", other)),
        }
    }

    fn records(&self, param: &'static str) -> Result<&'a [CareRecord], TemplateError> {
        match self.lookup(param)? {
            ParamValue::Records(items) => Ok(items),
            other => Err(self.mismatch(param, "records", other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════

/// Render one template. Pure: the same params always give the same text.
pub fn render(template: TemplateName, params: &TemplateParams) -> Result<String, TemplateError> {
    let f = Fields { template, params };
    let mut lines: Vec<String> = Vec::new();

    match template {
        TemplateName::Welcome => {
            lines.push("🏥 Welcome to MedAssist AI!".into());
            lines.push(String::new());
            lines.push("I'm your Health Buddy 🤖 - Your AI-powered healthcare companion!".into());
            lines.push(String::new());
            lines.push("Choose your language:".into());
            for (i, lang) in Language::MENU.iter().enumerate() {
                lines.push(format!("{}️⃣ {}", i + 1, lang.native_label()));
            }
            lines.push(String::new());
            lines.push("Type your choice (1-4) to get started!".into());
        }
        TemplateName::OnboardingName => {
            lines.push("👋 Great! Let's set up your profile:".into());
            lines.push(String::new());
            lines.push("What's your name?".into());
        }
        TemplateName::OnboardingAge => {
            lines.push(format!("Hi {}! ", f.text("name")?));
            lines.push(String::new());
            lines.push("What's your age?".into());
        }
        TemplateName::OnboardingCity => {
            lines.push("📍 Which city/district are you in?".into());
        }
        TemplateName::OnboardingComplete => {
            let link = f.text("web_app_link")?;
            lines.push("Perfect! Your Health Buddy is ready! ✅".into());
            lines.push(String::new());
            lines.push("🔹 Type 'symptoms' - Check symptoms".into());
            lines.push("🚨 Type 'emergency' - Get emergency help".into());
            lines.push("💡 Type 'tips' - Daily health tips".into());
            lines.push("🌐 Type 'web' - Access full features".into());
            lines.push(String::new());
            lines.push(format!(
                "💡 Pro tip: For detailed health analysis, try our web app: [{link}]"
            ));
        }
        TemplateName::SymptomIntake => {
            lines.push("🤖 I'm here to help!".into());
            lines.push(String::new());
            lines.push("Tell me what you're feeling. You can:".into());
            lines.push("📝 Type your symptoms".into());
            lines.push("🎤 Send voice message".into());
            lines.push("📷 Send photo if visible".into());
            lines.push("⏰".into());
            lines.push("When did it start?".into());
            push_bullets(&mut lines, f.list("questions")?);
            lines.push("What's bothering you today?".into());
        }
        TemplateName::YellowAlert => {
            lines.push("⚠".into());
            lines.push("YELLOW ALERT - Medical Attention Recommended".into());
            lines.push("📋".into());
            lines.push("Possible Conditions:".into());
            push_bullets(&mut lines, f.list("conditions")?);
            lines.push("🏥".into());
            lines.push("Immediate Actions:".into());
            push_bullets(&mut lines, f.list("actions")?);
            lines.push("⚠".into());
            lines.push("See doctor if:".into());
            push_bullets(&mut lines, f.list("see_doctor")?);
            lines.push("🏥".into());
            lines.push("Nearby Options:".into());
            for option in f.records("nearby")? {
                lines.push(care_option_line(option));
            }
            lines.push(format!(
                "Need more detailed analysis? Check our web app: [{}]",
                f.text("web_app_link")?
            ));
        }
        TemplateName::EmergencyMenu => {
            lines.push("🚨".into());
            lines.push("EMERGENCY MODE ACTIVATED".into());
            lines.push("Are you experiencing:".into());
            for (i, category) in f.list("categories")?.iter().enumerate() {
                lines.push(format!("{BULLET} {}. {category}", i + 1));
            }
            lines.push(String::new());
            lines.push("Reply with the number (1-5) or describe your emergency.".into());
        }
        TemplateName::EmergencyProtocol => {
            lines.push("🚨".into());
            lines.push(format!("{} - ACT NOW!", f.text("emergency_type")?.to_uppercase()));
            lines.push("🏥".into());
            lines.push("CALL IMMEDIATELY:".into());
            push_bullets(&mut lines, f.list("phone_numbers")?);
            lines.push("🏥".into());
            lines.push(format!("{}:", f.text("care_heading")?));
            for hospital in f.records("nearest_care")? {
                lines.push(format!("{BULLET} {} - {}", hospital.name, hospital.distance));
                if let Some(phone) = &hospital.phone {
                    lines.push(format!("  {phone}"));
                }
            }
            lines.push("⏰".into());
            lines.push("WHILE WAITING:".into());
            push_bullets(&mut lines, f.list("waiting_instructions")?);
            lines.push("📍".into());
            lines.push("Share location with family/friends".into());
            lines.push("  I'm monitoring - reply if condition changes".into());
        }
        TemplateName::VoiceConfirmation => {
            lines.push("🎤".into());
            lines.push("Voice received! Processing...".into());
            lines.push(format!("I understood: \"{}\" Is this correct?", f.text("understood")?));
            lines.push("✅".into());
            lines.push("Yes".into());
            lines.push("❌".into());
            lines.push("No (type correct symptom)".into());
        }
        TemplateName::VoiceCorrection => {
            lines.push("🎤".into());
            lines.push("Sorry I got that wrong!".into());
            lines.push("📝".into());
            lines.push("Please type your symptom in your own words.".into());
        }
        TemplateName::SymptomAnalysis => {
            lines.push("🤕".into());
            lines.push(format!("{} - Let me help!", f.text("symptom")?));
            lines.push("When did it start?".into());
            push_bullets(&mut lines, f.list("questions")?);
        }
        TemplateName::MedicationReminder => {
            lines.push("💊".into());
            lines.push("Medication Reminder".into());
            lines.push(format!(
                "Time for your {} ({})!",
                f.text("medication")?,
                f.text("dosage")?
            ));
            lines.push(format!("⏰ Scheduled: {}", f.text("time")?));
            lines.push(String::new());
            lines.push("Reply ✅ when taken or ⏰ to snooze 1 hour".into());
            lines.push(String::new());
            lines.push(format!("Streak: {} days 🎉", f.text("streak")?));
        }
        TemplateName::MedicationConfirmation => {
            lines.push(format!("Great! {} logged ✅", f.text("medication")?));
            lines.push(format!("Streak: {} days 🎉", f.text("streak")?));
            lines.push("Keep it up! Your health is improving.".into());
        }
        TemplateName::MedicationSnooze => {
            lines.push("⏰".into());
            lines.push(format!(
                "Okay! I'll remind you about your {} in 1 hour.",
                f.text("medication")?
            ));
            lines.push("Reply ✅ as soon as you take it.".into());
        }
        TemplateName::HealthTip => {
            lines.push("💡 Daily Health Tip:".into());
            lines.push(String::new());
            lines.push(f.text("tip")?.to_string());
            lines.push(String::new());
            lines.push(format!(
                "Want personalized tips? Try our web app: [{}]",
                f.text("web_app_link")?
            ));
        }
        TemplateName::WebAppTransition => {
            lines.push("🌐 Access full MedAssist AI features on our web app:".into());
            lines.push(String::new());
            lines.push(f.text("web_app_link")?.to_string());
            lines.push(String::new());
            lines.push("Features:".into());
            push_bullets(&mut lines, f.list("features")?);
        }
        TemplateName::FamilyCareUpdate => {
            lines.push("📱 MedAssist Update:".into());
            lines.push(String::new());
            lines.push(format!(
                "{} is {} and under medical care at {}.",
                f.text("patient_name")?,
                f.text("status")?,
                f.text("location")?
            ));
            lines.push(String::new());
            lines.push(format!("Attending: Dr. {}", f.text("doctor")?));
            lines.push(format!("Last Update: {}", f.text("last_update")?));
            lines.push(String::new());
            lines.push(format!("Track status: [{}/family]", f.text("web_app_link")?));
        }
        TemplateName::CorporateWellness => {
            lines.push(format!("🏢 {} - Health Overview", f.text("company_name")?));
            lines.push(String::new());
            lines.push("📊 Health Metrics:".into());
            lines.push(format!("{BULLET} Overall Score: {}/10", f.text("health_score")?));
            lines.push(format!("{BULLET} Active Users: {} employees", f.text("employee_count")?));
            lines.push(format!("{BULLET} Platform Usage: {}% engagement", f.text("engagement")?));
            lines.push(String::new());
            lines.push("✅ Monthly Highlights:".into());
            push_bullets(&mut lines, f.list("achievements")?);
            lines.push(String::new());
            lines.push("⚠ Alerts:".into());
            push_bullets(&mut lines, f.list("alerts")?);
            lines.push(String::new());
            lines.push(format!("View full report: [{}/corporate]", f.text("web_app_link")?));
        }
        TemplateName::GeneralAdvice => {
            lines.push("💊".into());
            lines.push(f.text("advice_type")?.to_uppercase());
            lines.push("📋".into());
            lines.push("Recommendations:".into());
            push_bullets(&mut lines, f.list("recommendations")?);
            lines.push("⚠".into());
            lines.push("Important Notes:".into());
            push_bullets(&mut lines, f.list("warnings")?);
            lines.push("🏥".into());
            lines.push(f.text("follow_up")?.to_string());
        }
        TemplateName::FallbackPrompt => {
            lines.push(FALLBACK_PROMPT.to_string());
        }
    }

    Ok(lines.join("\n"))
}

/// The fixed reply used whenever free-form completion is unavailable.
pub const FALLBACK_PROMPT: &str = "🏥
I understand you have a medical concern. Let me help you better.
Could you please describe your symptoms in more detail?
• What symptoms are you experiencing?
• When did they start?
• How severe are they?
• Any other relevant information?";

fn push_bullets(lines: &mut Vec<String>, items: &[String]) {
    lines.extend(items.iter().map(|item| format!("{BULLET} {item}")));
}

fn care_option_line(option: &CareRecord) -> String {
    let mut line = format!("{BULLET} {}", option.name);
    if !option.distance.is_empty() {
        line.push_str(" - ");
        line.push_str(&option.distance);
    }
    if let Some(cost) = &option.cost {
        line.push_str(&format!(" (₹{cost})"));
    }
    line
}

// ═══════════════════════════════════════════════════════════
// Parameter builders from knowledge entries
// ═══════════════════════════════════════════════════════════

pub fn yellow_alert_params(entry: &YellowAlertEntry, web_app_link: &str) -> TemplateParams {
    TemplateParams::new()
        .list("conditions", entry.conditions.iter().copied())
        .list("actions", entry.actions.iter().copied())
        .list("see_doctor", entry.see_doctor.iter().copied())
        .records("nearby", entry.nearby.iter().map(CareRecord::from).collect())
        .text("web_app_link", web_app_link)
}

pub fn emergency_protocol_params(entry: &EmergencyProtocolEntry) -> TemplateParams {
    TemplateParams::new()
        .text("emergency_type", entry.emergency_type)
        .list("phone_numbers", entry.phone_numbers.iter().copied())
        .text("care_heading", entry.care_heading)
        .records(
            "nearest_care",
            entry.nearest_care.iter().map(CareRecord::from).collect(),
        )
        .list("waiting_instructions", entry.waiting_instructions.iter().copied())
}

pub fn symptom_analysis_params(entry: &SymptomAnalysisEntry) -> TemplateParams {
    TemplateParams::new()
        .text("symptom", entry.symptom)
        .list("questions", entry.questions.iter().copied())
}

pub fn medication_reminder_params(plan: &MedicationPlan, streak: u32) -> TemplateParams {
    TemplateParams::new()
        .text("medication", plan.name)
        .text("dosage", plan.dosage)
        .text("time", plan.time)
        .text("streak", streak.to_string())
}

pub fn medication_confirmation_params(plan: &MedicationPlan, streak: u32) -> TemplateParams {
    TemplateParams::new()
        .text("medication", plan.name)
        .text("streak", streak.to_string())
}

pub fn family_update_params(entry: &FamilyUpdateEntry, web_app_link: &str) -> TemplateParams {
    TemplateParams::new()
        .text("patient_name", entry.patient_name)
        .text("status", entry.status)
        .text("location", entry.location)
        .text("doctor", entry.doctor)
        .text("last_update", entry.last_update)
        .text("web_app_link", web_app_link)
}

pub fn corporate_summary_params(
    entry: &CorporateSummaryEntry,
    web_app_link: &str,
) -> TemplateParams {
    TemplateParams::new()
        .text("company_name", entry.company_name)
        .text("employee_count", entry.employee_count.to_string())
        .text("health_score", format!("{:.1}", entry.health_score))
        .text("engagement", entry.engagement_percent.to_string())
        .list("achievements", entry.achievements.iter().copied())
        .list("alerts", entry.alerts.iter().copied())
        .text("web_app_link", web_app_link)
}

pub fn advice_params(entry: &AdviceEntry) -> TemplateParams {
    TemplateParams::new()
        .text("advice_type", entry.advice_type)
        .list("recommendations", entry.recommendations.iter().copied())
        .list("warnings", entry.warnings.iter().copied())
        .text("follow_up", entry.follow_up)
}
