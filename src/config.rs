use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "MedAssist";
pub const APP_SERVICE_NAME: &str = "MedAssist AI WhatsApp Bot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Link advertised in call-to-action lines of rendered replies.
pub const WEB_APP_LINK: &str = "medassist.ai";

/// Default HTTP port (matches the n8n workflow wiring).
pub const DEFAULT_PORT: u16 = 5000;

/// Default upper bound for one free-form completion.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 30;

/// Default Ollama endpoint used when only a model name is configured.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medassist=info,medassist_lib=info,tower_http=warn"
}

/// Get the application data directory
/// ~/MedAssist/ on all platforms. Falls back to the working directory
/// when no home directory can be determined (containers).
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the SQLite session database.
pub fn default_session_db_path() -> PathBuf {
    app_data_dir().join("sessions.db")
}

/// Where user sessions live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Sqlite(PathBuf),
}

/// Where free-form completions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionBackendConfig {
    Disabled,
    Ollama { base_url: String, model: String },
}

/// Runtime configuration, read from `MEDASSIST_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub sessions: SessionBackend,
    pub completion: CompletionBackendConfig,
    pub completion_timeout: Duration,
    /// Pins daily-tip selection. `None` seeds from OS entropy.
    pub tip_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            sessions: SessionBackend::Memory,
            completion: CompletionBackendConfig::Disabled,
            completion_timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
            tip_seed: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_ip = match lookup("MEDASSIST_BIND") {
            Some(raw) => raw.trim().parse::<IpAddr>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid MEDASSIST_BIND, using 0.0.0.0");
                defaults.bind_addr.ip()
            }),
            None => defaults.bind_addr.ip(),
        };
        let port = parse_or_default(&lookup, "MEDASSIST_PORT", DEFAULT_PORT);

        let sessions = match lookup("MEDASSIST_SESSION_DB") {
            Some(raw) if raw.trim().eq_ignore_ascii_case("memory") => SessionBackend::Memory,
            Some(raw) if raw.trim().eq_ignore_ascii_case("default") => {
                SessionBackend::Sqlite(default_session_db_path())
            }
            Some(raw) if !raw.trim().is_empty() => {
                SessionBackend::Sqlite(PathBuf::from(raw.trim()))
            }
            _ => SessionBackend::Memory,
        };

        let completion = match lookup("MEDASSIST_OLLAMA_MODEL") {
            Some(model) if !model.trim().is_empty() => CompletionBackendConfig::Ollama {
                base_url: lookup("MEDASSIST_OLLAMA_URL")
                    .filter(|u| !u.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
                model: model.trim().to_string(),
            },
            _ => CompletionBackendConfig::Disabled,
        };

        let timeout_secs = parse_or_default(
            &lookup,
            "MEDASSIST_COMPLETION_TIMEOUT_SECS",
            DEFAULT_COMPLETION_TIMEOUT_SECS,
        );

        let tip_seed = lookup("MEDASSIST_TIP_SEED").and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(value = %raw, "Invalid MEDASSIST_TIP_SEED, tips will be random");
                None
            }
        });

        Self {
            bind_addr: SocketAddr::new(bind_ip, port),
            sessions,
            completion,
            completion_timeout: Duration::from_secs(timeout_secs.max(1)),
            tip_seed,
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, fallback = %default, "Invalid config value");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("MedAssist"));
    }

    #[test]
    fn session_db_under_app_data() {
        assert!(default_session_db_path().starts_with(app_data_dir()));
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.sessions, SessionBackend::Memory);
        assert_eq!(config.completion, CompletionBackendConfig::Disabled);
        assert_eq!(
            config.completion_timeout,
            Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS)
        );
        assert!(config.tip_seed.is_none());
    }

    #[test]
    fn ollama_model_enables_completion_with_default_url() {
        let config = AppConfig::from_lookup(lookup_from(&[("MEDASSIST_OLLAMA_MODEL", "medgemma")]));
        assert_eq!(
            config.completion,
            CompletionBackendConfig::Ollama {
                base_url: DEFAULT_OLLAMA_URL.into(),
                model: "medgemma".into(),
            }
        );
    }

    #[test]
    fn sqlite_path_and_port_are_read() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MEDASSIST_SESSION_DB", "/tmp/medassist.db"),
            ("MEDASSIST_PORT", "8080"),
            ("MEDASSIST_TIP_SEED", "42"),
        ]));
        assert_eq!(config.sessions, SessionBackend::Sqlite(PathBuf::from("/tmp/medassist.db")));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.tip_seed, Some(42));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MEDASSIST_PORT", "not-a-port"),
            ("MEDASSIST_COMPLETION_TIMEOUT_SECS", "-3"),
            ("MEDASSIST_BIND", "nowhere"),
        ]));
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(
            config.completion_timeout,
            Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS)
        );
        assert!(config.bind_addr.ip().is_unspecified());
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("MEDASSIST_COMPLETION_TIMEOUT_SECS", "0")]));
        assert_eq!(config.completion_timeout, Duration::from_secs(1));
    }
}
