use std::env;
use std::time::Duration;

use log::warn;

/// Tunables for one interview session.
///
/// Defaults match the production interview flow: 30 s to confirm readiness,
/// 120 s per answer, 60 s for the candidate's final question.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the recruiting backend. `None` disables submission.
    pub backend_url: Option<String>,
    /// How long to wait for the readiness confirmation after the intro.
    pub ready_timeout: Duration,
    /// How long to wait for an answer to each question.
    pub response_timeout: Duration,
    /// How long to wait for the candidate's final question during closing.
    pub final_question_timeout: Duration,
    /// Interval between periodic screenshot captures.
    pub capture_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            ready_timeout: Duration::from_secs(30),
            response_timeout: Duration::from_secs(120),
            final_question_timeout: Duration::from_secs(60),
            capture_interval: Duration::from_secs(20),
        }
    }
}

impl SessionConfig {
    /// Build a config from `INTERVOX_*` environment variables, falling back
    /// to defaults for anything unset. Unparsable values are skipped with a
    /// warning rather than failing startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("INTERVOX_BACKEND_URL") {
            let url = url.trim().to_string();
            if !url.is_empty() {
                config.backend_url = Some(url);
            }
        }

        if let Some(secs) = env_secs("INTERVOX_READY_TIMEOUT_SECS") {
            config.ready_timeout = secs;
        }
        if let Some(secs) = env_secs("INTERVOX_RESPONSE_TIMEOUT_SECS") {
            config.response_timeout = secs;
        }
        if let Some(secs) = env_secs("INTERVOX_FINAL_TIMEOUT_SECS") {
            config.final_question_timeout = secs;
        }
        if let Some(secs) = env_secs("INTERVOX_CAPTURE_INTERVAL_SECS") {
            config.capture_interval = secs;
        }

        config
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            warn!("Ignoring {key}={raw}: expected a whole number of seconds");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_interview_flow() {
        let config = SessionConfig::default();
        assert_eq!(config.ready_timeout, Duration::from_secs(30));
        assert_eq!(config.response_timeout, Duration::from_secs(120));
        assert_eq!(config.final_question_timeout, Duration::from_secs(60));
        assert!(config.backend_url.is_none());
    }
}
