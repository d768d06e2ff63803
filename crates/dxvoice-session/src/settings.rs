use crate::error::SessionError;
use dxvoice_types::{Language, ResolverVariant, VoiceBase};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_agent_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Per-session settings, read from the `[session]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Base URL of the backend serving `/api/connection-details` and
    /// `/api/diagnostic-data`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Where the report panel takes its payload from.
    #[serde(default)]
    pub variant: ResolverVariant,

    /// Wait after a new assistant message before querying diagnostic data,
    /// so the backend can finish persisting it. Default: 2000.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// How long the agent has to become ready after the session starts.
    /// Default: 10000.
    #[serde(default = "default_agent_timeout_ms")]
    pub agent_timeout_ms: u64,

    /// Timeout for each backend HTTP request. Default: 10.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub voice_base: VoiceBase,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            variant: ResolverVariant::default(),
            settle_delay_ms: default_settle_delay_ms(),
            agent_timeout_ms: default_agent_timeout_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            language: Language::default(),
            voice_base: VoiceBase::default(),
        }
    }
}

impl SessionSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks the settings for values no session can run with.
    pub fn validate(&self) -> Result<(), SessionError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SessionError::Config(format!("base_url {:?}: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SessionError::Config(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.agent_timeout_ms == 0 {
            return Err(SessionError::Config(
                "agent_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(SessionError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
