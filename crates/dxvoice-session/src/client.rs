//! HTTP client for the session backend.
//!
//! Two endpoints:
//! - `GET /api/connection-details?language=<code>&voiceBase=<label>`: the
//!   descriptor used to join the media room
//! - `GET /api/diagnostic-data`: the report the agent persisted for the
//!   latest turn

use crate::error::SessionError;
use crate::settings::SessionSettings;
use dxvoice_resolver::DiagnosticFetchResult;
use dxvoice_types::{ConnectionDetails, Language, StructuredPayload, VoiceBase};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SessionError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SessionError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &SessionSettings) -> Result<Self, SessionError> {
        Self::new(&settings.base_url, settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests the descriptor for joining the media room.
    ///
    /// Any failure is reported with the same generic message; the cause is
    /// logged here and kept as the error source.
    pub async fn connection_details(
        &self,
        language: Language,
        voice_base: VoiceBase,
    ) -> Result<ConnectionDetails, SessionError> {
        let url = format!("{}/api/connection-details", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("language", language.code()), ("voiceBase", voice_base.label())])
            .send()
            .await
            .map_err(|e| {
                error!(%url, "connection details request failed: {}", e);
                SessionError::ConnectionDetailsRequest(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%url, status = status.as_u16(), "connection details request rejected");
            return Err(SessionError::ConnectionDetailsStatus(status.as_u16()));
        }

        response.json::<ConnectionDetails>().await.map_err(|e| {
            error!(%url, "connection details response is malformed: {}", e);
            SessionError::ConnectionDetailsRequest(e)
        })
    }

    /// Fetches the latest persisted report.
    ///
    /// `Ok(None)` means the backend answered but had nothing to show.
    pub async fn diagnostic_data(&self) -> Result<Option<StructuredPayload>, SessionError> {
        let url = format!("{}/api/diagnostic-data", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(SessionError::DiagnosticRequest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::DiagnosticStatus(status.as_u16()));
        }

        let body: DiagnosticFetchResult = response
            .json()
            .await
            .map_err(SessionError::DiagnosticRequest)?;
        let payload = body.into_payload();
        debug!(found = payload.is_some(), "fetched diagnostic data");
        Ok(payload)
    }
}
