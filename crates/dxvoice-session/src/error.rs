use thiserror::Error;

/// Message shown to the user when the room cannot be joined. The underlying
/// cause is kept as the error source and logged, never displayed.
pub const CONNECTION_DETAILS_MESSAGE: &str = "failed to fetch connection details";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to fetch connection details")]
    ConnectionDetailsStatus(u16),

    #[error("failed to fetch connection details")]
    ConnectionDetailsRequest(#[source] reqwest::Error),

    #[error("diagnostic data request returned status {0}")]
    DiagnosticStatus(u16),

    #[error("diagnostic data request failed: {0}")]
    DiagnosticRequest(#[source] reqwest::Error),

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SessionError {
    /// Returns `true` for failures of the connection-details request.
    pub fn is_connection_details(&self) -> bool {
        matches!(
            self,
            Self::ConnectionDetailsStatus(_) | Self::ConnectionDetailsRequest(_)
        )
    }
}
