//! Decoding of diagnostic-data endpoint responses.

use crate::report::FetchedReport;
use dxvoice_types::StructuredPayload;
use serde::Deserialize;
use serde_json::Value;

/// Response body of `GET /api/diagnostic-data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticFetchResult {
    #[serde(default)]
    pub data: Option<Value>,
}

impl DiagnosticFetchResult {
    /// Returns the report carried by `data`, or `None` when `data` is
    /// missing, `null`, an empty object, or not shaped like a report.
    pub fn into_payload(self) -> Option<StructuredPayload> {
        let data = self.data?;
        match &data {
            Value::Object(map) if !map.is_empty() => {}
            _ => return None,
        }
        match serde_json::from_value::<FetchedReport>(data) {
            Ok(report) => Some(report.into()),
            Err(e) => {
                tracing::debug!("diagnostic data is not a report: {}", e);
                None
            }
        }
    }
}
