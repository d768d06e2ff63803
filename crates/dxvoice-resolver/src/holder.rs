//! The single "current" report payload.

use crate::resolve::Resolution;
use dxvoice_types::{DiagnosticPayload, StructuredPayload};

/// Holds the payload shown in the report panel.
///
/// The held value only ever changes to another successfully resolved
/// payload; failed resolutions and empty fetches leave it untouched.
#[derive(Debug, Clone, Default)]
pub struct PayloadHolder {
    current: Option<DiagnosticPayload>,
    revision: u64,
}

impl PayloadHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&DiagnosticPayload> {
        self.current.as_ref()
    }

    /// Returns the held payload, or the empty sentinel if nothing resolved yet.
    pub fn current_or_empty(&self) -> DiagnosticPayload {
        self.current
            .clone()
            .unwrap_or_else(|| DiagnosticPayload::Structured(StructuredPayload::empty()))
    }

    /// Number of times the held payload has changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies a local-parse resolution. Returns `true` if the held payload changed.
    pub fn apply_resolution(&mut self, resolution: Resolution) -> bool {
        match resolution {
            Resolution::Resolved(payload) => self.replace(payload),
            Resolution::Unresolved => false,
        }
    }

    /// Applies a diagnostic fetch result. Returns `true` if the held payload changed.
    pub fn apply_fetch(&mut self, fetched: Option<StructuredPayload>) -> bool {
        match fetched {
            Some(payload) => self.replace(DiagnosticPayload::Structured(payload)),
            None => false,
        }
    }

    fn replace(&mut self, payload: DiagnosticPayload) -> bool {
        if self.current.as_ref() == Some(&payload) {
            return false;
        }
        self.current = Some(payload);
        self.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_empty_sentinel() {
        let holder = PayloadHolder::new();
        assert!(holder.current().is_none());
        assert_eq!(
            holder.current_or_empty(),
            DiagnosticPayload::Structured(StructuredPayload::empty())
        );
    }

    #[test]
    fn unresolved_keeps_last_good_value() {
        let mut holder = PayloadHolder::new();
        let good = DiagnosticPayload::Plain("report".to_string());
        assert!(holder.apply_resolution(Resolution::Resolved(good.clone())));
        assert!(!holder.apply_resolution(Resolution::Unresolved));
        assert_eq!(holder.current(), Some(&good));
        assert_eq!(holder.revision(), 1);
    }

    #[test]
    fn empty_fetch_keeps_last_good_value() {
        let mut holder = PayloadHolder::new();
        assert!(holder.apply_fetch(Some(StructuredPayload::from_text("fetched"))));
        assert!(!holder.apply_fetch(None));
        assert_eq!(holder.current().unwrap().main_content(), "fetched");
    }

    #[test]
    fn identical_payload_is_not_a_change() {
        let mut holder = PayloadHolder::new();
        assert!(holder.apply_fetch(Some(StructuredPayload::from_text("same"))));
        assert!(!holder.apply_fetch(Some(StructuredPayload::from_text("same"))));
        assert_eq!(holder.revision(), 1);
    }

    #[test]
    fn newer_payload_replaces_wholesale() {
        let mut holder = PayloadHolder::new();
        let mut first = StructuredPayload::from_text("first");
        first.web_sources.push(dxvoice_types::WebSource {
            title: "T".to_string(),
            url: "U".to_string(),
        });
        holder.apply_fetch(Some(first));
        holder.apply_fetch(Some(StructuredPayload::from_text("second")));
        let current = holder.current().unwrap().to_structured();
        assert_eq!(current.main_content, "second");
        assert!(current.web_sources.is_empty());
    }
}
