//! Serial extraction from scanned QR codes and manual entry.
//!
//! Tickets were printed under several schemes over time. Each scheme is a
//! [`PayloadForm`] with a recognizer and an extractor, tried in priority
//! order; the first form that recognizes the input decides the serial.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ACTIVATE_PATH_SEGMENT, LEGACY_PAYLOAD_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PayloadForm {
    /// `<origin>/activate/{sno}`, the current printable link
    UrlForm,
    /// `{event}:{sno}:{name}`
    LegacyTripletForm,
    /// the serial itself
    RawForm,
}

impl PayloadForm {
    /// Priority order used by [`parse_serial`]
    pub const ORDERED: [PayloadForm; 3] = [
        PayloadForm::UrlForm,
        PayloadForm::LegacyTripletForm,
        PayloadForm::RawForm,
    ];

    pub fn recognizes(self, raw: &str) -> bool {
        match self {
            PayloadForm::UrlForm => raw.contains(ACTIVATE_PATH_SEGMENT),
            PayloadForm::LegacyTripletForm => {
                raw.split(LEGACY_PAYLOAD_SEPARATOR).nth(1).is_some()
            }
            PayloadForm::RawForm => true,
        }
    }

    /// Caller must check [`recognizes`](Self::recognizes) first.
    fn extract(self, raw: &str) -> &str {
        match self {
            PayloadForm::UrlForm => raw
                .rfind(ACTIVATE_PATH_SEGMENT)
                .map(|idx| &raw[idx + ACTIVATE_PATH_SEGMENT.len()..])
                .unwrap_or_default(),
            PayloadForm::LegacyTripletForm => {
                raw.split(LEGACY_PAYLOAD_SEPARATOR).nth(1).unwrap_or_default()
            }
            PayloadForm::RawForm => raw.trim(),
        }
    }
}

impl std::fmt::Display for PayloadForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadForm::UrlForm => write!(f, "url"),
            PayloadForm::LegacyTripletForm => write!(f, "legacy_triplet"),
            PayloadForm::RawForm => write!(f, "raw"),
        }
    }
}

/// A serial together with the form it was read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParsedPayload {
    pub sno: String,
    pub form: PayloadForm,
}

/// Which form claims `raw`. Always returns a form since `RawForm` accepts anything.
pub fn detect_form(raw: &str) -> PayloadForm {
    PayloadForm::ORDERED
        .into_iter()
        .find(|form| form.recognizes(raw))
        .unwrap_or(PayloadForm::RawForm)
}

/// Extract a candidate serial from a raw scan.
///
/// Returns `None` for blank input or when the matching form yields nothing
/// (for example a link ending in `/activate/`). The serial format itself is
/// never validated.
pub fn parse_serial(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let sno = detect_form(raw).extract(raw);
    if sno.is_empty() {
        return None;
    }
    Some(sno.to_string())
}

/// [`parse_serial`] together with the form that claimed the input
pub fn parse_payload(raw: &str) -> Option<ParsedPayload> {
    parse_serial(raw).map(|sno| ParsedPayload {
        sno,
        form: detect_form(raw),
    })
}
