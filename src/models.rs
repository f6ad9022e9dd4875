//! Data models for speeches and the persisted archive.
//!
//! This module defines [`SpeechRecord`], the single record type that flows
//! through the whole pipeline: it is deserialized from the speeches hub API,
//! persisted to the on-disk archive, and later mutated in place when the
//! enricher attaches the full transcript text.
//!
//! The serde renames match the upstream API's field names so that the
//! persisted file stays directly comparable with raw API payloads.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::dates;

/// A single speech as listed by the speeches hub API.
///
/// Records are created by the list fetcher (without `speech_text`), merged
/// into the archive keyed on `detail_url`, and enriched in place once the
/// transcript has been scraped. Records are never deleted.
///
/// # Identity
///
/// `detail_url` (the upstream `ItemDefaultUrl`, a relative path) uniquely
/// identifies a speech; the merge step never introduces a duplicate.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechRecord {
    /// The speech title as published.
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Relative path of the speech's detail page. Identity key.
    #[serde(rename = "ItemDefaultUrl", default)]
    pub detail_url: String,
    /// Publication date as a human-readable string, e.g. "14 April 2025".
    /// "FormatedDate" is the upstream API's own spelling.
    #[serde(rename = "FormatedDate", default)]
    pub formatted_date: String,
    /// Full transcript text, attached by the enricher once scraped.
    #[serde(
        rename = "SpeechText",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub speech_text: Option<String>,
}

impl SpeechRecord {
    /// Parse `formatted_date`; `None` when the upstream string is malformed.
    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        dates::parse_formatted_date(&self.formatted_date)
    }

    /// Whether this record already carries non-empty transcript text.
    pub fn has_speech_text(&self) -> bool {
        self.speech_text
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }

    /// Resolve the absolute detail-page URL against `base`.
    pub fn detail_page_url(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.detail_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(detail_url: &str, formatted_date: &str) -> SpeechRecord {
        SpeechRecord {
            title: "WHO Director-General's opening remarks".to_string(),
            detail_url: detail_url.to_string(),
            formatted_date: formatted_date.to_string(),
            speech_text: None,
        }
    }

    #[test]
    fn test_deserializes_api_field_names() {
        let json = r#"{
            "Title": "Address to the World Health Assembly",
            "ItemDefaultUrl": "/director-general/speeches/detail/address-to-the-wha",
            "FormatedDate": "14 April 2025"
        }"#;

        let record: SpeechRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "Address to the World Health Assembly");
        assert_eq!(
            record.detail_url,
            "/director-general/speeches/detail/address-to-the-wha"
        );
        assert_eq!(record.formatted_date, "14 April 2025");
        assert!(record.speech_text.is_none());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record: SpeechRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.detail_url, "");
        assert_eq!(record.formatted_date, "");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{
            "Title": "T",
            "ItemDefaultUrl": "/t",
            "FormatedDate": "1 May 2025",
            "PublicationDateAndTime": "2025-05-01T09:00:00Z"
        }"#;

        let record: SpeechRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.detail_url, "/t");
    }

    #[test]
    fn test_speech_text_omitted_when_absent() {
        let json = serde_json::to_string(&record("/a", "14 April 2025")).unwrap();
        assert!(!json.contains("SpeechText"));
    }

    #[test]
    fn test_speech_text_round_trips() {
        let mut r = record("/a", "14 April 2025");
        r.speech_text = Some("Excellencies, dear colleagues and friends,".to_string());

        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("SpeechText"));

        let back: SpeechRecord = serde_json::from_str(&json).unwrap();
        assert!(back.has_speech_text());
    }

    #[test]
    fn test_parsed_date() {
        assert_eq!(
            record("/a", "14 April 2025").parsed_date(),
            NaiveDate::from_ymd_opt(2025, 4, 14)
        );
        assert_eq!(record("/a", "not a date").parsed_date(), None);
    }

    #[test]
    fn test_has_speech_text_rejects_blank() {
        let mut r = record("/a", "14 April 2025");
        assert!(!r.has_speech_text());
        r.speech_text = Some("   ".to_string());
        assert!(!r.has_speech_text());
        r.speech_text = Some("Good morning.".to_string());
        assert!(r.has_speech_text());
    }

    #[test]
    fn test_detail_page_url() {
        let base = Url::parse("https://www.who.int").unwrap();
        let url = record("/director-general/speeches/detail/remarks", "14 April 2025")
            .detail_page_url(&base)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.who.int/director-general/speeches/detail/remarks"
        );
    }
}
