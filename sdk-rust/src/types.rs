use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of the create-summary request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub meeting_title: String,
    pub meeting_notes: String,
    /// Free-form guidance for the summarizer. Sent as an empty string when
    /// the user gave none.
    pub custom_instructions: String,
}

/// The summary the service generated for the most recent request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSummary {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryUpdate {
    pub updated_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub meeting_id: String,
}

/// Body of the send-mail request.
/// `recipients` is a single comma separated string on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailRequest {
    pub recipients: String,
    pub subject: String,
    pub edited_summary: String,
    pub additional_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub history_data: Vec<SummaryRecord>,
}

/// A persisted summary as listed by the history store.
/// The id is assigned by the service and never fabricated by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "meeting_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "meeting_title")]
    pub title: String,
    /// Markdown text of the summary.
    #[serde(rename = "meeting_summary")]
    pub body_text: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Ids are opaque; some stores hand them out as integers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp as RFC 3339, falling back to a naive timestamp read as
/// UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn summary_request_uses_camel_case_fields() {
        let request = SummaryRequest {
            meeting_title: "Standup".to_string(),
            meeting_notes: "We shipped X".to_string(),
            custom_instructions: String::new(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "meetingTitle": "Standup",
                "meetingNotes": "We shipped X",
                "customInstructions": ""
            })
        );
    }

    #[test]
    fn summary_record_reads_store_field_names() {
        let record: SummaryRecord = serde_json::from_value(json!({
            "meeting_id": "abc",
            "meeting_title": "Planning",
            "meeting_summary": "# Planning",
            "created_at": "2024-03-01T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(record.id, "abc");
        assert_eq!(record.title, "Planning");
        assert_eq!(record.body_text, "# Planning");
        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn summary_record_accepts_numeric_ids() {
        let record: SummaryRecord = serde_json::from_value(json!({
            "meeting_id": 42,
            "meeting_title": "Retro",
            "meeting_summary": "",
            "created_at": "2024-03-01 09:30:00.123"
        }))
        .unwrap();

        assert_eq!(record.id, "42");
    }

    #[test]
    fn parse_timestamp_reads_naive_values_as_utc() {
        assert_eq!(
            parse_timestamp("2024-03-01T09:30:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-03-01T11:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
