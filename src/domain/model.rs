use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: u64,
    #[serde(rename = "self", default)]
    pub self_url: String,
    #[serde(default)]
    pub state: String,
    pub name: String,
    #[serde(default, with = "jira_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "jira_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, with = "jira_datetime")]
    pub activated_date: Option<DateTime<Utc>>,
    #[serde(default, with = "jira_datetime")]
    pub complete_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub origin_board_id: Option<u64>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub synced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default, deserialize_with = "id_string::deserialize_opt")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(deserialize_with = "id_string::deserialize")]
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: String,
    #[serde(default)]
    pub fields: serde_json::Value,
    #[serde(default, skip_deserializing)]
    pub assignee: Option<Assignee>,
    #[serde(default, skip_deserializing)]
    pub components: Vec<Component>,
    #[serde(default, skip_deserializing)]
    pub labels: Vec<String>,
}

impl Issue {
    /// Lifts `assignee`, `components` and `labels` out of the raw `fields` object.
    pub fn hydrate(&mut self) -> crate::utils::error::Result<()> {
        self.assignee = match self.fields.get("assignee") {
            Some(value) if !value.is_null() => Some(serde_json::from_value(value.clone())?),
            _ => None,
        };
        self.components = match self.fields.get("components") {
            Some(value) if !value.is_null() => serde_json::from_value(value.clone())?,
            _ => Vec::new(),
        };
        self.labels = match self.fields.get("labels") {
            Some(value) if !value.is_null() => serde_json::from_value(value.clone())?,
            _ => Vec::new(),
        };
        Ok(())
    }

    pub fn assignee_email(&self) -> Option<&str> {
        self.assignee
            .as_ref()
            .and_then(|a| a.email_address.as_deref())
            .filter(|email| !email.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub board_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintIssuesPage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub max_results: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub max_results: usize,
    #[serde(default)]
    pub is_last: bool,
    #[serde(default)]
    pub values: Vec<Board>,
}

/// Everything the report phases need about one sprint.
#[derive(Debug, Clone)]
pub struct SprintSnapshot {
    pub sprint: Sprint,
    pub issues: Vec<Issue>,
}

/// Jira sends ids as strings in some APIs and numbers in others.
mod id_string {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    impl From<StringOrNumber> for String {
        fn from(value: StringOrNumber) -> Self {
            match value {
                StringOrNumber::String(s) => s,
                StringOrNumber::Number(n) => n.to_string(),
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        StringOrNumber::deserialize(deserializer).map(String::from)
    }

    pub fn deserialize_opt<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
    }
}

/// Jira timestamps: RFC 3339, or the server flavour with a `+hhmm` offset.
pub mod jira_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_str(value, OFFSET_FORMAT))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid Jira date: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sprint_deserializes_jira_payload() {
        let json = serde_json::json!({
            "id": 123,
            "self": "https://your-jira-instance/rest/agile/1.0/sprint/123",
            "state": "active",
            "name": "Sprint 123",
            "startDate": "2023-01-01T00:00:00.000Z",
            "endDate": "2023-01-15T00:00:00.000Z",
            "activatedDate": "2023-01-01T00:00:00.000Z",
            "originBoardId": 456,
            "goal": "Placeholder for Sprint Goal",
            "synced": false,
            "autoStartStop": false
        });

        let sprint: Sprint = serde_json::from_value(json).unwrap();
        assert_eq!(sprint.id, 123);
        assert_eq!(sprint.name, "Sprint 123");
        assert_eq!(sprint.origin_board_id, Some(456));
        assert_eq!(
            sprint.start_date,
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            sprint.end_date,
            Some(Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(sprint.complete_date, None);
        assert!(!sprint.synced);
    }

    #[test]
    fn test_future_sprint_without_dates() {
        let json = serde_json::json!({"id": 7, "name": "Next", "state": "future"});
        let sprint: Sprint = serde_json::from_value(json).unwrap();
        assert!(sprint.start_date.is_none());
        assert!(sprint.end_date.is_none());
    }

    #[test]
    fn test_server_offset_dates() {
        let parsed = jira_datetime::parse("2023-01-01T10:00:00.000+0100").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 1, 9, 0, 0).unwrap());
        assert!(jira_datetime::parse("yesterday").is_none());
    }

    #[test]
    fn test_issue_hydrate_lifts_typed_fields() {
        let json = serde_json::json!({
            "id": "10001",
            "key": "CORE-1",
            "self": "https://jira.example.com/rest/api/2/issue/10001",
            "fields": {
                "assignee": {"emailAddress": "ann@example.com", "displayName": "Ann", "active": true},
                "components": [{"id": "10", "name": "Backend"}, {"id": 11, "name": "API"}],
                "labels": ["tech-debt"]
            }
        });

        let mut issue: Issue = serde_json::from_value(json).unwrap();
        issue.hydrate().unwrap();

        assert_eq!(issue.id, "10001");
        assert_eq!(issue.assignee_email(), Some("ann@example.com"));
        assert_eq!(issue.components.len(), 2);
        assert_eq!(issue.components[1].id.as_deref(), Some("11"));
        assert_eq!(issue.labels, vec!["tech-debt".to_string()]);
    }

    #[test]
    fn test_issue_hydrate_handles_nulls() {
        let json = serde_json::json!({
            "id": 5,
            "key": "CORE-5",
            "fields": {"assignee": null, "components": null}
        });

        let mut issue: Issue = serde_json::from_value(json).unwrap();
        issue.hydrate().unwrap();

        assert_eq!(issue.id, "5");
        assert!(issue.assignee.is_none());
        assert!(issue.components.is_empty());
        assert!(issue.labels.is_empty());
    }
}
