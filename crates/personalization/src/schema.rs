//! Wire and domain types for the personalization service
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// One recorded learning activity.
///
/// Shape is checked by deserialization. The `validate` rules only run when
/// strict event validation is enabled in [`crate::config::Config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Event {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub activity_type: String,
    #[validate(length(min = 1))]
    pub topic: String,
    pub subtopic: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub accuracy: f64,
    pub time_taken_seconds: i64,
    pub attempts: i64,
    pub difficulty: String,
    #[validate(length(min = 1))]
    pub exercise_id: String,
}

impl Event {
    /// Range and presence rules applied in strict validation mode.
    ///
    /// The derived rules cover strings and accuracy; the integer counters are
    /// checked here since they must stay `i64`.
    pub fn validate_strict(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if self.time_taken_seconds < 0 {
            errors.add("time_taken_seconds", ValidationError::new("range"));
        }
        if self.attempts < 0 {
            errors.add("attempts", ValidationError::new("range"));
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A single to-do item within a week plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub week_no: i64,
    pub topics: Vec<String>,
    pub tasks: Vec<Task>,
    pub goal: String,
}

/// A user's full study plan. Weeks are kept in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    pub user_id: String,
    pub weeks: Vec<WeekPlan>,
}

/// Date-time parsing for event timestamps.
///
/// Accepts ISO 8601 date-times with or without seconds, with an offset
/// (`Z`, `+02:00`, `+0200`) or naive (taken as UTC), bare dates (midnight
/// UTC), and Unix epochs as numbers or numeric strings. Epochs larger than
/// `2e10` are read as milliseconds. Always serializes as RFC 3339 in UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const OFFSET_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%d %H:%M%z",
    ];
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    const MILLIS_THRESHOLD: f64 = 2e10;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        let zulu = raw
            .strip_suffix('Z')
            .or_else(|| raw.strip_suffix('z'))
            .map(|head| format!("{}+00:00", head));
        let with_offset = zulu.as_deref().unwrap_or(raw);
        if let Some(dt) = OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(with_offset, fmt).ok())
        {
            return Some(dt.with_timezone(&Utc));
        }

        if let Some(naive) = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        {
            return Some(naive.and_utc());
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }

        raw.parse::<f64>().ok().and_then(from_epoch)
    }

    /// Unix epoch in seconds, or milliseconds past `2e10`
    pub fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
        if !value.is_finite() {
            return None;
        }
        let seconds = if value.abs() > MILLIS_THRESHOLD {
            value / 1000.0
        } else {
            value
        };
        let whole = seconds.floor();
        let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
        DateTime::from_timestamp(whole as i64, nanos)
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(raw) => parse(&raw).ok_or_else(|| {
                de::Error::custom(format!("invalid datetime `{}`, expected ISO 8601", raw))
            }),
            RawTimestamp::Integer(secs) => from_epoch(secs as f64)
                .ok_or_else(|| de::Error::custom(format!("epoch {} out of range", secs))),
            RawTimestamp::Float(secs) => from_epoch(secs)
                .ok_or_else(|| de::Error::custom(format!("epoch {} out of range", secs))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_json() -> serde_json::Value {
        json!({
            "user_id": "u1",
            "activity_type": "practice",
            "topic": "arrays",
            "subtopic": "two-pointer",
            "timestamp": "2024-05-01T10:00:00Z",
            "accuracy": 0.8,
            "time_taken_seconds": 120,
            "attempts": 2,
            "difficulty": "medium",
            "exercise_id": "ex-42"
        })
    }

    #[test]
    fn test_event_deserializes_from_full_payload() {
        let event: Event = serde_json::from_value(event_json()).unwrap();
        assert_eq!(event.user_id, "u1");
        assert_eq!(event.attempts, 2);
        assert_eq!(event.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_event_missing_field_is_rejected() {
        let mut payload = event_json();
        payload.as_object_mut().unwrap().remove("user_id");
        let err = serde_json::from_value::<Event>(payload).unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn test_event_wrong_numeric_type_is_rejected() {
        let mut payload = event_json();
        payload["attempts"] = json!("two");
        assert!(serde_json::from_value::<Event>(payload).is_err());
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let mut payload = event_json();
        payload["timestamp"] = json!("2024-05-01T10:00:00.250");
        let event: Event = serde_json::from_value(payload).unwrap();
        assert_eq!(event.timestamp.to_rfc3339(), "2024-05-01T10:00:00.250+00:00");
    }

    #[test]
    fn test_offset_timestamp_is_normalized() {
        assert_eq!(
            timestamp::parse("2024-05-01T12:00:00+02:00").unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_accepted_timestamp_forms() {
        let cases = [
            ("2024-05-01T10:00", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01 10:00", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01T10:00Z", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01T12:00+02:00", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01T12:00:00+0200", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01 12:00:00.5+02:00", "2024-05-01T10:00:00.500+00:00"),
            ("2024-05-01", "2024-05-01T00:00:00+00:00"),
            ("1714557600", "2024-05-01T10:00:00+00:00"),
        ];
        for (raw, expected) in cases {
            let parsed = timestamp::parse(raw).unwrap_or_else(|| panic!("rejected {}", raw));
            assert_eq!(parsed.to_rfc3339(), expected, "input {}", raw);
        }
    }

    #[test]
    fn test_numeric_epoch_timestamps() {
        let mut payload = event_json();
        payload["timestamp"] = json!(1714557600);
        let event: Event = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(event.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");

        payload["timestamp"] = json!(1714557600.25);
        let event: Event = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(event.timestamp.to_rfc3339(), "2024-05-01T10:00:00.250+00:00");

        payload["timestamp"] = json!(1714557600000i64);
        let event: Event = serde_json::from_value(payload).unwrap();
        assert_eq!(event.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_non_timestamp_values_are_rejected() {
        assert!(timestamp::parse("2024-13-40").is_none());
        assert!(timestamp::parse("").is_none());

        let mut payload = event_json();
        payload["timestamp"] = json!(true);
        assert!(serde_json::from_value::<Event>(payload).is_err());
    }

    #[test]
    fn test_large_counters_are_accepted() {
        let mut payload = event_json();
        payload["time_taken_seconds"] = json!(3_000_000_000i64);
        let event: Event = serde_json::from_value(payload).unwrap();
        assert_eq!(event.time_taken_seconds, 3_000_000_000);
        assert!(event.validate_strict().is_ok());
    }

    #[test]
    fn test_strict_rules_name_each_field() {
        let mut payload = event_json();
        payload["accuracy"] = json!(1.5);
        payload["attempts"] = json!(-1);
        let event: Event = serde_json::from_value(payload).unwrap();

        let errors = event.validate_strict().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("accuracy"));
        assert!(fields.contains_key("attempts"));
        assert!(!fields.contains_key("time_taken_seconds"));
    }

    #[test]
    fn test_task_completed_defaults_to_false() {
        let task: Task = serde_json::from_value(json!({ "description": "Read notes" })).unwrap();
        assert_eq!(task, Task::new("Read notes"));
    }
}
