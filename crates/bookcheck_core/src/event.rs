use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Comparison outcome reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Match,
    Mismatch,
    Unclear,
}

impl MatchStatus {
    /// Anything that is neither `match` nor `mismatch` counts as unclear.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "match" => MatchStatus::Match,
            "mismatch" => MatchStatus::Mismatch,
            _ => MatchStatus::Unclear,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Match => "match",
            MatchStatus::Mismatch => "mismatch",
            MatchStatus::Unclear => "unclear",
        }
    }
}

/// One field comparison between the initial quote and the final booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ComparisonRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub field: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub initial_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub final_value: Option<String>,
    /// Status label exactly as sent on the wire.
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub explanation: String,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub evidence: Vec<String>,
}

impl ComparisonRecord {
    pub fn match_status(&self) -> MatchStatus {
        MatchStatus::from_label(&self.status)
    }
}

/// Fields extracted from a single screenshot. `None` means the service could not read it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub hotel_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub check_in: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub check_out: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub guests: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub total_price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ExtractionRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub screenshot_id: String,
    /// `initial_quote`, `final_booking` or `unknown`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub classification: String,
    #[serde(default)]
    pub extraction: ExtractedFields,
}

/// Payload of the terminal `final` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSummary {
    /// Overall verdict as sent, before upper-casing.
    pub overall: String,
    pub detail: Option<String>,
}

/// A decoded application event, interpreted from one `data:` JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Progress { text: String },
    Extraction(ExtractionRecord),
    Comparison(ComparisonRecord),
    Final(FinalSummary),
    /// A known event type whose payload lacks what the reducer needs.
    Malformed { kind: String, reason: String },
    /// Unrecognised or missing `type`; ignored by the reducer.
    Unknown { kind: Option<String> },
}

impl StreamEvent {
    /// Interprets a decoded JSON value. Never fails: shapes the reducer cannot use
    /// become `Malformed` or `Unknown`.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return StreamEvent::Unknown { kind: None };
        };
        let kind = match object.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            _ => return StreamEvent::Unknown { kind: None },
        };
        let payload = object.remove("payload").unwrap_or(Value::Null);

        match kind.as_str() {
            "progress" => StreamEvent::Progress {
                text: progress_text(&payload),
            },
            "comparison" => match ComparisonRecord::deserialize(payload) {
                Ok(record) => StreamEvent::Comparison(record),
                Err(err) => StreamEvent::Malformed {
                    kind,
                    reason: err.to_string(),
                },
            },
            "extraction" => {
                let screenshot = match payload {
                    Value::Object(mut payload) => payload.remove("screenshot"),
                    _ => None,
                };
                match screenshot.map(ExtractionRecord::deserialize) {
                    Some(Ok(record)) => StreamEvent::Extraction(record),
                    Some(Err(err)) => StreamEvent::Malformed {
                        kind,
                        reason: err.to_string(),
                    },
                    None => StreamEvent::Malformed {
                        kind,
                        reason: "missing payload.screenshot".to_string(),
                    },
                }
            }
            "final" => match final_summary(&payload) {
                Some(summary) => StreamEvent::Final(summary),
                None => StreamEvent::Malformed {
                    kind,
                    reason: "missing payload.summary.overall".to_string(),
                },
            },
            _ => StreamEvent::Unknown { kind: Some(kind) },
        }
    }
}

/// Message of the diagnostic the decoder synthesizes for unparseable payloads.
pub const PARSE_ERROR_MESSAGE: &str = "json_parse_error";

// `message` when present, otherwise the whole payload as compact JSON. Only the
// parse-error diagnostic gets its `raw` text appended.
fn progress_text(payload: &Value) -> String {
    let message = match payload.get("message") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => return payload.to_string(),
        Some(other) => other.to_string(),
    };
    if message != PARSE_ERROR_MESSAGE {
        return message;
    }
    match payload.get("raw") {
        Some(Value::String(raw)) => format!("{message}: {raw}"),
        Some(Value::Null) | None => message,
        Some(raw) => format!("{message}: {raw}"),
    }
}

fn final_summary(payload: &Value) -> Option<FinalSummary> {
    let summary = payload.get("summary")?;
    let overall = summary.get("overall")?.as_str()?.to_string();
    let detail = summary
        .get("detail")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);
    Some(FinalSummary { overall, detail })
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_text))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

fn lenient_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![single],
    };
    Ok(items.into_iter().filter_map(value_to_text).collect())
}
