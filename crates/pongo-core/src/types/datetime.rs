//! Timestamp schema type

use super::{cast_failed, check_bounds, current, mismatch, truncate_to_i64};
use crate::action::Action;
use crate::data::{format_rfc3339, Data};
use crate::error::{ErrorCause, JsonSchemaError, SchemaError};
use crate::node::SchemaType;
use crate::path::DataPointer;
use crate::property::{ActionFlag, ActionProperty};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Write as _;

/// Accepts timestamps.
///
/// When casting, text is parsed with the action's `strftime` format (RFC 3339
/// when unset) and numbers are read as Unix seconds. Parsing yields a
/// timestamp; serializing yields text in the action's format.
///
/// Formats are checked when a body is decoded and again before processing,
/// so a malformed format is reported as an error at the current path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatetimeType {
    #[serde(default, skip_serializing_if = "ActionProperty::is_empty")]
    format: ActionProperty<String>,

    #[serde(default, skip_serializing_if = "ActionFlag::is_empty")]
    cast: ActionFlag,

    /// Latest accepted instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    before: Option<DateTime<FixedOffset>>,

    /// Earliest accepted instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    after: Option<DateTime<FixedOffset>>,
}

impl DatetimeType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(mut self, cast: bool) -> Self {
        self.cast.set_all(cast);
        self
    }

    pub fn cast_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.cast = ActionFlag::only(actions);
        self
    }

    /// Format used for every action without its own
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format.set_default(format.into());
        self
    }

    pub fn format_for(mut self, action: Action, format: impl Into<String>) -> Self {
        self.format.set_action(action, format.into());
        self
    }

    pub fn before(mut self, before: impl Into<DateTime<FixedOffset>>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn after(mut self, after: impl Into<DateTime<FixedOffset>>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Every configured format, default first
    fn formats(&self) -> impl Iterator<Item = &String> {
        self.format
            .default_value()
            .into_iter()
            .chain(Action::ALL.iter().filter_map(|action| self.format.get(*action)))
    }

    fn check_formats(&self) -> Result<(), ErrorCause> {
        self.formats().try_for_each(|format| check_format(format))
    }

    fn parse_text(&self, action: Action, text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        let Some(format) = self.format.get(action) else {
            return DateTime::parse_from_rfc3339(text);
        };

        DateTime::parse_from_str(text, format)
            .or_else(|_| NaiveDateTime::parse_from_str(text, format).map(utc))
            .or_else(|err| {
                NaiveDate::parse_from_str(text, format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(utc)
                    .ok_or(err)
            })
    }

    fn timestamp(&self, action: Action, pointer: &DataPointer) -> Result<DateTime<FixedOffset>, SchemaError> {
        let from_seconds = |seconds: i64| {
            Utc.timestamp_opt(seconds, 0)
                .single()
                .map(DateTime::<FixedOffset>::from)
                .ok_or_else(|| cast_failed(pointer, "datetime", "timestamp out of range"))
        };

        match (current(pointer), self.cast.enabled(action)) {
            (Data::DateTime(t), _) => Ok(*t),
            (Data::String(s), true) => self
                .parse_text(action, s)
                .map_err(|e| cast_failed(pointer, "datetime", e)),
            (Data::Int(i), true) => from_seconds(*i),
            (Data::Float(f), true) => match truncate_to_i64(*f) {
                Some(seconds) => from_seconds(seconds),
                None => Err(cast_failed(pointer, "datetime", "timestamp out of range")),
            },
            (_, true) => Err(cast_failed(pointer, "datetime", "expected text or Unix seconds")),
            (_, false) => Err(mismatch(pointer, "datetime")),
        }
    }
}

/// Reject formats chrono cannot interpret, such as unknown specifiers or a
/// trailing `%`.
fn check_format(format: &str) -> Result<(), ErrorCause> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ErrorCause::InvalidFormat {
            format: format.to_string(),
            reason: "unsupported strftime specifier".to_string(),
        });
    }
    Ok(())
}

fn render(t: &DateTime<FixedOffset>, format: &str) -> Result<String, ErrorCause> {
    let mut text = String::new();
    write!(text, "{}", t.format(format)).map_err(|_| ErrorCause::InvalidFormat {
        format: format.to_string(),
        reason: "timestamp cannot be rendered with this format".to_string(),
    })?;
    Ok(text)
}

fn utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(&naive).into()
}

impl SchemaType for DatetimeType {
    fn schema_type_id(&self) -> &str {
        "datetime"
    }

    fn process(&self, action: Action, pointer: &DataPointer) -> Result<Data, SchemaError> {
        let format = self.format.get(action);
        if let Some(format) = format {
            check_format(format).map_err(|cause| SchemaError::with_error(pointer.path(), cause))?;
        }

        let t = self.timestamp(action, pointer)?;
        check_bounds(pointer, &t, self.after.as_ref(), self.before.as_ref())?;

        Ok(match (action, format) {
            (Action::Parse, _) => Data::DateTime(t),
            (Action::Serialize, Some(format)) => Data::String(
                render(&t, format).map_err(|cause| SchemaError::with_error(pointer.path(), cause))?,
            ),
            (Action::Serialize, None) => Data::String(format_rfc3339(&t)),
        })
    }

    fn encode_body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn decode_body(&mut self, body: Value) -> serde_json::Result<()> {
        let decoded: Self = serde_json::from_value(body)?;
        decoded
            .check_formats()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        *self = decoded;
        Ok(())
    }

    fn json_schema(&self, action: Action) -> Option<Result<Value, JsonSchemaError>> {
        if action != Action::Parse {
            return Some(Err(JsonSchemaError::InvalidAction {
                action,
                schema_type: self.schema_type_id().to_string(),
            }));
        }
        if !self.cast.enabled(action) {
            return Some(Err(JsonSchemaError::NotExportable {
                schema_type: self.schema_type_id().to_string(),
                reason: "casting must be enabled for parsing".to_string(),
            }));
        }
        Some(Ok(json!({"type": "string", "format": "date-time"})))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCause;

    fn rfc3339(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    fn run(schema: &DatetimeType, action: Action, data: Data) -> Result<Data, SchemaError> {
        schema.process(action, &DataPointer::new(data, "datetime"))
    }

    #[test]
    fn test_cast_rfc3339() {
        let schema = DatetimeType::new().cast(true);
        let parsed = run(&schema, Action::Parse, "2023-03-04T05:06:07.5+02:00".into()).unwrap();
        assert_eq!(parsed, Data::DateTime(rfc3339("2023-03-04T03:06:07.5Z")));

        let serialized = run(&schema, Action::Serialize, parsed).unwrap();
        assert_eq!(serialized, Data::from("2023-03-04T05:06:07.500+02:00"));
    }

    #[test]
    fn test_cast_unix_seconds() {
        let schema = DatetimeType::new().cast(true);
        assert_eq!(
            run(&schema, Action::Parse, Data::Int(0)).unwrap(),
            Data::DateTime(rfc3339("1970-01-01T00:00:00Z"))
        );
        assert_eq!(
            run(&schema, Action::Parse, Data::Float(86400.9)).unwrap(),
            Data::DateTime(rfc3339("1970-01-02T00:00:00Z"))
        );
    }

    #[test]
    fn test_custom_format() {
        let schema = DatetimeType::new().cast(true).format("%Y-%m-%d");
        let parsed = run(&schema, Action::Parse, "2020-02-29".into()).unwrap();
        assert_eq!(parsed, Data::DateTime(rfc3339("2020-02-29T00:00:00Z")));
        assert_eq!(run(&schema, Action::Serialize, parsed).unwrap(), Data::from("2020-02-29"));

        assert!(run(&schema, Action::Parse, "29/02/2020".into()).is_err());
    }

    #[test]
    fn test_strict_requires_timestamp() {
        let err = run(&DatetimeType::new(), Action::Parse, "2020-01-01T00:00:00Z".into()).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::TypeMismatch { .. }));
    }

    #[test]
    fn test_window() {
        let schema = DatetimeType::new()
            .after(rfc3339("2020-01-01T00:00:00Z"))
            .before(rfc3339("2021-01-01T00:00:00Z"));

        assert!(run(&schema, Action::Parse, Data::DateTime(rfc3339("2020-06-01T00:00:00Z"))).is_ok());

        let err = run(&schema, Action::Parse, Data::DateTime(rfc3339("2019-06-01T00:00:00Z"))).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::BelowMinimum { .. }));

        let err = run(&schema, Action::Parse, Data::DateTime(rfc3339("2022-06-01T00:00:00Z"))).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::AboveMaximum { .. }));
    }

    #[test]
    fn test_json_schema() {
        assert!(DatetimeType::new().json_schema(Action::Parse).unwrap().is_err());
        assert!(DatetimeType::new().cast(true).json_schema(Action::Serialize).unwrap().is_err());
        assert_eq!(
            DatetimeType::new().cast(true).json_schema(Action::Parse).unwrap().unwrap(),
            json!({"type": "string", "format": "date-time"})
        );
    }

    #[test]
    fn test_unix_seconds_out_of_range() {
        let schema = DatetimeType::new().cast(true);
        let err = run(&schema, Action::Parse, Data::Float(1e30)).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::CastFailed { target: "datetime", .. }));
    }

    #[test]
    fn test_invalid_format_is_an_error() {
        let t = Data::DateTime(rfc3339("2020-02-29T00:00:00Z"));

        for format in ["%Q", "%Y-%"] {
            let schema = DatetimeType::new().format_for(Action::Serialize, format);
            let err = run(&schema, Action::Serialize, t.clone()).unwrap_err();
            assert_eq!(err.len(), 1);
            assert!(matches!(err.errors()[0].cause(), ErrorCause::InvalidFormat { .. }));
        }

        let schema = DatetimeType::new().cast(true).format("%Q");
        let err = run(&schema, Action::Parse, "2020".into()).unwrap_err();
        assert!(matches!(err.errors()[0].cause(), ErrorCause::InvalidFormat { .. }));
    }

    #[test]
    fn test_decode_rejects_invalid_format() {
        let mut decoded = DatetimeType::default();
        let err = decoded.decode_body(json!({"format": {"default": "%Q"}})).unwrap_err();
        assert!(err.to_string().contains("%Q"));

        let err = decoded
            .decode_body(json!({"format": {"actions": {"SERIALIZE": "%Y-%"}}}))
            .unwrap_err();
        assert!(err.to_string().contains("invalid format"));
        assert_eq!(decoded, DatetimeType::default());
    }

    #[test]
    fn test_body_round_trip() {
        let schema = DatetimeType::new()
            .format("%Y")
            .cast_actions([Action::Parse])
            .before(rfc3339("2021-01-01T00:00:00Z"));

        let body = schema.encode_body().unwrap();
        assert_eq!(body["format"], json!({"default": "%Y"}));
        assert_eq!(body["cast"], json!(["PARSE"]));
        assert!(body["before"].is_string());
        assert!(body.get("after").is_none());

        let mut decoded = DatetimeType::default();
        decoded.decode_body(body).unwrap();
        assert_eq!(decoded, schema);
    }
}
