//! Conversion of raw option strings into typed [`Value`]s.
//!
//! Conversions are pure: the same raw values and shape always produce the
//! same result and converting one option never affects another. Parsing is
//! locale-invariant (Rust's `str::parse` never consults the locale).

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ConversionError;
use crate::schema::{ScalarKind, TargetShape, Value};

/// Converts the raw values supplied for one option.
///
/// The binder only talks to this trait, so a host can swap in a converter
/// that knows more types.
pub trait ValueConverter: Send + Sync {
    fn convert(&self, raw_values: &[String], shape: &TargetShape) -> Result<Value, ConversionError>;
}

/// Converter for every [`ScalarKind`] the framework declares.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueConverter;

impl ValueConverter for DefaultValueConverter {
    fn convert(
        &self,
        raw_values: &[String],
        shape: &TargetShape,
    ) -> Result<Value, ConversionError> {
        match shape {
            TargetShape::Flag => match raw_values.last() {
                None => Ok(Value::Bool(true)),
                Some(raw) => parse_bool(raw)
                    .map(Value::Bool)
                    .ok_or_else(|| invalid(raw, &ScalarKind::Boolean)),
            },
            TargetShape::Scalar(kind) => match raw_values.last() {
                Some(raw) => convert_scalar(raw, kind),
                None => Err(ConversionError::MissingValue {
                    target: kind.to_string(),
                }),
            },
            TargetShape::Sequence(kind) => raw_values
                .iter()
                .map(|raw| convert_scalar(raw, kind))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
        }
    }
}

/// Converts a single raw string into the given kind.
pub fn convert_scalar(raw: &str, kind: &ScalarKind) -> Result<Value, ConversionError> {
    let converted = match kind {
        ScalarKind::Text => Some(Value::Text(raw.to_string())),
        ScalarKind::Integer => raw.trim().parse::<i64>().ok().map(Value::Integer),
        ScalarKind::Float => raw.trim().parse::<f64>().ok().map(Value::Float),
        ScalarKind::Boolean => parse_bool(raw).map(Value::Bool),
        ScalarKind::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        ScalarKind::DateTime => parse_date_time(raw.trim()).map(Value::DateTime),
        ScalarKind::Duration => parse_duration(raw.trim()).map(Value::Duration),
        ScalarKind::Enum(symbols) => {
            return symbols
                .iter()
                .find(|symbol| symbol.eq_ignore_ascii_case(raw.trim()))
                .map(|symbol| Value::Enum(symbol.clone()))
                .ok_or_else(|| ConversionError::UnknownSymbol {
                    value: raw.to_string(),
                    allowed: symbols.clone(),
                });
        }
    };

    converted.ok_or_else(|| invalid(raw, kind))
}

fn invalid(raw: &str, kind: &ScalarKind) -> ConversionError {
    ConversionError::InvalidValue {
        value: raw.to_string(),
        target: kind.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parses `[d.]hh:mm:ss[.fraction]`.
fn parse_duration(raw: &str) -> Option<Duration> {
    let mut parts = raw.split(':');
    let (hours_part, minutes_part, seconds_part) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let (days, hours) = match hours_part.split_once('.') {
        Some((days, hours)) => (parse_digits(days)?, parse_digits(hours)?),
        None => (0, parse_digits(hours_part)?),
    };
    let minutes = parse_digits(minutes_part)?;
    let (seconds, nanos) = match seconds_part.split_once('.') {
        Some((whole, fraction)) => (parse_digits(whole)?, parse_fraction(fraction)?),
        None => (parse_digits(seconds_part)?, 0),
    };

    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let total = days
        .checked_mul(86_400)?
        .checked_add(hours * 3_600 + minutes * 60 + seconds)?;
    Some(Duration::new(total, nanos))
}

fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_fraction(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 9 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{text:0<9}");
    padded.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn convert(values: &[&str], shape: TargetShape) -> Result<Value, ConversionError> {
        DefaultValueConverter.convert(&raw(values), &shape)
    }

    #[test]
    fn flag_without_values_is_true() {
        assert_eq!(convert(&[], TargetShape::Flag), Ok(Value::Bool(true)));
    }

    #[test]
    fn flag_accepts_boolean_literals_only() {
        assert_eq!(convert(&["FALSE"], TargetShape::Flag), Ok(Value::Bool(false)));
        assert_eq!(convert(&["true"], TargetShape::Flag), Ok(Value::Bool(true)));
        assert!(matches!(
            convert(&["yes"], TargetShape::Flag),
            Err(ConversionError::InvalidValue { .. })
        ));
    }

    #[test]
    fn scalar_takes_last_value() {
        assert_eq!(
            convert(&["1", "2", "3"], TargetShape::Scalar(ScalarKind::Integer)),
            Ok(Value::Integer(3))
        );
    }

    #[test]
    fn scalar_without_value_is_an_error() {
        assert_eq!(
            convert(&[], TargetShape::Scalar(ScalarKind::Text)),
            Err(ConversionError::MissingValue {
                target: "text".to_string()
            })
        );
    }

    #[test]
    fn unparsable_integer_names_value_and_type() {
        let error = convert(&["twelve"], TargetShape::Scalar(ScalarKind::Integer)).unwrap_err();
        assert_eq!(error.to_string(), "Can't convert value 'twelve' to integer");
    }

    #[test]
    fn floats_and_chars() {
        assert_eq!(
            convert(&["2.5"], TargetShape::Scalar(ScalarKind::Float)),
            Ok(Value::Float(2.5))
        );
        assert_eq!(
            convert(&["x"], TargetShape::Scalar(ScalarKind::Char)),
            Ok(Value::Char('x'))
        );
        assert!(convert(&["xy"], TargetShape::Scalar(ScalarKind::Char)).is_err());
    }

    #[test]
    fn enum_matches_case_insensitively_and_keeps_declared_spelling() {
        let kind = ScalarKind::symbols(["Red", "Green"]);
        assert_eq!(
            convert(&["green"], TargetShape::Scalar(kind.clone())),
            Ok(Value::Enum("Green".to_string()))
        );
        assert_eq!(
            convert(&["blue"], TargetShape::Scalar(kind)),
            Err(ConversionError::UnknownSymbol {
                value: "blue".to_string(),
                allowed: vec!["Red".to_string(), "Green".to_string()],
            })
        );
    }

    #[test]
    fn sequence_preserves_order_and_allows_empty() {
        assert_eq!(
            convert(&["3", "1", "2"], TargetShape::Sequence(ScalarKind::Integer)),
            Ok(Value::List(vec![Value::Integer(3), Value::Integer(1), Value::Integer(2)]))
        );
        assert_eq!(
            convert(&[], TargetShape::Sequence(ScalarKind::Text)),
            Ok(Value::List(Vec::new()))
        );
    }

    #[test]
    fn sequence_fails_on_any_bad_element() {
        assert!(convert(&["1", "x"], TargetShape::Sequence(ScalarKind::Integer)).is_err());
    }

    #[test]
    fn date_times_in_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 8, 24)
            .and_then(|d| d.and_hms_opt(13, 5, 0))
            .unwrap();
        for text in ["2019-08-24 13:05:00", "2019-08-24T13:05:00", "2019-08-24T13:05:00+02:00"] {
            assert_eq!(
                convert(&[text], TargetShape::Scalar(ScalarKind::DateTime)),
                Ok(Value::DateTime(expected)),
                "{text}"
            );
        }
        match convert(&["2019-08-24"], TargetShape::Scalar(ScalarKind::DateTime)) {
            Ok(Value::DateTime(value)) => assert_eq!(value.hour(), 0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("01:02:03"), Some(Duration::from_secs(3723)));
        assert_eq!(parse_duration("1.00:00:01"), Some(Duration::from_secs(86_401)));
        assert_eq!(parse_duration("00:00:01.5"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("25:00:00"), None);
        assert_eq!(parse_duration("1:2"), None);
        assert_eq!(parse_duration("aa:bb:cc"), None);
    }
}
