//! Lenient date (de)serialization for backend payloads
//!
//! The backend is inconsistent about dates: plain `2025-03-14`, full
//! timestamps `2025-03-14T09:30:00.000+00:00`, or `null`. Only the calendar
//! date is kept; outgoing dates are always `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

const WIRE_FORMAT: &str = "%Y-%m-%d";

/// Parse the calendar date out of a date or timestamp string
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, WIRE_FORMAT).ok()
}

pub mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(WIRE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_date("2025-03-14"), Some(expected));
        assert_eq!(parse_date("2025-03-14T09:30:00.000+00:00"), Some(expected));
        assert_eq!(parse_date("14/03/2025"), None);
        assert_eq!(parse_date(""), None);
    }
}
