use chrono::{DateTime, NaiveDateTime, Timelike};

const INFERRED_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// How timestamp strings are turned into wall-clock times.
///
/// Parsing never fails loudly: a string that does not match yields `None`.
#[derive(Debug, Clone)]
pub enum TimestampParser {
    /// A single strftime pattern.
    Exact(String),
    /// The common export formats plus RFC 3339, tried in order.
    Inferred,
}

impl TimestampParser {
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        match self {
            TimestampParser::Exact(format) => NaiveDateTime::parse_from_str(raw, format).ok(),
            TimestampParser::Inferred => INFERRED_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .or_else(|| {
                    DateTime::parse_from_rfc3339(raw)
                        .ok()
                        .map(|dt| dt.naive_local())
                }),
        }
    }
}

pub fn hour_of_day(timestamp: &NaiveDateTime) -> u32 {
    timestamp.hour()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_format_reads_telemetry_exports() {
        let parser = TimestampParser::Exact("%m/%d/%Y %H:%M".into());
        let ts = parser.parse("03/14/2019 17:05").unwrap();
        assert_eq!(hour_of_day(&ts), 17);
    }

    #[test]
    fn exact_format_accepts_unpadded_fields() {
        let parser = TimestampParser::Exact("%m/%d/%Y %H:%M".into());
        let ts = parser.parse("3/4/2019 7:05").unwrap();
        assert_eq!(hour_of_day(&ts), 7);
    }

    #[test]
    fn exact_format_rejects_other_layouts() {
        let parser = TimestampParser::Exact("%m/%d/%Y %H:%M".into());
        assert!(parser.parse("2019-03-14 17:05:00").is_none());
        assert!(parser.parse("not a time").is_none());
    }

    #[test]
    fn inferred_format_covers_iso_and_rfc3339() {
        let parser = TimestampParser::Inferred;
        assert_eq!(hour_of_day(&parser.parse("2019-03-14 17:05:00").unwrap()), 17);
        assert_eq!(hour_of_day(&parser.parse("2019-03-14 05:05:00.000").unwrap()), 5);
        assert_eq!(hour_of_day(&parser.parse("03/14/2019 23:59").unwrap()), 23);
        assert_eq!(
            hour_of_day(&parser.parse("2019-03-14T08:00:00-03:00").unwrap()),
            8
        );
        assert!(parser.parse("14th of March").is_none());
    }
}
