use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

use crate::error::{Error, Result};

/// A photo capture timestamp.
///
/// Wraps a naive (zone-less) date/time, which is what the EXIF
/// `DateTimeOriginal` field actually stores. Handles the three string
/// shapes the toolkit deals in: user input, the EXIF on-disk form
/// (`YYYY:MM:DD HH:MM:SS`), and the filename-safe stem used by the
/// renamer (`YYYY-MM-DD HH-MM` — colons are not portable in filenames).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CaptureDateTime(NaiveDateTime);

/// Input formats accepted from the command line, most specific first.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y:%m:%d %H:%M:%S",
];

/// Formats seen in EXIF entry values across parsers.
const EXIF_FORMATS: &[&str] = &[
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

impl CaptureDateTime {
    pub fn new(inner: NaiveDateTime) -> Self {
        Self(inner)
    }

    /// Parse a user-supplied date/time value.
    ///
    /// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM` (seconds default
    /// to 0), a bare `YYYY-MM-DD` (midnight), and the EXIF colon form.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        for fmt in INPUT_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
                return Ok(Self(dt));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(Self(date.and_hms_opt(0, 0, 0).unwrap()));
        }
        Err(Error::InvalidDate(input.to_string()))
    }

    /// Parse a timestamp string as read out of an EXIF entry.
    ///
    /// Entry values may carry sub-second or timezone suffixes depending on
    /// the camera and the parser; anything past the 19-character core is
    /// ignored.
    pub fn parse_exif(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let core = raw.get(..19).unwrap_or(raw);
        for fmt in EXIF_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(core, fmt) {
                return Ok(Self(dt));
            }
        }
        Err(Error::InvalidDate(raw.to_string()))
    }

    /// The EXIF on-disk representation: `YYYY:MM:DD HH:MM:SS`.
    pub fn exif_string(&self) -> String {
        self.0.format("%Y:%m:%d %H:%M:%S").to_string()
    }

    /// The filename stem used by the renamer: `YYYY-MM-DD HH-MM`.
    pub fn file_stem(&self) -> String {
        self.0.format("%Y-%m-%d %H-%M").to_string()
    }

    /// Advance the timestamp by `secs` seconds.
    ///
    /// A photo series shares a calendar day; an interval that carries the
    /// timestamp into the next day is rejected rather than silently rolled
    /// over.
    pub fn advance(&self, secs: i64) -> Result<Self> {
        let next = self.0 + Duration::seconds(secs);
        if next.date() != self.0.date() {
            return Err(Error::InvalidDate(format!(
                "interval of {secs}s carries {self} past midnight"
            )));
        }
        Ok(Self(next))
    }

    pub fn inner(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for CaptureDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parsing ──────────────────────────────────────────────────────

    #[test]
    fn parse_full_datetime() {
        let dt = CaptureDateTime::parse("2021-06-15 08:30:00").unwrap();
        assert_eq!(dt.exif_string(), "2021:06:15 08:30:00");
    }

    #[test]
    fn parse_without_seconds() {
        let dt = CaptureDateTime::parse("2021-06-15 08:30").unwrap();
        assert_eq!(dt.exif_string(), "2021:06:15 08:30:00");
    }

    #[test]
    fn parse_date_only_defaults_to_midnight() {
        let dt = CaptureDateTime::parse("2022-01-09").unwrap();
        assert_eq!(dt.exif_string(), "2022:01:09 00:00:00");
    }

    #[test]
    fn parse_exif_colon_form() {
        let dt = CaptureDateTime::parse("2020:01:01 10:00:00").unwrap();
        assert_eq!(dt.file_stem(), "2020-01-01 10-00");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            CaptureDateTime::parse("next tuesday"),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            CaptureDateTime::parse("2021-13-40 99:99:99"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn parse_exif_ignores_timezone_suffix() {
        let dt = CaptureDateTime::parse_exif("2020-01-01T10:00:00+02:00").unwrap();
        assert_eq!(dt.exif_string(), "2020:01:01 10:00:00");
    }

    // ── round-trip ───────────────────────────────────────────────────

    #[test]
    fn exif_string_round_trips() {
        let dt = CaptureDateTime::parse("2021-06-15 08:30:00").unwrap();
        let back = CaptureDateTime::parse_exif(&dt.exif_string()).unwrap();
        assert_eq!(dt, back);
    }

    // ── stems ────────────────────────────────────────────────────────

    #[test]
    fn file_stem_encodes_date_and_time() {
        let dt = CaptureDateTime::parse("2020-01-01 10:00:00").unwrap();
        assert_eq!(dt.file_stem(), "2020-01-01 10-00");
    }

    #[test]
    fn file_stem_zero_pads() {
        let dt = CaptureDateTime::parse("2020-03-05 07:08:09").unwrap();
        assert_eq!(dt.file_stem(), "2020-03-05 07-08");
    }

    // ── advance ──────────────────────────────────────────────────────

    #[test]
    fn advance_within_day() {
        let dt = CaptureDateTime::parse("2020-01-01 10:00:00").unwrap();
        let next = dt.advance(90).unwrap();
        assert_eq!(next.exif_string(), "2020:01:01 10:01:30");
    }

    #[test]
    fn advance_past_midnight_rejected() {
        let dt = CaptureDateTime::parse("2020-01-01 23:59:30").unwrap();
        assert!(matches!(dt.advance(45), Err(Error::InvalidDate(_))));
    }
}
