//! Filename pattern matching and date extraction.
//!
//! A user supplied regular expression is compiled once per run. Each entry
//! name is matched against it and three capture groups, selected by 1-based
//! index, are decoded as the year, month and day of the target directory.
//!
//! # Examples
//!
//! ```
//! use datesort::pattern::{GroupIndices, Matcher, PatternMatcher};
//!
//! let matcher = Matcher::Enabled(PatternMatcher::compile(r"(\d{4})-(\d{2})-(\d{2})").unwrap());
//! let date = matcher.date_of("IMG_2021-07-04.jpg", &GroupIndices::new(1, 2, 3));
//! assert_eq!(date.map(|d| d.dir_name()), Some("2021_07_04".to_string()));
//! ```

use crate::config::ConfigError;
use regex::Regex;
use tracing::error;

/// A compiled filename pattern.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Compiles `pattern`, failing with `ConfigError::InvalidPattern` when it is
    /// not a valid regular expression.
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
        Ok(Self { regex })
    }

    /// The pattern text this matcher was compiled from.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Matches `name` and returns every capture group in order, index 0 being
    /// the whole match. Groups that did not take part in the match are `None`.
    ///
    /// Returns an empty vector when the name does not match at all.
    pub fn captures<'h>(&self, name: &'h str) -> Vec<Option<&'h str>> {
        match self.regex.captures(name) {
            Some(caps) => caps.iter().map(|m| m.map(|m| m.as_str())).collect(),
            None => Vec::new(),
        }
    }
}

/// Whether filename matching is active for a run.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// No pattern was given: every entry is reported as unmatched.
    Disabled,
    /// Entries are matched against the compiled pattern.
    Enabled(PatternMatcher),
}

impl Matcher {
    /// Builds a matcher from optional pattern text. Empty text disables matching.
    pub fn from_pattern(pattern: Option<&str>) -> Result<Self, ConfigError> {
        match pattern {
            Some(text) if !text.is_empty() => PatternMatcher::compile(text).map(Self::Enabled),
            _ => Ok(Self::Disabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Matches `name` and decodes a valid date from it, if any.
    pub fn date_of(&self, name: &str, groups: &GroupIndices) -> Option<DateParts> {
        match self {
            Self::Disabled => None,
            Self::Enabled(pattern) => {
                let captures = pattern.captures(name);
                extract_date(&captures, groups, pattern.as_str())?.validate()
            }
        }
    }
}

/// 1-based capture group positions of the date fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupIndices {
    pub year: usize,
    pub month: usize,
    pub day: usize,
}

impl GroupIndices {
    pub fn new(year: usize, month: usize, day: usize) -> Self {
        Self { year, month, day }
    }

    /// True when every index selects a real group of a capture list of length `len`.
    fn fit(&self, len: usize) -> bool {
        [self.year, self.month, self.day]
            .iter()
            .all(|&index| 0 < index && index < len)
    }
}

/// The raw result of decoding the three selected capture groups.
///
/// A field is `None` when its capture did not parse as a base-10 integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateMatch {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
}

impl DateMatch {
    /// Returns the date when all three fields are present and strictly positive.
    ///
    /// No calendar check is made: month 13 or day 40 are accepted as is.
    pub fn validate(self) -> Option<DateParts> {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) if year > 0 && month > 0 && day > 0 => {
                Some(DateParts { year, month, day })
            }
            _ => None,
        }
    }
}

/// A validated date, every field strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i64,
    pub month: i64,
    pub day: i64,
}

impl DateParts {
    /// Formats the date as `YYYY_MM_DD`. Wider values overflow the padding
    /// rather than being truncated.
    pub fn dir_name(&self) -> String {
        format!("{:04}_{:02}_{:02}", self.year, self.month, self.day)
    }
}

/// Decodes the year, month and day captures selected by `groups`.
///
/// Returns `None` without logging when any index falls outside the capture
/// list (which includes the no-match case, where the list is empty). A capture
/// that does not parse as an integer is logged and left as `None`.
pub fn extract_date(
    captures: &[Option<&str>],
    groups: &GroupIndices,
    pattern: &str,
) -> Option<DateMatch> {
    if !groups.fit(captures.len()) {
        return None;
    }

    Some(DateMatch {
        year: parse_field(captures[groups.year], "year", pattern),
        month: parse_field(captures[groups.month], "month", pattern),
        day: parse_field(captures[groups.day], "day", pattern),
    })
}

fn parse_field(capture: Option<&str>, field: &str, pattern: &str) -> Option<i64> {
    let text = capture.unwrap_or_default();
    match text.parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => {
            error!(field, capture = text, regexp = pattern, error = %e, "error parsing {field}: invalid regexp?");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd() -> GroupIndices {
        GroupIndices::new(1, 2, 3)
    }

    fn enabled(pattern: &str) -> Matcher {
        Matcher::Enabled(PatternMatcher::compile(pattern).unwrap())
    }

    #[test]
    fn test_compile_rejects_invalid_pattern() {
        let result = PatternMatcher::compile("([0-9]");
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_captures_include_whole_match() {
        let pattern = PatternMatcher::compile(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
        let captures = pattern.captures("IMG_2021-07-04_party.jpg");
        assert_eq!(
            captures,
            vec![Some("2021-07-04"), Some("2021"), Some("07"), Some("04")]
        );
    }

    #[test]
    fn test_captures_empty_on_no_match() {
        let pattern = PatternMatcher::compile(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
        assert!(pattern.captures("random.txt").is_empty());
    }

    #[test]
    fn test_empty_pattern_disables_matching() {
        assert!(!Matcher::from_pattern(Some("")).unwrap().is_enabled());
        assert!(!Matcher::from_pattern(None).unwrap().is_enabled());
        assert!(Matcher::from_pattern(Some("x")).unwrap().is_enabled());
    }

    #[test]
    fn test_disabled_matcher_never_matches() {
        assert_eq!(Matcher::Disabled.date_of("2021-07-04.jpg", &ymd()), None);
    }

    #[test]
    fn test_date_of_zero_pads_fields() {
        let matcher = enabled(r"(\d+)\.(\d+)\.(\d+)");
        let date = matcher.date_of("scan_21.7.4.png", &ymd()).unwrap();
        assert_eq!(date.dir_name(), "0021_07_04");
    }

    #[test]
    fn test_date_of_reordered_groups() {
        let matcher = enabled(r"(\d{2})(\d{2})(\d{4})");
        let date = matcher
            .date_of("DSC_04072021.jpg", &GroupIndices::new(3, 2, 1))
            .unwrap();
        assert_eq!(date.dir_name(), "2021_07_04");
    }

    #[test]
    fn test_wide_year_is_not_truncated() {
        let date = DateParts {
            year: 12021,
            month: 7,
            day: 4,
        };
        assert_eq!(date.dir_name(), "12021_07_04");
    }

    #[test]
    fn test_no_calendar_validation() {
        let matcher = enabled(r"(\d{4})-(\d{2})-(\d{2})");
        let date = matcher.date_of("2021-13-45.jpg", &ymd()).unwrap();
        assert_eq!(date.dir_name(), "2021_13_45");
    }

    #[test]
    fn test_zero_field_is_no_match() {
        let matcher = enabled(r"(\d{4})-(\d{2})-(\d{2})");
        assert_eq!(matcher.date_of("2021-00-04.jpg", &ymd()), None);
    }

    #[test]
    fn test_negative_field_is_no_match() {
        let matcher = enabled(r"(-?\d+)_(\d+)_(\d+)");
        assert_eq!(matcher.date_of("-2021_07_04", &ymd()), None);
    }

    #[test]
    fn test_out_of_range_index_is_no_match() {
        let captures = vec![Some("2021-07"), Some("2021"), Some("07")];
        assert_eq!(extract_date(&captures, &ymd(), "p"), None);
        assert_eq!(
            extract_date(&captures, &GroupIndices::new(0, 1, 2), "p"),
            None
        );
    }

    #[test]
    fn test_default_indices_disable_matching() {
        let matcher = enabled(r"(\d{4})-(\d{2})-(\d{2})");
        assert_eq!(matcher.date_of("2021-07-04.jpg", &GroupIndices::default()), None);
    }

    #[test]
    fn test_non_numeric_capture_leaves_field_empty() {
        let captures = vec![Some("2021-Jul-04"), Some("2021"), Some("Jul"), Some("04")];
        let date = extract_date(&captures, &ymd(), "p").unwrap();
        assert_eq!(date.year, Some(2021));
        assert_eq!(date.month, None);
        assert_eq!(date.day, Some(4));
        assert_eq!(date.validate(), None);
    }

    #[test]
    fn test_non_participating_group_is_empty() {
        let matcher = enabled(r"(\d{4})-(\d{2})(?:-(\d{2}))?");
        assert_eq!(matcher.date_of("2021-07.jpg", &ymd()), None);
    }
}
