//! Shared text helpers for both directions
//!
//! - Export: date patterns and the numeric-text heuristic that decides
//!   whether a rendered value is stored as a number or as text
//! - Import: the textual form of a cell read back from a sheet

use crate::error::{SheetError, SheetResult};
use calamine::Data;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

/// Pattern that marks rendered text as numeric: digits with an optional fraction
const NUMERIC_TEXT: &str = r"^[0-9]+(\.[0-9]+)?$";

fn numeric_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NUMERIC_TEXT).ok()).as_ref()
}

/// True when `text` is one or more digits, optionally followed by `.` and more digits.
///
/// Signs, exponents and surrounding whitespace all disqualify the text.
pub fn is_numeric_text(text: &str) -> bool {
    numeric_pattern().is_some_and(|re| re.is_match(text))
}

/// What an exported cell ends up holding
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Number(f64),
    Text(String),
}

/// Store numeric-looking text as a number, everything else as text
pub fn classify(text: String) -> CellContent {
    if is_numeric_text(&text) {
        if let Ok(n) = text.parse::<f64>() {
            return CellContent::Number(n);
        }
    }
    CellContent::Text(text)
}

/// Text of a number cell: integral values keep a trailing `.0`
pub fn number_text(n: f64) -> String {
    format!("{:?}", n)
}

/// Text form of a cell read from a sheet; blank cells give an empty string
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => number_text(*f),
        Data::Int(i) => number_text(*i as f64),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Date format used when exporting date fields.
///
/// Accepts `SimpleDateFormat`-style letters (`yyyy-MM-dd HH:mm`) or, when
/// the pattern contains `%`, a chrono strftime string as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct DatePattern {
    source: String,
    strftime: String,
}

impl DatePattern {
    pub fn new(pattern: &str) -> SheetResult<Self> {
        let strftime = if pattern.contains('%') {
            pattern.to_string()
        } else {
            translate_letters(pattern)?
        };

        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(SheetError::Pattern(format!(
                "'{}' is not a valid format",
                pattern
            )));
        }

        // Offset and zone specifiers parse but cannot be rendered without a zone
        let mut trial = String::new();
        if write!(trial, "{}", NaiveDateTime::default().format(&strftime)).is_err() {
            return Err(SheetError::Pattern(format!(
                "'{}' needs a time zone, date fields have none",
                pattern
            )));
        }

        Ok(Self {
            source: pattern.to_string(),
            strftime,
        })
    }

    /// `yyyy-MM-dd`
    pub fn iso_date() -> Self {
        Self {
            source: "yyyy-MM-dd".to_string(),
            strftime: "%Y-%m-%d".to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Render `value`; falls back to chrono's ISO text if the pattern cannot be rendered
    pub fn format(&self, value: &NaiveDateTime) -> String {
        let mut out = String::new();
        match write!(out, "{}", value.format(&self.strftime)) {
            Ok(()) => out,
            Err(_) => value.to_string(),
        }
    }
}

impl Default for DatePattern {
    fn default() -> Self {
        Self::iso_date()
    }
}

/// Translate pattern letters into strftime specifiers
fn translate_letters(pattern: &str) -> SheetResult<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is a literal quote, otherwise quote until the closing '
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                out.push(chars[i]);
                i += 1;
            }
            if i >= chars.len() {
                return Err(SheetError::Pattern(format!(
                    "unterminated quote in '{}'",
                    pattern
                )));
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let spec = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('a', _) => "%p",
            _ => {
                return Err(SheetError::Pattern(format!(
                    "unsupported pattern letter '{}' in '{}'",
                    c, pattern
                )))
            }
        };
        out.push_str(spec);
        i += run;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use chrono::NaiveDate;

    fn moment() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_milli_opt(14, 5, 9, 42)
            .unwrap()
    }

    #[test]
    fn test_numeric_text_heuristic() {
        for text in ["123", "4.50", "0", "007"] {
            assert!(is_numeric_text(text), "{} should be numeric", text);
        }
        for text in ["12a", "-5", "", "1.", ".5", "1e5", " 1", "١٢"] {
            assert!(!is_numeric_text(text), "{} should be text", text);
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("7.5".into()), CellContent::Number(7.5));
        assert_eq!(classify("00042".into()), CellContent::Number(42.0));
        assert_eq!(classify("A".into()), CellContent::Text("A".into()));
        assert_eq!(classify(String::new()), CellContent::Text(String::new()));
    }

    #[test]
    fn test_number_text_keeps_fraction() {
        assert_eq!(number_text(1.0), "1.0");
        assert_eq!(number_text(7.5), "7.5");
        assert_eq!(number_text(-3.0), "-3.0");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("abc".into())), "abc");
        assert_eq!(cell_text(&Data::Float(2.0)), "2.0");
        assert_eq!(cell_text(&Data::Int(5)), "5.0");
        assert_eq!(cell_text(&Data::Bool(false)), "false");
        assert_eq!(cell_text(&Data::Error(CellErrorType::Div0)), "#DIV/0!");
    }

    #[test]
    fn test_pattern_letters() {
        let cases = [
            ("yyyy-MM-dd", "2024-03-07"),
            ("yyyy-MM-dd HH:mm", "2024-03-07 14:05"),
            ("dd/MM/yy", "07/03/24"),
            ("yyyy-MM-dd'T'HH:mm:ss.SSS", "2024-03-07T14:05:09.042"),
            ("h:mm a", "2:05 PM"),
            ("d MMM yyyy", "7 Mar 2024"),
            ("'at' H 'o''clock'", "at 14 o'clock"),
        ];
        for (pattern, expected) in cases {
            let p = DatePattern::new(pattern).unwrap();
            assert_eq!(p.format(&moment()), expected, "pattern {}", pattern);
        }
    }

    #[test]
    fn test_strftime_passthrough() {
        let p = DatePattern::new("%d.%m.%Y").unwrap();
        assert_eq!(p.format(&moment()), "07.03.2024");
        assert_eq!(p.as_str(), "%d.%m.%Y");
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            DatePattern::new("yyyy-QQ"),
            Err(SheetError::Pattern(_))
        ));
        assert!(matches!(
            DatePattern::new("yyyy 'open"),
            Err(SheetError::Pattern(_))
        ));
        assert!(matches!(DatePattern::new("%Q"), Err(SheetError::Pattern(_))));
    }

    #[test]
    fn test_zone_specifiers_are_rejected() {
        for pattern in ["%Y %z", "%Y-%m-%d %:z", "%H:%M %Z"] {
            assert!(
                matches!(DatePattern::new(pattern), Err(SheetError::Pattern(_))),
                "{} should be rejected",
                pattern
            );
        }
    }

    #[test]
    fn test_format_never_panics_on_unrenderable_pattern() {
        let p = DatePattern {
            source: "%Y %z".to_string(),
            strftime: "%Y %z".to_string(),
        };
        assert_eq!(p.format(&moment()), moment().to_string());
    }

    #[test]
    fn test_literal_percent_in_letters() {
        // A literal % switches to strftime mode, so it must be written as %%
        let p = DatePattern::new("%Y%%").unwrap();
        assert_eq!(p.format(&moment()), "2024%");
    }
}
