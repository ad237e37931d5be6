//! Comparable values extracted from cell content.
//!
//! Cell content is host markup. Rules compare against its plain text, plus a
//! number and a timestamp derived from that text when they parse.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

/// Tags that separate words when stripped.
const BLOCK_TAGS: &[&[u8]] = &[
    b"br", b"p", b"div", b"li", b"tr", b"td", b"th", b"h1", b"h2", b"h3", b"h4", b"h5", b"h6",
];

/// Currency symbols, percent signs and grouping separators.
#[allow(clippy::expect_used)]
static NUMBER_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,$€£¥₹₩%'_]").expect("valid number noise pattern"));

#[allow(clippy::expect_used)]
static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float pattern")
});

#[allow(clippy::expect_used)]
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y",
];

/// Strip markup, collapse whitespace and trim.
///
/// Markup that is not well-formed falls back to removing anything that looks
/// like a tag.
pub fn extract_text(raw: &str) -> String {
    if !raw.contains('<') && !raw.contains('&') {
        return collapse_whitespace(raw);
    }
    // HTML-only entity that the XML reader rejects
    let prepared = raw.replace("&nbsp;", " ");
    let parsed = if has_stray_angle_bracket(&prepared) {
        None
    } else {
        strip_markup(&prepared)
    };
    match parsed {
        Some(text) => collapse_whitespace(&text),
        None => collapse_whitespace(&TAG.replace_all(&prepared, " ")),
    }
}

fn strip_markup(markup: &str) -> Option<String> {
    let mut reader = Reader::from_str(markup);
    reader.check_end_names(false);
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(t) => text.push_str(&t),
                Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
            },
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if BLOCK_TAGS.contains(&e.local_name().as_ref()) {
                    text.push(' ');
                }
            }
            Ok(Event::End(e)) => {
                if BLOCK_TAGS.contains(&e.local_name().as_ref()) {
                    text.push(' ');
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::trace!("markup not well-formed ({e}), stripping tags instead");
                return None;
            }
            _ => {}
        }
    }
    Some(text)
}

/// `<` not opening a tag, comment or declaration (e.g. `"1 < 2"`).
fn has_stray_angle_bracket(s: &str) -> bool {
    s.match_indices('<').any(|(i, _)| {
        !s.get(i + 1..)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a number after removing currency symbols, `%` and grouping separators.
///
/// Like a float prefix parse: `"12px"` yields 12. Returns `None` when no
/// leading number exists or the value is not finite.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = NUMBER_NOISE.replace_all(text, "");
    let m = LEADING_FLOAT.find(&cleaned)?;
    m.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a date or timestamp to milliseconds since the Unix epoch (UTC).
///
/// Accepts RFC 3339, ISO-like `YYYY-MM-DD[ HH:MM[:SS]]`, `YYYY/MM/DD`,
/// `MM/DD/YYYY` and written month forms. Date-only inputs are midnight UTC.
pub fn parse_date_ms(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

/// Calendar day (UTC) of a millisecond timestamp.
pub fn calendar_day(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

/// Text plus derived number and timestamp for one cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellValue {
    pub text: String,
    pub num: Option<f64>,
    pub date_ms: Option<i64>,
}

impl CellValue {
    pub fn from_text(text: String) -> Self {
        let num = parse_number(&text);
        let date_ms = parse_date_ms(&text);
        Self { text, num, date_ms }
    }
}

/// Caller-owned memo of extracted text keyed by raw content.
///
/// Clearing it never changes results. Not shareable across threads; give
/// each evaluation thread its own cache.
#[derive(Debug, Default)]
pub struct TextCache {
    entries: RefCell<HashMap<String, String>>,
}

impl TextCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_extract(&self, raw: &str) -> String {
        if let Some(hit) = self.entries.borrow().get(raw) {
            return hit.clone();
        }
        let text = extract_text(raw);
        self.entries
            .borrow_mut()
            .insert(raw.to_string(), text.clone());
        text
    }

    /// Comparable value for raw content.
    pub fn value_of(&self, raw: &str) -> CellValue {
        CellValue::from_text(self.get_or_extract(raw))
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
