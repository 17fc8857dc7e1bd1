//! Date display formatting
//!
//! `transform(value, format, timezone)` maps a raw date value to a display
//! string, en-US style (`Jan 1, 2020`). Two aliases are used across the
//! credential views: `effectiveDate` (same as `mediumDate`) and
//! `effectiveDateTime` (`MMM d, y, h:mm a`).
//!
//! Timezone resolution: explicit argument, then the configured display
//! timezone, then the platform zone. A bare `YYYY-MM-DD` value is always
//! rendered in UTC so the calendar day never shifts.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

use super::config::AppConfig;

pub const EFFECTIVE_DATE: &str = "effectiveDate";
pub const EFFECTIVE_DATE_TIME: &str = "effectiveDateTime";

const DEFAULT_FORMAT: &str = "mediumDate";
const EFFECTIVE_DATE_TIME_PATTERN: &str = "MMM d, y, h:mm a";

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const WEEKDAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateFormatError {
    #[error("unable to parse date value '{0}'")]
    InvalidValue(String),
    #[error("unknown timezone '{0}'")]
    InvalidTimezone(String),
    #[error("unsupported format token '{0}'")]
    InvalidToken(String),
    #[error("unterminated literal in format '{0}'")]
    UnterminatedLiteral(String),
}

// ============================================================================
// Zones
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayZone {
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
    /// Local zone of the host, offset looked up per instant
    Host,
}

impl DisplayZone {
    /// `UTC`/`GMT`/`Z`, `+HHMM`, `+HH:MM` or an IANA zone name
    pub fn parse(value: &str) -> Result<Self, DateFormatError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("gmt") || value == "Z" {
            return Ok(DisplayZone::Utc);
        }
        if let Some(offset) = parse_offset(value) {
            return Ok(DisplayZone::Fixed(offset));
        }
        value
            .parse::<Tz>()
            .map(DisplayZone::Named)
            .map_err(|_| DateFormatError::InvalidTimezone(value.to_string()))
    }

    /// Zone of the host: the browser's local zone, UTC off-wasm.
    pub fn host() -> Self {
        DisplayZone::Host
    }

    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        let offset = match self {
            DisplayZone::Utc => Utc.fix(),
            DisplayZone::Fixed(offset) => *offset,
            DisplayZone::Named(tz) => instant.with_timezone(tz).offset().fix(),
            DisplayZone::Host => host_offset(instant),
        };
        instant.with_timezone(&offset)
    }
}

/// Browser offset at `instant`, so DST is applied per date.
#[cfg(target_arch = "wasm32")]
fn host_offset(instant: DateTime<Utc>) -> FixedOffset {
    let millis = wasm_bindgen::JsValue::from_f64(instant.timestamp_millis() as f64);
    // getTimezoneOffset() is in minutes west of UTC
    let minutes = js_sys::Date::new(&millis).get_timezone_offset() as i32;
    FixedOffset::west_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
}

#[cfg(not(target_arch = "wasm32"))]
fn host_offset(_instant: DateTime<Utc>) -> FixedOffset {
    Utc.fix()
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value.as_bytes()[1..]),
        b'-' => (-1, &value.as_bytes()[1..]),
        _ => return None,
    };
    // HHMM or HH:MM, nothing else
    let digits: [u8; 4] = match rest {
        [h1, h2, m1, m2] => [*h1, *h2, *m1, *m2],
        [h1, h2, b':', m1, m2] => [*h1, *h2, *m1, *m2],
        _ => return None,
    };
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let number = |hi: u8, lo: u8| i32::from(hi - b'0') * 10 + i32::from(lo - b'0');
    let hours = number(digits[0], digits[1]);
    let minutes = number(digits[2], digits[3]);
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// ============================================================================
// Values
// ============================================================================

/// `YYYY-MM-DD` exactly, no time component
pub fn is_calendar_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn parse_value(value: &str) -> Result<DateTime<Utc>, DateFormatError> {
    let invalid = || DateFormatError::InvalidValue(value.to_string());
    let value = value.trim();

    if is_calendar_date(value) {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        return Ok(Utc.from_utc_datetime(&midnight));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    // timestamps without offset are taken as UTC
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        let millis: i64 = value.parse().map_err(|_| invalid())?;
        return Utc.timestamp_millis_opt(millis).single().ok_or_else(invalid);
    }
    Err(invalid())
}

// ============================================================================
// Patterns
// ============================================================================

fn resolve_format(format: Option<&str>) -> &str {
    match format.filter(|f| !f.is_empty()) {
        None => DEFAULT_FORMAT,
        Some(EFFECTIVE_DATE) => DEFAULT_FORMAT,
        Some(EFFECTIVE_DATE_TIME) => EFFECTIVE_DATE_TIME_PATTERN,
        Some(other) => other,
    }
}

/// en-US named formats
fn named_pattern(name: &str) -> Option<&'static str> {
    let pattern = match name {
        "short" => "M/d/yy, h:mm a",
        "medium" => "MMM d, y, h:mm:ss a",
        "long" => "MMMM d, y, h:mm:ss a z",
        "full" => "EEEE, MMMM d, y, h:mm:ss a zzzz",
        "shortDate" => "M/d/yy",
        "mediumDate" => "MMM d, y",
        "longDate" => "MMMM d, y",
        "fullDate" => "EEEE, MMMM d, y",
        "shortTime" => "h:mm a",
        "mediumTime" => "h:mm:ss a",
        "longTime" => "h:mm:ss a z",
        "fullTime" => "h:mm:ss a zzzz",
        _ => return None,
    };
    Some(pattern)
}

#[derive(Debug, PartialEq)]
enum Part {
    Literal(String),
    Field(char, usize),
}

fn tokenize(pattern: &str) -> Result<Vec<Part>, DateFormatError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut parts = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            // '' is an escaped quote, 'text' a literal run
            if chars.get(i + 1) == Some(&'\'') {
                parts.push(Part::Literal("'".to_string()));
                i += 2;
                continue;
            }
            let mut text = String::new();
            let mut j = i + 1;
            loop {
                match (chars.get(j), chars.get(j + 1)) {
                    (None, _) => {
                        return Err(DateFormatError::UnterminatedLiteral(pattern.to_string()))
                    }
                    (Some('\''), Some('\'')) => {
                        text.push('\'');
                        j += 2;
                    }
                    (Some('\''), _) => break,
                    (Some(&ch), _) => {
                        text.push(ch);
                        j += 1;
                    }
                }
            }
            parts.push(Part::Literal(text));
            i = j + 1;
        } else if c.is_ascii_alphabetic() {
            let run = chars[i..].iter().take_while(|&&ch| ch == c).count();
            parts.push(Part::Field(c, run));
            i += run;
        } else {
            parts.push(Part::Literal(c.to_string()));
            i += 1;
        }
    }
    Ok(parts)
}

fn pad(value: u32, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

fn offset_parts(dt: &DateTime<FixedOffset>) -> (char, u32, u32) {
    let seconds = dt.offset().local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    (sign, abs / 3600, (abs % 3600) / 60)
}

fn render_field(symbol: char, width: usize, dt: &DateTime<FixedOffset>) -> Result<String, DateFormatError> {
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };
    let out = match (symbol, width) {
        ('y', 1) => dt.year().to_string(),
        ('y', 2) => pad(dt.year().rem_euclid(100) as u32, 2),
        ('y', w) => format!("{:0w$}", dt.year(), w = w),
        ('M', 1) => dt.month().to_string(),
        ('M', 2) => pad(dt.month(), 2),
        ('M', 3) => MONTHS[dt.month0() as usize][..3].to_string(),
        ('M', 4) => MONTHS[dt.month0() as usize].to_string(),
        ('M', 5) => MONTHS[dt.month0() as usize][..1].to_string(),
        ('d', 1) => dt.day().to_string(),
        ('d', 2) => pad(dt.day(), 2),
        ('E', 1..=3) => {
            WEEKDAYS[dt.weekday().num_days_from_sunday() as usize][..3].to_string()
        }
        ('E', 4) => WEEKDAYS[dt.weekday().num_days_from_sunday() as usize].to_string(),
        ('E', 5) => WEEKDAYS[dt.weekday().num_days_from_sunday() as usize][..1].to_string(),
        ('h', 1) => hour12.to_string(),
        ('h', 2) => pad(hour12, 2),
        ('H', 1) => dt.hour().to_string(),
        ('H', 2) => pad(dt.hour(), 2),
        ('m', 1) => dt.minute().to_string(),
        ('m', 2) => pad(dt.minute(), 2),
        ('s', 1) => dt.second().to_string(),
        ('s', 2) => pad(dt.second(), 2),
        ('S', 1..=9) => pad(dt.nanosecond() % 1_000_000_000, 9)[..width].to_string(),
        ('a', 1..=4) => (if dt.hour() < 12 { "AM" } else { "PM" }).to_string(),
        ('Z', 1..=3) => {
            let (sign, h, m) = offset_parts(dt);
            format!("{}{}{}", sign, pad(h, 2), pad(m, 2))
        }
        ('Z', 4) | ('z', 4) => {
            let (sign, h, m) = offset_parts(dt);
            format!("GMT{}{}:{}", sign, pad(h, 2), pad(m, 2))
        }
        ('Z', 5) => {
            let (sign, h, m) = offset_parts(dt);
            if h == 0 && m == 0 {
                "Z".to_string()
            } else {
                format!("{}{}:{}", sign, pad(h, 2), pad(m, 2))
            }
        }
        ('z', 1..=3) => {
            let (sign, h, m) = offset_parts(dt);
            if m == 0 {
                format!("GMT{}{}", sign, h)
            } else {
                format!("GMT{}{}:{}", sign, h, pad(m, 2))
            }
        }
        _ => return Err(DateFormatError::InvalidToken(symbol.to_string().repeat(width))),
    };
    Ok(out)
}

fn render(pattern: &str, dt: &DateTime<FixedOffset>) -> Result<String, DateFormatError> {
    let mut out = String::new();
    for part in tokenize(pattern)? {
        match part {
            Part::Literal(text) => out.push_str(&text),
            Part::Field(symbol, width) => out.push_str(&render_field(symbol, width, dt)?),
        }
    }
    Ok(out)
}

// ============================================================================
// Formatter
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DateFormatter {
    display_timezone: Option<String>,
    platform_zone: DisplayZone,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DateFormatter {
    pub fn new(display_timezone: Option<String>) -> Self {
        Self {
            display_timezone: display_timezone.filter(|s| !s.is_empty()),
            platform_zone: DisplayZone::host(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.display_timezone().map(str::to_string))
    }

    pub fn with_platform_zone(mut self, zone: DisplayZone) -> Self {
        self.platform_zone = zone;
        self
    }

    fn resolve_zone(&self, timezone: Option<&str>) -> Result<DisplayZone, DateFormatError> {
        match timezone
            .filter(|s| !s.is_empty())
            .or(self.display_timezone.as_deref())
        {
            Some(name) => DisplayZone::parse(name),
            None => Ok(self.platform_zone),
        }
    }

    /// Formats `value`; a missing or empty value is handed back unchanged.
    pub fn transform(
        &self,
        value: Option<&str>,
        format: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<Option<String>, DateFormatError> {
        let raw = match value {
            Some(v) if !v.is_empty() => v,
            other => return Ok(other.map(str::to_string)),
        };
        let format = resolve_format(format);
        let pattern = named_pattern(format).unwrap_or(format);
        let zone = if is_calendar_date(raw.trim()) {
            DisplayZone::Utc
        } else {
            self.resolve_zone(timezone)?
        };
        let instant = parse_value(raw)?;
        render(pattern, &zone.localize(instant)).map(Some)
    }

    /// For templates: the formatted value, or the raw value if it cannot be formatted.
    pub fn display(&self, value: Option<&str>, format: Option<&str>) -> String {
        match self.transform(value, format, None) {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                log::warn!("date format failed: {}", e);
                value.unwrap_or_default().to_string()
            }
        }
    }
}
