//! Viewer timezone resolution.
//!
//! Accepts IANA names (`America/Chicago`) and fixed offsets written as
//! `UTC`, `UTC-5`, `GMT+2`, `UTC+05:30` or `UTC-0330`.

use std::fmt;

use campus_core::models::subscriber::Subscriber;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ViewerZone {
    pub const UTC: ViewerZone = ViewerZone::Named(Tz::UTC);

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(offset) = parse_offset(raw) {
            return Some(ViewerZone::Fixed(offset));
        }
        raw.parse::<Tz>().ok().map(ViewerZone::Named)
    }

    /// Parse `raw`, falling back to UTC when absent or unrecognised.
    pub fn parse_or_utc(raw: Option<&str>) -> Self {
        match raw {
            None => ViewerZone::UTC,
            Some(s) => Self::parse(s).unwrap_or_else(|| {
                warn!(timezone = %s, "Unrecognised timezone, using UTC");
                ViewerZone::UTC
            }),
        }
    }

    /// Zone from the viewer's preference record, else `default`.
    pub fn for_viewer(aggregate: &Subscriber, viewer_id: Option<Uuid>, default: &str) -> Self {
        let preferred = viewer_id
            .and_then(|id| aggregate.preference_for(id))
            .and_then(|p| p.timezone.as_deref());
        Self::parse_or_utc(preferred.or(Some(default)))
    }

    /// Calendar date of `instant` as seen in this zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            ViewerZone::Named(tz) => instant.with_timezone(tz).date_naive(),
            ViewerZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}

impl Default for ViewerZone {
    fn default() -> Self {
        ViewerZone::UTC
    }
}

impl fmt::Display for ViewerZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerZone::Named(tz) => write!(f, "{}", tz.name()),
            ViewerZone::Fixed(offset) => write!(f, "UTC{offset}"),
        }
    }
}

/// `UTC±H[H][[:]MM]` or `GMT±...`. A bare `UTC` is left to the IANA parser.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let upper = raw.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))?;

    let (sign, digits) = match rest.chars().next()? {
        '+' => (1, &rest[1..]),
        '-' => (-1, &rest[1..]),
        _ => return None,
    };

    // Byte-index splitting below needs single-byte characters.
    if !digits.is_ascii() {
        return None;
    }
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() > 2 => digits.split_at(digits.len() - 2),
        None => (digits, "0"),
    };
    if hours.is_empty() || !hours.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !minutes.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
