//! Turns a countdown plus a list of `TIME|EVENT` lines into absolute times.
//!
//! The countdown is the time left until liftoff, so `now + countdown` is the
//! launch time. Every timeline offset is relative to that launch time; a
//! leading `-` means the event happens before liftoff.

use crate::error::ConvertError;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// Separator between the time token and the event text.
pub const DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub offset: Duration,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledEvent {
    #[serde(serialize_with = "serialize_offset")]
    pub offset: Duration,
    pub event: String,
    pub at: DateTime<Utc>,
}

impl ScheduledEvent {
    pub fn unix(&self) -> i64 {
        self.at.timestamp()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub launch: DateTime<Utc>,
    pub events: Vec<ScheduledEvent>,
}

impl Schedule {
    pub fn launch_unix(&self) -> i64 {
        self.launch.timestamp()
    }
}

/// `H..:MM:SS` or `MM:SS` into seconds. Leading field may be any width.
fn parse_clock(token: &str, allow_short: bool) -> Option<i64> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 3 && !(allow_short && parts.len() == 2) {
        return None;
    }
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let mut total: i64 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: i64 = part.parse().ok()?;
        // only the leading field may exceed the base
        if i > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}

/// Parse the countdown widget text (`HH:MM:SS`, optionally prefixed with `T-`).
pub fn parse_countdown(countdown: &str) -> Result<Duration, ConvertError> {
    let trimmed = countdown.trim();
    if trimmed.is_empty() {
        return Err(ConvertError::MissingCountdown);
    }
    let token = trimmed
        .strip_prefix("T-")
        .or_else(|| trimmed.strip_prefix('T'))
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);

    parse_clock(token, false)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| ConvertError::BadCountdown(trimmed.to_string()))
}

/// Parse a signed offset relative to liftoff, e.g. `-00:10:00`, `T+02:30`.
pub fn parse_offset(token: &str) -> Option<Duration> {
    let token = token.trim();
    let token = token
        .strip_prefix('T')
        .or_else(|| token.strip_prefix('t'))
        .unwrap_or(token);
    let (negative, clock) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };
    let seconds = parse_clock(clock.trim(), true)?;
    // tokens past chrono's range are as malformed as a bad digit
    Duration::try_seconds(if negative { -seconds } else { seconds })
}

/// A line without the delimiter, with a bad time token or without an event
/// text yields `None`.
pub fn parse_timeline_line(line: &str) -> Option<TimelineEntry> {
    let (time, event) = line.split_once(DELIMITER)?;
    let offset = parse_offset(time)?;
    let event = event.trim();
    if event.is_empty() {
        return None;
    }
    Some(TimelineEntry {
        offset,
        event: event.to_string(),
    })
}

pub fn parse_timeline<I, S>(lines: I) -> Vec<TimelineEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let parsed = parse_timeline_line(line.as_ref());
            if parsed.is_none() {
                debug!("skipping timeline line {:?}", line.as_ref());
            }
            parsed
        })
        .collect()
}

/// Convert a countdown observed at `now` and the timeline lines into a schedule.
pub fn convert<I, S>(
    countdown: Option<&str>,
    lines: I,
    now: DateTime<Utc>,
) -> Result<Schedule, ConvertError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let raw = countdown.ok_or(ConvertError::MissingCountdown)?;
    let remaining = parse_countdown(raw)?;
    let launch = now
        .checked_add_signed(remaining)
        .ok_or_else(|| ConvertError::BadCountdown(raw.trim().to_string()))?;

    let events = parse_timeline(lines)
        .into_iter()
        .filter_map(|entry| {
            let Some(at) = launch.checked_add_signed(entry.offset) else {
                debug!("skipping {:?}, its time is out of range", entry.event);
                return None;
            };
            Some(ScheduledEvent {
                at,
                offset: entry.offset,
                event: entry.event,
            })
        })
        .collect();

    Ok(Schedule { launch, events })
}

/// Render an offset the way timelines print it: `-00:10:00`, `00:05:00`.
pub fn format_offset(offset: Duration) -> String {
    let total = offset.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn serialize_offset<S: serde::Serializer>(offset: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_offset(*offset))
}

/// Discord timestamp styles, see the `<t:UNIX:STYLE>` markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscordStyle {
    ShortTime,
    LongTime,
    ShortDate,
    LongDate,
    ShortDateTime,
    LongDateTime,
    Relative,
}

impl DiscordStyle {
    fn code(self) -> char {
        match self {
            DiscordStyle::ShortTime => 't',
            DiscordStyle::LongTime => 'T',
            DiscordStyle::ShortDate => 'd',
            DiscordStyle::LongDate => 'D',
            DiscordStyle::ShortDateTime => 'f',
            DiscordStyle::LongDateTime => 'F',
            DiscordStyle::Relative => 'R',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscordTimestamp {
    pub unix: i64,
    pub style: DiscordStyle,
}

impl DiscordTimestamp {
    pub fn new(unix: i64, style: DiscordStyle) -> Self {
        Self { unix, style }
    }
}

impl fmt::Display for DiscordTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<t:{}:{}>", self.unix, self.style.code())
    }
}
