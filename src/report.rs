//! Plain-text output.

use crate::error::Result;
use crate::scrape::PageExtract;
use crate::timestamp::{format_offset, DiscordStyle, DiscordTimestamp, Schedule};
use std::fmt::Write as _;
use std::path::Path;

/// Countdown header followed by the page text.
pub fn render_page(page: &PageExtract) -> String {
    match &page.countdown {
        Some(countdown) => format!("Launch Countdown: {countdown}\n\n{}", page.text),
        None => page.text.clone(),
    }
}

pub fn render_lines(lines: &[String]) -> String {
    lines.join("\n")
}

/// Launch time and one line per event, as Discord timestamp markup.
pub fn render_schedule(schedule: &Schedule) -> String {
    let launch = schedule.launch_unix();
    let mut out = format!(
        "Launch: {} ({})\n",
        DiscordTimestamp::new(launch, DiscordStyle::LongDateTime),
        DiscordTimestamp::new(launch, DiscordStyle::Relative),
    );
    for event in &schedule.events {
        let _ = writeln!(
            out,
            "{} {} `{}` {}",
            DiscordTimestamp::new(event.unix(), DiscordStyle::LongTime),
            DiscordTimestamp::new(event.unix(), DiscordStyle::Relative),
            format_offset(event.offset),
            event.event
        );
    }
    out
}

/// One row per event: offset, event, RFC 3339 time.
pub fn write_csv(schedule: &Schedule, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for event in &schedule.events {
        wtr.serialize(event)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    info!("wrote {} events to {}", schedule.events.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::convert;
    use chrono::{TimeZone, Utc};

    #[test]
    fn page_report_puts_countdown_first() {
        let page = PageExtract {
            countdown: Some("01:02:03".into()),
            text: "Liftoff".into(),
            timeline: vec![],
        };
        assert_eq!(render_page(&page), "Launch Countdown: 01:02:03\n\nLiftoff");

        let page = PageExtract {
            countdown: None,
            ..page
        };
        assert_eq!(render_page(&page), "Liftoff");
    }

    #[test]
    fn schedule_uses_discord_markup() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let schedule = convert(Some("00:10:00"), ["-00:01:00|Terminal count"], now).unwrap();
        let out = render_schedule(&schedule);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("Launch: <t:1700000600:F> (<t:1700000600:R>)")
        );
        assert_eq!(
            lines.next(),
            Some("<t:1700000540:T> <t:1700000540:R> `-00:01:00` Terminal count")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_export_has_signed_offsets_and_rfc3339_times() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let schedule = convert(
            Some("00:10:00"),
            ["-00:10:00|Event A", "00:05:00|Event B, with comma"],
            now,
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("tminus-schedule-{}.csv", std::process::id()));
        write_csv(&schedule, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(
            written,
            "offset,event,at\n\
             -00:10:00,Event A,2023-11-14T22:13:20Z\n\
             00:05:00,\"Event B, with comma\",2023-11-14T22:28:20Z\n"
        );
    }
}
