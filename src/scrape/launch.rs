//! The launch page itself: load it once, read it, and turn it into output.

use super::{extract_page, load_page, save_page, PageExtract};
use crate::cleanup::{CleanupClient, API_KEY_VAR};
use crate::error::{ApiError, ExtractError, Result};
use crate::report;
use crate::timestamp::{convert, Schedule};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use thirtyfour::WebDriver;
use url::Url;

/// A page as read, with the moment its countdown was on screen.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub page: PageExtract,
    pub observed_at: DateTime<Utc>,
}

impl ScrapedPage {
    pub fn from_source(
        source: &str,
        observed_at: DateTime<Utc>,
        digit_height: u32,
        marker: &str,
    ) -> Result<Self> {
        Ok(ScrapedPage {
            page: extract_page(source, digit_height, marker)?,
            observed_at,
        })
    }
}

pub async fn scrape(
    driver: &WebDriver,
    url: &Url,
    wait: Duration,
    save_to: Option<&Path>,
) -> Result<ScrapedPage> {
    let (digit_height, marker) = {
        let config = crate::config()?;
        (config.digit_height, config.marker)
    };

    eprintln!("{} {url}", "Loading page (this may take a moment)...".yellow().bold());
    let source = load_page(driver, url, wait).await?;
    let observed_at = Utc::now();
    if let Some(path) = save_to {
        save_page(&source, path)?;
    }
    ScrapedPage::from_source(&source, observed_at, digit_height, &marker)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mode {
    pub cleanup: bool,
    pub timestamps: bool,
}

#[derive(Debug)]
pub struct Output {
    pub text: String,
    pub schedule: Option<Schedule>,
}

/// Text handed to the model: the table rows when we found any, otherwise the page text.
fn cleanup_input(page: &PageExtract) -> Option<String> {
    if !page.timeline.is_empty() {
        return Some(report::render_lines(&page.timeline));
    }
    if page.text.trim().is_empty() {
        return None;
    }
    Some(page.text.clone())
}

pub async fn process(
    page: &PageExtract,
    mode: Mode,
    client: Option<&CleanupClient>,
    now: DateTime<Utc>,
) -> Result<Output> {
    let lines = match (mode.cleanup, client) {
        (true, Some(client)) => {
            let input = cleanup_input(page).ok_or(ExtractError::NoTimeline)?;
            client.clean_timeline(&input).await?
        }
        (true, None) => return Err(ApiError::MissingKey(API_KEY_VAR).into()),
        (false, _) => page.timeline.clone(),
    };

    if mode.timestamps {
        if lines.is_empty() {
            warn!("no timeline lines, only the launch time will be printed");
        }
        let schedule = convert(page.countdown.as_deref(), &lines, now)?;
        return Ok(Output {
            text: report::render_schedule(&schedule),
            schedule: Some(schedule),
        });
    }

    let text = if mode.cleanup {
        report::render_page(&PageExtract {
            countdown: page.countdown.clone(),
            text: report::render_lines(&lines),
            timeline: lines,
        })
    } else {
        report::render_page(page)
    };
    Ok(Output {
        text,
        schedule: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn schedule_is_anchored_at_observation_time() {
        let source = r#"<html><body>
            <launch-countdown>
              <launch-countdown-digit><div class="digit-values" style="top: 0px"><div class="digit">0</div></div></launch-countdown-digit>
              <launch-countdown-digit><div class="digit-values" style="top: 0px"><div class="digit">0</div></div></launch-countdown-digit>
              <launch-countdown-digit><div class="digit-values" style="top: -13px"><div class="digit">0</div><div class="digit">1</div></div></launch-countdown-digit>
              <launch-countdown-digit><div class="digit-values" style="top: 0px"><div class="digit">0</div></div></launch-countdown-digit>
              <launch-countdown-digit><div class="digit-values" style="top: 0px"><div class="digit">0</div></div></launch-countdown-digit>
              <launch-countdown-digit><div class="digit-values" style="top: 0px"><div class="digit">0</div></div></launch-countdown-digit>
            </launch-countdown>
            <table><tr><td>-00:00:30</td><td>Startup</td></tr></table>
        </body></html>"#;
        let observed_at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();

        let scraped = ScrapedPage::from_source(source, observed_at, 13, "").unwrap();
        assert_eq!(scraped.observed_at, observed_at);
        assert_eq!(scraped.page.countdown.as_deref(), Some("00:10:00"));

        let mode = Mode {
            cleanup: false,
            timestamps: true,
        };
        let output = process(&scraped.page, mode, None, scraped.observed_at)
            .await
            .unwrap();
        let schedule = output.schedule.unwrap();
        assert_eq!(schedule.launch, observed_at + chrono::Duration::minutes(10));
        assert_eq!(schedule.events[0].at, observed_at + chrono::Duration::seconds(570));
    }
}
