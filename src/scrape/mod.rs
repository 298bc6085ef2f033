pub mod countdown;
pub mod launch;
pub mod timeline;

use crate::error::ExtractError;
use rand::Rng;
use scraper::{Html, Selector};
use std::path::Path;
use std::time::Duration;
use thirtyfour::prelude::{ElementQueryable, ElementWaitable, WebDriverError};
use thirtyfour::{By, WebDriver};
use url::Url;

/// How long to wait for `body` after the fixed wait has elapsed.
const BODY_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

pub async fn short_pause() {
    let ms = rand::thread_rng().gen_range(300..600);
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

pub async fn scroll_to_bottom(driver: &WebDriver) -> Result<(), WebDriverError> {
    driver
        .execute(
            r#"window.scrollTo({
  top: document.body.scrollHeight,
  left: 0,
  behavior: "instant",
});"#,
            vec![],
        )
        .await?;
    short_pause().await;
    Ok(())
}

pub async fn wait_until_loaded(driver: &WebDriver) -> Result<(), WebDriverError> {
    driver
        .query(By::Tag("body"))
        .wait(BODY_TIMEOUT, Duration::from_millis(250))
        .first()
        .await?
        .wait_until()
        .displayed()
        .await?;

    Ok(())
}

pub fn save_page(source: &str, path: &Path) -> Result<(), ExtractError> {
    std::fs::write(path, source.as_bytes())?;
    info!("saved page source to {}", path.display());
    Ok(())
}

/// Navigate to `url`, give scripts `wait` to render, and return the page source.
pub async fn load_page(driver: &WebDriver, url: &Url, wait: Duration) -> Result<String, ExtractError> {
    driver.goto(url.as_str()).await?;
    debug!("navigated to {url}, waiting {}s", wait.as_secs());
    tokio::time::sleep(wait).await;

    // a page that never shows its body is still worth reading
    if let Err(e) = wait_until_loaded(driver).await {
        warn!("body did not show up: {e}");
    }
    if let Err(e) = scroll_to_bottom(driver).await {
        warn!("could not scroll: {e}");
    }

    Ok(driver.source().await?)
}

/// Everything we read off a loaded launch page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtract {
    pub countdown: Option<String>,
    /// Visible text, trimmed to the marker line when present.
    pub text: String,
    /// `TIME|EVENT` lines from the timeline table.
    pub timeline: Vec<String>,
}

pub fn extract_page(source: &str, digit_height: u32, marker: &str) -> Result<PageExtract, ExtractError> {
    let html = Html::parse_document(source);
    let countdown = countdown::extract_countdown(&html, digit_height)?;
    let text = timeline::page_text(&html);
    let text = timeline::trim_to_marker(&text, marker).to_string();
    let timeline = timeline::table_timeline(&html)?;
    debug!(
        "countdown {:?}, {} text lines, {} table rows",
        countdown,
        text.lines().count(),
        timeline.len()
    );
    Ok(PageExtract {
        countdown,
        text,
        timeline,
    })
}
