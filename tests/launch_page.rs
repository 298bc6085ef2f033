// End to end extraction on a saved launch page, without a browser.
use chrono::{Duration, TimeZone, Utc};
use tminus::scrape::countdown::DEFAULT_DIGIT_HEIGHT;
use tminus::scrape::extract_page;
use tminus::scrape::launch::{process, Mode};
use tminus::scrape::timeline::DEFAULT_MARKER;

const PAGE: &str = include_str!("fixtures/launch_page.html");

#[test]
fn test_reads_countdown_widget() {
    let page = extract_page(PAGE, DEFAULT_DIGIT_HEIGHT, DEFAULT_MARKER).unwrap();
    assert_eq!(page.countdown.as_deref(), Some("02:15:47"));
}

#[test]
fn test_text_starts_at_webcast_line() {
    let page = extract_page(PAGE, DEFAULT_DIGIT_HEIGHT, DEFAULT_MARKER).unwrap();
    assert!(page.text.starts_with(DEFAULT_MARKER));
    assert!(!page.text.contains("Human Spaceflight"));
    assert!(!page.text.contains("window.__launch"));
    assert!(!page.text.contains("Enable JavaScript"));
    assert!(page.text.contains("Falcon 9 liftoff"));
}

#[test]
fn test_collects_both_timeline_tables() {
    let page = extract_page(PAGE, DEFAULT_DIGIT_HEIGHT, DEFAULT_MARKER).unwrap();
    assert_eq!(page.timeline.len(), 10);
    assert_eq!(
        page.timeline.first().map(String::as_str),
        Some("-00:38:00|SpaceX Launch Director verifies go for propellant load")
    );
    assert_eq!(
        page.timeline.last().map(String::as_str),
        Some("01:05:07|Starlink satellites deploy")
    );
}

#[tokio::test]
async fn test_page_to_schedule() {
    let page = extract_page(PAGE, DEFAULT_DIGIT_HEIGHT, DEFAULT_MARKER).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
    let mode = Mode {
        cleanup: false,
        timestamps: true,
    };

    let output = process(&page, mode, None, now).await.unwrap();
    let schedule = output.schedule.unwrap();
    let launch = now + Duration::hours(2) + Duration::minutes(15) + Duration::seconds(47);

    assert_eq!(schedule.launch, launch);
    assert_eq!(schedule.events.len(), 10);
    assert_eq!(schedule.events[0].at, launch - Duration::minutes(38));
    let liftoff = schedule
        .events
        .iter()
        .find(|e| e.event == "Falcon 9 liftoff")
        .unwrap();
    assert_eq!(liftoff.unix(), launch.timestamp());
    assert!(output
        .text
        .starts_with(&format!("Launch: <t:{}:F>", launch.timestamp())));
}
