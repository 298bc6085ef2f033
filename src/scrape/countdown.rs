//! Reads the rolling-digit countdown widget.
//!
//! The widget renders every digit as a vertical strip of `div.digit` children
//! inside a `div.digit-values` container, and scrolls the strip with an
//! inline `top: -26px` style. The visible digit is therefore the child at
//! `|top| / digit_height`.

use super::selector;
use crate::error::ExtractError;
use scraper::{ElementRef, Html};

pub const DEFAULT_DIGIT_HEIGHT: u32 = 13;

/// Pull the pixel value out of an inline style such as `top: -26px; left: 0`.
pub fn top_offset(style: &str) -> Option<i64> {
    let (_, after) = style.split_once("top:")?;
    let value = after.split("px").next()?.trim();
    value.parse().ok()
}

fn visible_digit(digit: ElementRef, digit_height: u32) -> Result<Option<String>, ExtractError> {
    let values_sel = selector("div.digit-values")?;
    let digit_sel = selector("div.digit")?;

    let Some(values) = digit.select(&values_sel).next() else {
        return Ok(None);
    };
    let Some(top) = values.value().attr("style").and_then(top_offset) else {
        warn!("countdown digit without a usable top offset");
        return Ok(None);
    };
    if digit_height == 0 {
        return Ok(None);
    }

    let index = (top.unsigned_abs() / u64::from(digit_height)) as usize;
    let strip: Vec<ElementRef> = values.select(&digit_sel).collect();
    match strip.get(index) {
        Some(el) => Ok(Some(el.text().collect::<String>().trim().to_string())),
        None => {
            warn!(
                "countdown offset {top}px points past the {} digits of the strip",
                strip.len()
            );
            Ok(None)
        }
    }
}

/// The countdown as `HH:MM:SS`, or the raw digits when fewer than six were read.
pub fn extract_countdown(html: &Html, digit_height: u32) -> Result<Option<String>, ExtractError> {
    let widget_sel = selector("launch-countdown")?;
    let digit_sel = selector("launch-countdown-digit")?;

    let Some(widget) = html.select(&widget_sel).next() else {
        debug!("no launch-countdown element on the page");
        return Ok(None);
    };

    let mut digits = Vec::new();
    for digit in widget.select(&digit_sel) {
        if let Some(d) = visible_digit(digit, digit_height)? {
            digits.push(d);
        }
    }

    if digits.is_empty() {
        return Ok(None);
    }
    if digits.len() >= 6 {
        return Ok(Some(format!(
            "{}{}:{}{}:{}{}",
            digits[0], digits[1], digits[2], digits[3], digits[4], digits[5]
        )));
    }
    Ok(Some(digits.concat()))
}
