use crate::error::ExtractError;
use colored::Colorize;
use std::process::{Child, Command};
use std::sync::Mutex;
use std::time::Duration;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};
use url::Url;

static CHILD: Mutex<Option<Child>> = Mutex::new(None);

const HEADLESS_ARGS: [&str; 4] = [
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--window-size=1920,1080",
];

/// Kills a chromedriver started by [`spawn_chrome_driver`] when dropped.
pub struct KillChildGuard;

impl Drop for KillChildGuard {
    fn drop(&mut self) {
        let child = CHILD.lock().ok().and_then(|mut c| c.take());
        if let Some(mut child) = child {
            debug!("killing chromedriver (pid {})", child.id());
            if let Err(e) = child.kill() {
                warn!("failed to kill chromedriver: {e}");
            }
            match child.wait() {
                Ok(status) => debug!("chromedriver exited: {status}"),
                Err(e) => debug!("could not reap chromedriver: {e}"),
            }
        }
    }
}

/// Start `chromedriver` listening on the port of `server`.
pub fn spawn_chrome_driver(path: &str, server: &Url) -> Result<KillChildGuard, ExtractError> {
    let port = server.port_or_known_default().unwrap_or(9515);
    eprintln!("{} {path} on port {port}", "Starting".yellow().bold());
    let child = Command::new(path)
        .arg(format!("--port={port}"))
        .spawn()
        .map_err(|source| ExtractError::SpawnDriver {
            path: path.to_string(),
            source,
        })?;
    if let Ok(mut slot) = CHILD.lock() {
        *slot = Some(child);
    }
    Ok(KillChildGuard)
}

pub enum DriverType {
    /// Connect to a WebDriver server that is already running.
    Running,
    /// Launch the chromedriver binary at this path first.
    Spawn(String),
}

/// Open a headless Chrome session on the WebDriver server at `server`.
///
/// The returned guard must outlive the session when the driver was spawned.
pub async fn init_driver(
    server: &Url,
    driver_type: DriverType,
) -> Result<(WebDriver, Option<KillChildGuard>), ExtractError> {
    let guard = match driver_type {
        DriverType::Running => {
            debug!("using the webdriver at {server}");
            None
        }
        DriverType::Spawn(path) => {
            let guard = spawn_chrome_driver(&path, server)?;
            // give it a moment to bind the port
            tokio::time::sleep(Duration::from_millis(500)).await;
            Some(guard)
        }
    };

    let mut caps = DesiredCapabilities::chrome();
    caps.set_headless()?;
    for arg in HEADLESS_ARGS {
        caps.add_arg(arg)?;
    }

    let driver = WebDriver::new(server.as_str(), caps).await.map_err(|e| {
        eprintln!(
            "{}",
            format!("Failed to connect to a webdriver at {server}").bold().red()
        );
        ExtractError::Driver(e)
    })?;
    Ok((driver, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn guard_kills_and_reaps_the_child() {
        let server = Url::parse("http://localhost:9599").unwrap();
        let guard = spawn_chrome_driver("true", &server).unwrap();
        assert!(CHILD.lock().unwrap().is_some());

        drop(guard);
        assert!(CHILD.lock().unwrap().is_none());

        // nothing left to reap
        drop(KillChildGuard);
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let server = Url::parse("http://localhost:9599").unwrap();
        let err = spawn_chrome_driver("/nonexistent/chromedriver", &server)
            .err()
            .unwrap();
        assert!(matches!(err, ExtractError::SpawnDriver { .. }));
    }
}
