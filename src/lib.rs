#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod cleanup;
pub mod cli;
pub mod error;
pub mod report;
pub mod scrape;
pub mod timestamp;
pub mod web_driver;

use cli::Cli;
use error::{Error, Result};
use std::sync::Mutex;
use url::Url;

pub const DEFAULT_WEBDRIVER: &str = "http://localhost:9515";

#[derive(Debug, Clone)]
pub struct Config {
    pub webdriver: String,
    /// Set when chromedriver should be launched by us.
    pub chromedriver: Option<String>,
    pub digit_height: u32,
    pub marker: String,
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            webdriver: DEFAULT_WEBDRIVER.to_string(),
            chromedriver: None,
            digit_height: scrape::countdown::DEFAULT_DIGIT_HEIGHT,
            marker: scrape::timeline::DEFAULT_MARKER.to_string(),
            api_base: cleanup::DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Defaults, with the api base taken from `TMINUS_API_BASE` when set.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(base) = std::env::var(cleanup::API_BASE_VAR) {
            if !base.trim().is_empty() {
                config.api_base = base.trim().to_string();
            }
        }
        config
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(webdriver) = &cli.webdriver {
            self.webdriver = webdriver.to_string();
        }
        if cli.spawn_driver {
            self.chromedriver = Some(cli.chromedriver.clone());
        }
        self.digit_height = cli.digit_height;
        if let Some(marker) = &cli.marker {
            self.marker = marker.clone();
        }
    }

    pub fn webdriver_url(&self) -> Result<Url> {
        Url::parse(&self.webdriver)
            .map_err(|e| Error::Usage(format!("invalid webdriver url {:?}: {e}", self.webdriver)))
    }
}

lazy_static! {
    pub static ref CONFIG: Mutex<Config> = Mutex::new(Config::from_env());
}

/// Fold the command line into [`CONFIG`].
/// This function shall only be called once.
pub fn init(cli: &Cli) -> Result<()> {
    static HAS_RUN: Mutex<bool> = Mutex::new(false);
    let mut has_run = HAS_RUN
        .lock()
        .map_err(|_| Error::Usage("config lock poisoned".into()))?;
    if *has_run {
        return Err(Error::Usage("init() already ran".into()));
    }
    *has_run = true;

    let mut config = CONFIG
        .lock()
        .map_err(|_| Error::Usage("config lock poisoned".into()))?;
    config.apply_cli(cli);
    config.webdriver_url()?;
    debug!("config: {:?}", *config);
    Ok(())
}

/// Snapshot of [`CONFIG`].
pub fn config() -> Result<Config> {
    CONFIG
        .lock()
        .map(|c| c.clone())
        .map_err(|_| Error::Usage("config lock poisoned".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_overrides_defaults() {
        let cli = Cli::try_parse_from([
            "tminus",
            "https://example.com",
            "--webdriver",
            "http://127.0.0.1:4444",
            "--spawn-driver",
            "--marker",
            "Timeline",
            "--digit-height",
            "20",
        ])
        .unwrap();
        let mut config = Config::default();
        config.apply_cli(&cli);
        assert_eq!(config.webdriver, "http://127.0.0.1:4444/");
        assert_eq!(config.chromedriver.as_deref(), Some("chromedriver"));
        assert_eq!(config.marker, "Timeline");
        assert_eq!(config.digit_height, 20);
    }

    #[test]
    fn init_runs_once() {
        let cli = Cli::try_parse_from([
            "tminus",
            "https://example.com",
            "--marker",
            "Countdown",
            "--digit-height",
            "26",
        ])
        .unwrap();
        assert!(init(&cli).is_ok());
        assert!(matches!(init(&cli), Err(Error::Usage(_))));

        let config = config().unwrap();
        assert_eq!(config.marker, "Countdown");
        assert_eq!(config.digit_height, 26);
    }
}
