use crate::scrape::countdown::DEFAULT_DIGIT_HEIGHT;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Scrape a launch page and print its countdown and timeline.
#[derive(Debug, Parser)]
#[command(name = "tminus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Launch page to load
    pub url: Url,

    /// Seconds to wait for the page scripts to render
    #[arg(default_value_t = 5)]
    pub wait: u64,

    /// Reformat the timeline into TIME|EVENT lines with a chat completion call
    #[arg(long)]
    pub cleanup: bool,

    /// Convert the countdown and timeline into Discord timestamps
    #[arg(long)]
    pub timestamps: bool,

    /// WebDriver server to connect to
    #[arg(long, env = "TMINUS_WEBDRIVER")]
    pub webdriver: Option<Url>,

    /// Start chromedriver before connecting
    #[arg(long)]
    pub spawn_driver: bool,

    /// Path of the chromedriver binary used with --spawn-driver
    #[arg(long, default_value = "chromedriver")]
    pub chromedriver: String,

    /// Pixel height of one countdown digit
    #[arg(long, default_value_t = DEFAULT_DIGIT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    pub digit_height: u32,

    /// Drop page text before this line
    #[arg(long)]
    pub marker: Option<String>,

    /// Save the rendered page source here
    #[arg(long)]
    pub save_html: Option<PathBuf>,

    /// Also write the converted schedule as csv (with --timestamps)
    #[arg(long, requires = "timestamps")]
    pub csv: Option<PathBuf>,
}

impl Cli {
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait)
    }
}
