#[macro_use]
extern crate log;

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tminus::cleanup::CleanupClient;
use tminus::cli::Cli;
use tminus::error::{Result, EXIT_OK, EXIT_USAGE};
use tminus::report;
use tminus::scrape::launch::{self, Mode};
use tminus::web_driver::{self, DriverType};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::from(EXIT_OK),
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    tminus::init(&cli)?;
    let config = tminus::config()?;
    let mode = Mode {
        cleanup: cli.cleanup,
        timestamps: cli.timestamps,
    };

    // fail on a missing key before paying for the browser
    let client = if mode.cleanup {
        Some(CleanupClient::from_env(&config.api_base)?)
    } else {
        None
    };

    let server = config.webdriver_url()?;
    let driver_type = match &config.chromedriver {
        Some(path) => DriverType::Spawn(path.clone()),
        None => DriverType::Running,
    };
    // the guard kills a spawned chromedriver; keep it until the session is closed
    let (driver, _kill_guard) = web_driver::init_driver(&server, driver_type).await?;

    let scraped = launch::scrape(&driver, &cli.url, cli.wait(), cli.save_html.as_deref()).await;
    if let Err(e) = driver.quit().await {
        warn!("could not close the browser session: {e}");
    }
    let scraped = scraped?;

    let output = launch::process(
        &scraped.page,
        mode,
        client.as_ref(),
        scraped.observed_at,
    )
    .await?;

    // keep the result clear of the progress lines above it
    for _ in 0..10 {
        println!();
    }
    println!("{}", output.text);

    if let (Some(path), Some(schedule)) = (&cli.csv, &output.schedule) {
        report::write_csv(schedule, path)?;
    }
    Ok(())
}
