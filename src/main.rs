use anyhow::Result;
use nfl_txt::config::Config;
use nfl_txt::feed::score_feed::EspnScoreboard;
use nfl_txt::feed::the_odds_api::TheOddsApi;
use nfl_txt::feed::OddsFeed;
use nfl_txt::menu::Menu;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the menu, so logs go to a file
    let log_file = std::fs::File::create("nfl-txt.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nfl_txt=info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let config = Config::load_or_default(Path::new("config.toml"))?;

    // Load saved keys from .env (real env vars take precedence)
    Config::load_env_file();

    let odds: Option<Box<dyn OddsFeed>> = match Config::odds_api_key() {
        Some(key) => {
            let feed = TheOddsApi::new(key, &config.odds_feed, config.timezone)?;
            Some(Box::new(feed) as Box<dyn OddsFeed>)
        }
        None => {
            tracing::warn!("ODDS_API_KEY not set, odds export disabled");
            None
        }
    };
    let scores = Box::new(EspnScoreboard::new(&config.score_feed)?);

    tracing::info!(tz = %config.timezone, dir = %config.output.directory.display(), "starting");

    let mut menu = Menu::new(odds, scores, config.output.clone());
    let stdin = std::io::stdin();
    menu.run(stdin.lock(), std::io::stdout()).await?;

    tracing::debug!("shutting down");
    Ok(())
}
