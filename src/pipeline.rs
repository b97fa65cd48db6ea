// Fetch -> format -> write for one week, shared by the menu and the tests.

use crate::config::OutputConfig;
use crate::feed::{fetch_results_for_week, OddsFeed, ScoreFeed};
use crate::format::{format_odds_line, format_result_line};
use crate::output::write_lines;
use crate::week::WeekRange;
use anyhow::Result;
use std::path::PathBuf;

/// What an export produced. An empty week is not an error and writes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    Written { path: PathBuf, count: usize },
    Empty,
}

pub async fn export_odds<F>(feed: &mut F, week: &WeekRange, output: &OutputConfig) -> Result<Export>
where
    F: OddsFeed + ?Sized,
{
    let games = feed.fetch_odds_for_week(week).await?;
    if let Some(quota) = feed.last_quota() {
        tracing::info!(
            used = quota.requests_used,
            remaining = quota.requests_remaining,
            "odds quota after fetch"
        );
    }
    if games.is_empty() {
        tracing::info!(%week, "no odds in week");
        return Ok(Export::Empty);
    }
    let path = write_lines(
        games.iter().map(format_odds_line),
        &output.odds_prefix,
        week,
        &output.directory,
    )?;
    Ok(Export::Written { path, count: games.len() })
}

pub async fn export_results<F>(feed: &mut F, week: &WeekRange, output: &OutputConfig) -> Result<Export>
where
    F: ScoreFeed + ?Sized,
{
    let games = fetch_results_for_week(feed, week).await?;
    if games.is_empty() {
        tracing::info!(%week, "no completed games in week");
        return Ok(Export::Empty);
    }
    let path = write_lines(
        games.iter().map(format_result_line),
        &output.results_prefix,
        week,
        &output.directory,
    )?;
    Ok(Export::Written { path, count: games.len() })
}
