pub mod score_feed;
pub mod the_odds_api;
pub mod types;

use crate::week::WeekRange;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use types::{ApiQuota, OddsGame, ResultGame};

#[async_trait]
pub trait OddsFeed: Send + Sync {
    async fn fetch_odds_for_week(&mut self, week: &WeekRange) -> Result<Vec<OddsGame>>;
    fn last_quota(&self) -> Option<ApiQuota>;
}

/// A scoreboard keyed by calendar day.
#[async_trait]
pub trait ScoreFeed: Send + Sync {
    async fn fetch_day(&mut self, date: NaiveDate) -> Result<Vec<ResultGame>>;
}

/// Query every day of `week` one after another and concatenate the completed
/// games in day order. The first failing day aborts the whole week.
pub async fn fetch_results_for_week<F>(feed: &mut F, week: &WeekRange) -> Result<Vec<ResultGame>>
where
    F: ScoreFeed + ?Sized,
{
    let mut games = Vec::new();
    for day in week.days() {
        let day_games = feed
            .fetch_day(day)
            .await
            .with_context(|| format!("results fetch aborted on {}", day.format("%d.%m.%Y")))?;
        tracing::debug!(%day, count = day_games.len(), "scoreboard day parsed");
        games.extend(day_games);
    }
    tracing::info!(%week, count = games.len(), "results collected");
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::week_range;

    struct ScriptedFeed {
        calls: Vec<NaiveDate>,
        fail_on: Option<NaiveDate>,
    }

    #[async_trait]
    impl ScoreFeed for ScriptedFeed {
        async fn fetch_day(&mut self, date: NaiveDate) -> Result<Vec<ResultGame>> {
            self.calls.push(date);
            if self.fail_on == Some(date) {
                anyhow::bail!("503 Service Unavailable");
            }
            Ok(vec![ResultGame {
                away_team: format!("Away {}", date.format("%d")),
                home_team: format!("Home {}", date.format("%d")),
                score_away: 0,
                score_home: 0,
            }])
        }
    }

    fn week() -> WeekRange {
        week_range(NaiveDate::from_ymd_opt(2025, 11, 13).unwrap())
    }

    #[tokio::test]
    async fn test_queries_six_days_in_order() {
        let mut feed = ScriptedFeed { calls: vec![], fail_on: None };
        let games = fetch_results_for_week(&mut feed, &week()).await.unwrap();
        assert_eq!(feed.calls.len(), 6);
        assert_eq!(feed.calls, week().days().collect::<Vec<_>>());
        let homes: Vec<_> = games.iter().map(|g| g.home_team.as_str()).collect();
        assert_eq!(homes, ["Home 13", "Home 14", "Home 15", "Home 16", "Home 17", "Home 18"]);
    }

    #[tokio::test]
    async fn test_failing_day_aborts_week() {
        let fail_on = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        let mut feed = ScriptedFeed { calls: vec![], fail_on: Some(fail_on) };
        let err = fetch_results_for_week(&mut feed, &week()).await.unwrap_err();
        assert_eq!(feed.calls.len(), 3);
        assert!(format!("{:#}", err).contains("503"));
        assert!(err.to_string().contains("15.11.2025"));
    }
}
