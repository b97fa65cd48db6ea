use super::types::*;
use super::OddsFeed;
use crate::config::OddsFeedConfig;
use crate::week::WeekRange;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;

/// Market key of head-to-head (moneyline) prices.
const H2H_MARKET: &str = "h2h";

pub struct TheOddsApi {
    client: Client,
    api_key: String,
    base_url: String,
    sport: String,
    regions: String,
    bookmakers: String,
    tz: Tz,
    last_quota: Option<ApiQuota>,
}

/// Parse a quota header that may be an integer or float (e.g. "14527.0").
fn parse_quota_header(headers: &reqwest::header::HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| v as u64)
        .unwrap_or(0)
}

impl TheOddsApi {
    pub fn new(api_key: String, config: &OddsFeedConfig, tz: Tz) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build HTTP client for the-odds-api")?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sport: config.sport.clone(),
            regions: config.regions.clone(),
            bookmakers: config.bookmakers.trim().to_string(),
            tz,
            last_quota: None,
        })
    }

    /// GET request for the week's h2h odds; query values are URL-encoded.
    fn odds_request(&self) -> reqwest::RequestBuilder {
        let url = format!("{}/v4/sports/{}/odds", self.base_url, self.sport);
        let mut query = vec![
            ("apiKey", self.api_key.as_str()),
            ("regions", self.regions.as_str()),
            ("markets", H2H_MARKET),
            ("dateFormat", "iso"),
            ("oddsFormat", "decimal"),
        ];
        if !self.bookmakers.is_empty() {
            query.push(("bookmakers", self.bookmakers.as_str()));
        }
        self.client.get(url).query(&query)
    }
}

#[async_trait]
impl OddsFeed for TheOddsApi {
    async fn fetch_odds_for_week(&mut self, week: &WeekRange) -> Result<Vec<OddsGame>> {
        tracing::info!(sport = %self.sport, %week, "fetching odds");

        let resp = self.odds_request().send().await
            .context("the-odds-api request failed")?;

        // Extract quota from response headers
        let used = parse_quota_header(resp.headers(), "x-requests-used");
        let remaining = parse_quota_header(resp.headers(), "x-requests-remaining");
        self.last_quota = Some(ApiQuota {
            requests_used: used,
            requests_remaining: remaining,
        });
        tracing::debug!(used, remaining, "the-odds-api quota");

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("the-odds-api {} ({}): {}", self.sport, status, body);
        }

        let body = resp.text().await
            .context("failed to read the-odds-api response body")?;

        let games = parse_odds_payload(&body, week, self.tz)?;
        tracing::info!(count = games.len(), "odds parsed");
        Ok(games)
    }

    fn last_quota(&self) -> Option<ApiQuota> {
        self.last_quota.clone()
    }
}

/// Parse a raw the-odds-api body. Only a body that is not a JSON array is an
/// error; defective events inside it are skipped.
pub fn parse_odds_payload(json: &str, week: &WeekRange, tz: Tz) -> Result<Vec<OddsGame>> {
    let events: Vec<serde_json::Value> =
        serde_json::from_str(json).context("failed to parse the-odds-api response")?;
    Ok(parse_odds_events(events, week, tz))
}

/// Keep the events that kick off (in `tz`) inside `week` and carry a full
/// moneyline pair. Upstream order is preserved.
pub fn parse_odds_events(events: Vec<serde_json::Value>, week: &WeekRange, tz: Tz) -> Vec<OddsGame> {
    events
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<TheOddsApiEvent>(raw) {
            Ok(event) => to_odds_game(event, week, tz),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed odds event");
                None
            }
        })
        .collect()
}

fn to_odds_game(event: TheOddsApiEvent, week: &WeekRange, tz: Tz) -> Option<OddsGame> {
    let Some(commence) = event.commence_time.as_deref() else {
        tracing::debug!("skipping odds event: no commence_time");
        return None;
    };
    // RFC 3339 requires an offset; a naive timestamp is dropped like any other bad one
    let kickoff_local = match DateTime::parse_from_rfc3339(commence) {
        Ok(dt) => dt.with_timezone(&tz),
        Err(e) => {
            tracing::debug!(commence, error = %e, "skipping odds event: bad commence_time");
            return None;
        }
    };

    if !week.contains(kickoff_local.date_naive()) {
        return None;
    }

    let home = event.home_team.filter(|t| !t.is_empty());
    let away = event.away_team.filter(|t| !t.is_empty());
    let (Some(home_team), Some(away_team)) = (home, away) else {
        tracing::debug!(commence, "skipping odds event: missing team name");
        return None;
    };

    let Some((odds_away, odds_home)) = first_moneyline(&event.bookmakers, &away_team, &home_team) else {
        tracing::debug!(away = %away_team, home = %home_team, "skipping odds event: incomplete moneyline");
        return None;
    };

    Some(OddsGame {
        kickoff_local,
        away_team,
        home_team,
        odds_away,
        odds_home,
    })
}

/// Walk (bookmaker, h2h market, outcome) in supplied order and take the first
/// price seen for each side. Returns `(away, home)` as soon as both are known.
fn first_moneyline(
    bookmakers: &[TheOddsApiBookmaker],
    away_team: &str,
    home_team: &str,
) -> Option<(Decimal, Decimal)> {
    let outcomes = bookmakers
        .iter()
        .filter_map(|bm| bm.markets.iter().find(|m| m.key == H2H_MARKET))
        .flat_map(|m| m.outcomes.iter());

    let mut away = None;
    let mut home = None;
    for outcome in outcomes {
        let (Some(name), Some(price)) = (outcome.name.as_deref(), outcome.price) else { continue };
        if name == away_team {
            away.get_or_insert(price);
        } else if name == home_team {
            home.get_or_insert(price);
        }
        if let (Some(a), Some(h)) = (away, home) {
            return Some((a, h));
        }
    }
    None
}
