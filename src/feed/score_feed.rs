use super::types::ResultGame;
use super::ScoreFeed;
use crate::config::ScoreFeedConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// ESPN `status.type.state` of a finished game.
const STATE_POST: &str = "post";

pub struct EspnScoreboard {
    client: Client,
    url: String,
}

impl EspnScoreboard {
    pub fn new(config: &ScoreFeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("failed to build HTTP client for ESPN")?;
        Ok(Self {
            client,
            url: config.espn_api_url.trim_end_matches('/').to_string(),
        })
    }
}

/// ESPN `dates` query value, e.g. `20251113`.
pub fn espn_date_param(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[async_trait]
impl ScoreFeed for EspnScoreboard {
    async fn fetch_day(&mut self, date: NaiveDate) -> Result<Vec<ResultGame>> {
        let dates = espn_date_param(date);
        tracing::info!(dates = %dates, "fetching ESPN scoreboard");

        let resp = self
            .client
            .get(format!("{}?dates={}", self.url, dates))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("ESPN scoreboard request failed for {}", dates))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("ESPN scoreboard {} ({}): {}", dates, status, body);
        }

        let body = resp.text().await
            .with_context(|| format!("failed to read ESPN scoreboard body for {}", dates))?;
        parse_espn_results(&body)
    }
}

// ── ESPN API Deserialization ─────────────────────────────────────────

#[derive(Deserialize)]
struct EspnScoreboardBody {
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Deserialize)]
struct EspnEvent {
    #[serde(default)]
    status: Option<EspnStatus>,
    #[serde(default)]
    competitions: Vec<EspnCompetition>,
}

#[derive(Deserialize)]
struct EspnStatus {
    #[serde(rename = "type", default)]
    status_type: Option<EspnStatusType>,
}

#[derive(Deserialize)]
struct EspnStatusType {
    #[serde(default)]
    state: Option<String>,
}

#[derive(Deserialize)]
struct EspnCompetition {
    #[serde(default)]
    competitors: Vec<EspnCompetitor>,
}

#[derive(Deserialize)]
struct EspnCompetitor {
    #[serde(rename = "homeAway", default)]
    home_away: Option<String>,
    #[serde(default)]
    team: Option<EspnTeam>,
    #[serde(default)]
    score: Option<Value>,
}

#[derive(Deserialize)]
struct EspnTeam {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl EspnTeam {
    /// "Kansas City" + "Chiefs" -> "Kansas City Chiefs".
    fn display_name(&self) -> String {
        let location = self.location.as_deref().unwrap_or("").trim();
        let name = self.name.as_deref().unwrap_or("").trim();
        format!("{} {}", location, name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("score missing")]
    Missing,
    #[error("score not a non-negative integer: {0}")]
    Invalid(String),
}

/// Read a competitor score. ESPN sends strings ("24"); plain integers are
/// accepted as well.
pub fn parse_score(raw: Option<&Value>) -> Result<u32, ScoreError> {
    match raw {
        None | Some(Value::Null) => Err(ScoreError::Missing),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ScoreError::Missing),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| ScoreError::Invalid(s.clone())),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| ScoreError::Invalid(n.to_string())),
        Some(other) => Err(ScoreError::Invalid(other.to_string())),
    }
}

/// Completed games of one scoreboard day, in upstream order. Only a body that
/// is not a JSON object is an error.
pub fn parse_espn_results(json: &str) -> Result<Vec<ResultGame>> {
    let scoreboard: EspnScoreboardBody =
        serde_json::from_str(json).context("failed to parse ESPN scoreboard")?;

    let results = scoreboard
        .events
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<EspnEvent>(raw) {
            Ok(event) => to_result_game(event),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed scoreboard event");
                None
            }
        })
        .collect();
    Ok(results)
}

fn to_result_game(event: EspnEvent) -> Option<ResultGame> {
    let state = event
        .status
        .and_then(|s| s.status_type)
        .and_then(|t| t.state);
    if state.as_deref() != Some(STATE_POST) {
        return None;
    }

    let comp = event.competitions.first()?;

    let mut home: Option<(String, u32)> = None;
    let mut away: Option<(String, u32)> = None;
    for c in &comp.competitors {
        let name = c.team.as_ref().map(EspnTeam::display_name).unwrap_or_default();
        let score = parse_score(c.score.as_ref()).unwrap_or_else(|e| {
            tracing::debug!(team = %name, error = %e, "defaulting score to 0");
            0
        });
        match c.home_away.as_deref() {
            Some("home") => home = Some((name, score)),
            Some("away") => away = Some((name, score)),
            _ => {}
        }
    }

    let ((home_team, score_home), (away_team, score_away)) = (home?, away?);
    if home_team.is_empty() || away_team.is_empty() {
        tracing::debug!("skipping completed game: unresolved team name");
        return None;
    }

    Some(ResultGame {
        away_team,
        home_team,
        score_away,
        score_home,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitor(home_away: &str, location: &str, name: &str, score: Value) -> Value {
        serde_json::json!({
            "homeAway": home_away,
            "team": { "location": location, "name": name, "displayName": format!("{location} {name}") },
            "score": score
        })
    }

    fn scoreboard(state: &str, competitors: Vec<Value>) -> String {
        serde_json::json!({
            "events": [{
                "id": "401772900",
                "status": { "type": { "id": "3", "state": state } },
                "competitions": [{ "competitors": competitors }]
            }]
        })
        .to_string()
    }

    #[test]
    fn test_parse_completed_game() {
        let json = scoreboard(
            "post",
            vec![
                competitor("home", "Kansas City", "Chiefs", Value::from("31")),
                competitor("away", "Miami", "Dolphins", Value::from("24")),
            ],
        );
        let results = parse_espn_results(&json).unwrap();
        assert_eq!(
            results,
            vec![ResultGame {
                away_team: "Miami Dolphins".to_string(),
                home_team: "Kansas City Chiefs".to_string(),
                score_away: 24,
                score_home: 31,
            }]
        );
    }

    #[test]
    fn test_skips_games_not_finished() {
        for state in ["pre", "in"] {
            let json = scoreboard(
                state,
                vec![
                    competitor("home", "Kansas City", "Chiefs", Value::from("7")),
                    competitor("away", "Miami", "Dolphins", Value::from("3")),
                ],
            );
            assert!(parse_espn_results(&json).unwrap().is_empty(), "{state}");
        }
    }

    #[test]
    fn test_missing_status_or_competitions() {
        let json = r#"{"events":[
            {"competitions":[]},
            {"status":{"type":{"state":"post"}}},
            {"status":{"type":{"state":"post"}},"competitions":[]}
        ]}"#;
        assert!(parse_espn_results(json).unwrap().is_empty());
    }

    #[test]
    fn test_bad_score_defaults_to_zero() {
        let json = scoreboard(
            "post",
            vec![
                competitor("home", "Kansas City", "Chiefs", Value::from("N/A")),
                serde_json::json!({ "homeAway": "away", "team": { "location": "Miami", "name": "Dolphins" } }),
            ],
        );
        let results = parse_espn_results(&json).unwrap();
        assert_eq!(results[0].score_home, 0);
        assert_eq!(results[0].score_away, 0);
    }

    #[test]
    fn test_unresolved_team_skips_event() {
        let json = scoreboard(
            "post",
            vec![
                competitor("home", "  ", " ", Value::from("10")),
                competitor("away", "Miami", "Dolphins", Value::from("3")),
            ],
        );
        assert!(parse_espn_results(&json).unwrap().is_empty());

        let one_sided = scoreboard("post", vec![competitor("home", "Kansas City", "Chiefs", Value::from("10"))]);
        assert!(parse_espn_results(&one_sided).unwrap().is_empty());
    }

    #[test]
    fn test_name_parts_trimmed() {
        let json = scoreboard(
            "post",
            vec![
                competitor("home", " Kansas City ", "Chiefs ", Value::from("1")),
                serde_json::json!({ "homeAway": "away", "team": { "name": "Dolphins" }, "score": "2" }),
            ],
        );
        let results = parse_espn_results(&json).unwrap();
        assert_eq!(results[0].home_team, "Kansas City Chiefs");
        assert_eq!(results[0].away_team, "Dolphins");
    }

    #[test]
    fn test_empty_or_missing_events() {
        assert!(parse_espn_results(r#"{"events":[]}"#).unwrap().is_empty());
        assert!(parse_espn_results(r#"{"leagues":[]}"#).unwrap().is_empty());
        assert!(parse_espn_results("<html>").is_err());
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(Some(&Value::from("24"))), Ok(24));
        assert_eq!(parse_score(Some(&Value::from(" 7 "))), Ok(7));
        assert_eq!(parse_score(Some(&Value::from(31))), Ok(31));
        assert_eq!(parse_score(None), Err(ScoreError::Missing));
        assert_eq!(parse_score(Some(&Value::Null)), Err(ScoreError::Missing));
        assert_eq!(parse_score(Some(&Value::from(""))), Err(ScoreError::Missing));
        assert_eq!(
            parse_score(Some(&Value::from("N/A"))),
            Err(ScoreError::Invalid("N/A".to_string()))
        );
        assert!(parse_score(Some(&Value::from(-3))).is_err());
        assert!(parse_score(Some(&Value::from(2.5))).is_err());
    }

    #[test]
    fn test_espn_date_param() {
        let d = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        assert_eq!(espn_date_param(d), "20251103");
    }
}
