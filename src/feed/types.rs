use chrono::DateTime;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;

// Normalized records handed to the formatter (provider-agnostic).

/// One game with a complete moneyline pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsGame {
    pub kickoff_local: DateTime<Tz>,
    pub away_team: String,
    pub home_team: String,
    pub odds_away: Decimal, // decimal odds
    pub odds_home: Decimal, // decimal odds
}

/// One completed game with its final score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGame {
    pub away_team: String,
    pub home_team: String,
    pub score_away: u32,
    pub score_home: u32,
}

/// the-odds-api.com v4 response: top-level array of events.
/// Every field is optional; incomplete events are dropped by the parser.
#[derive(Debug, Deserialize)]
pub struct TheOddsApiEvent {
    #[serde(default)]
    pub commence_time: Option<String>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<TheOddsApiBookmaker>,
}

#[derive(Debug, Deserialize)]
pub struct TheOddsApiBookmaker {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub markets: Vec<TheOddsApiMarket>,
}

#[derive(Debug, Deserialize)]
pub struct TheOddsApiMarket {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<TheOddsApiOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct TheOddsApiOutcome {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// API usage quota info extracted from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiQuota {
    pub requests_used: u64,
    pub requests_remaining: u64,
}
