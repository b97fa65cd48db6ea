use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_FILE: &str = ".env";

/// Placeholder shipped in sample configs; treated the same as a missing key.
pub const API_KEY_PLACEHOLDER: &str = "DEIN API-KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub odds_feed: OddsFeedConfig,
    #[serde(default)]
    pub score_feed: ScoreFeedConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_timezone", deserialize_with = "deserialize_tz")]
    pub timezone: Tz,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OddsFeedConfig {
    #[serde(default = "default_odds_base_url")]
    pub base_url: String,
    #[serde(default = "default_sport")]
    pub sport: String,
    #[serde(default = "default_regions")]
    pub regions: String,
    /// Comma-separated bookmaker keys; empty means every bookmaker in the region.
    #[serde(default)]
    pub bookmakers: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_odds_base_url() -> String {
    "https://api.the-odds-api.com".to_string()
}
fn default_sport() -> String {
    "americanfootball_nfl".to_string()
}
fn default_regions() -> String {
    "eu".to_string()
}
fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for OddsFeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_odds_base_url(),
            sport: default_sport(),
            regions: default_regions(),
            bookmakers: String::new(),
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoreFeedConfig {
    #[serde(default = "default_espn_api_url")]
    pub espn_api_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_espn_api_url() -> String {
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl/scoreboard".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (NFL-Results-Script)".to_string()
}

impl Default for ScoreFeedConfig {
    fn default() -> Self {
        Self {
            espn_api_url: default_espn_api_url(),
            user_agent: default_user_agent(),
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_odds_prefix")]
    pub odds_prefix: String,
    #[serde(default = "default_results_prefix")]
    pub results_prefix: String,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}
fn default_odds_prefix() -> String {
    "NFL_Quoten_Week".to_string()
}
fn default_results_prefix() -> String {
    "NFL_Ergebnisse_Week".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            odds_prefix: default_odds_prefix(),
            results_prefix: default_results_prefix(),
        }
    }
}

fn default_timezone() -> Tz {
    chrono_tz::Europe::Berlin
}

fn deserialize_tz<'de, D>(deserializer: D) -> std::result::Result<Tz, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse::<Tz>()
        .map_err(|_| serde::de::Error::custom(format!("unknown time zone: {}", name)))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odds_feed: OddsFeedConfig::default(),
            score_feed: ScoreFeedConfig::default(),
            output: OutputConfig::default(),
            timezone: default_timezone(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Like `load`, but a missing file yields the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for (key, value) in parse_env_lines(content) {
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }

    /// The-odds-api key from `ODDS_API_KEY`. `None` when unset, empty, or
    /// still the sample placeholder.
    pub fn odds_api_key() -> Option<String> {
        std::env::var("ODDS_API_KEY")
            .ok()
            .map(|k| sanitize_key(&k))
            .filter(|k| is_usable_key(k))
    }
}

pub fn is_usable_key(key: &str) -> bool {
    !key.is_empty() && key != API_KEY_PLACEHOLDER
}

fn parse_env_lines(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content.lines().filter_map(|line| {
        let line = line.trim().trim_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim().trim_matches('"').trim_matches('\'')))
    })
}

/// Strip carriage returns, BOM, and other invisible chars from a key value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.odds_feed.sport, "americanfootball_nfl");
        assert_eq!(config.odds_feed.regions, "eu");
        assert_eq!(config.score_feed.request_timeout_ms, 20_000);
        assert_eq!(config.output.odds_prefix, "NFL_Quoten_Week");
        assert_eq!(config.output.results_prefix, "NFL_Ergebnisse_Week");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml(
            r#"
            timezone = "America/New_York"

            [odds_feed]
            regions = "us"
            bookmakers = "pinnacle,betfair_ex_eu"

            [output]
            directory = "out"
            "#,
        )
        .unwrap();
        assert_eq!(config.timezone, chrono_tz::America::New_York);
        assert_eq!(config.odds_feed.regions, "us");
        assert_eq!(config.odds_feed.bookmakers, "pinnacle,betfair_ex_eu");
        assert_eq!(config.odds_feed.base_url, "https://api.the-odds-api.com");
        assert_eq!(config.output.directory, PathBuf::from("out"));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        assert!(Config::from_toml(r#"timezone = "Mars/Olympus""#).is_err());
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert!(config.score_feed.espn_api_url.contains("scoreboard"));
    }

    #[test]
    fn test_env_lines() {
        let parsed: Vec<_> =
            parse_env_lines("# comment\n\nODDS_API_KEY=\"abc\"\r\nOTHER = 'x'\nbroken\n").collect();
        assert_eq!(parsed, vec![("ODDS_API_KEY", "abc"), ("OTHER", "x")]);
    }

    #[test]
    fn test_placeholder_key_is_not_usable() {
        assert!(!is_usable_key(""));
        assert!(!is_usable_key(API_KEY_PLACEHOLDER));
        assert!(is_usable_key("0123abcd"));
        assert_eq!(sanitize_key("\u{feff}abc\r\n"), "abc");
    }
}
