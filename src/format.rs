use crate::feed::types::{OddsGame, ResultGame};
use rust_decimal::{Decimal, RoundingStrategy};

pub const KICKOFF_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Two decimals, comma separator: 3.475 -> "3,48", 1.1 -> "1,10".
pub fn fcomma(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string().replace('.', ",")
}

/// `14.11.2025 02:10 | Miami Dolphins : Kansas City Chiefs | 3,48 | 1,36`
pub fn format_odds_line(game: &OddsGame) -> String {
    format!(
        "{} | {} : {} | {} | {}",
        game.kickoff_local.format(KICKOFF_FORMAT),
        game.away_team,
        game.home_team,
        fcomma(game.odds_away),
        fcomma(game.odds_home),
    )
}

/// `Miami Dolphins : Kansas City Chiefs 24:31`
pub fn format_result_line(game: &ResultGame) -> String {
    format!(
        "{} : {} {}:{}",
        game.away_team, game.home_team, game.score_away, game.score_home
    )
}
