use crate::config::OutputConfig;
use crate::feed::{OddsFeed, ScoreFeed};
use crate::pipeline::{export_odds, export_results, Export};
use crate::week::{parse_date_input, week_range, WeekRange};
use anyhow::Result;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Odds,
    Results,
    Exit,
}

pub fn parse_choice(raw: &str) -> Option<Choice> {
    match raw.trim() {
        "1" => Some(Choice::Odds),
        "2" => Some(Choice::Results),
        "3" => Some(Choice::Exit),
        _ => None,
    }
}

/// Interactive loop over the two exports. Operation failures are printed and
/// the loop returns to the menu; only terminal I/O errors end it early.
pub struct Menu {
    odds: Option<Box<dyn OddsFeed>>,
    scores: Box<dyn ScoreFeed>,
    output: OutputConfig,
}

impl Menu {
    /// `odds` is `None` when no usable API key is configured.
    pub fn new(odds: Option<Box<dyn OddsFeed>>, scores: Box<dyn ScoreFeed>, output: OutputConfig) -> Self {
        Self { odds, scores, output }
    }

    pub async fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        loop {
            print_menu(&mut out)?;
            let Some(line) = prompt(&mut input, &mut out, "Auswahl (1/2/3): ")? else {
                // stdin closed
                break;
            };

            let choice = match parse_choice(&line) {
                Some(Choice::Exit) => {
                    writeln!(out, "Beende Programm.")?;
                    break;
                }
                Some(choice) => choice,
                None => {
                    writeln!(out, "Ungültige Auswahl.")?;
                    continue;
                }
            };

            let Some(raw_date) = prompt(&mut input, &mut out, "Bitte Datum eingeben (TT.MM.JJJJ): ")? else {
                break;
            };
            let date = match parse_date_input(&raw_date) {
                Ok(d) => d,
                Err(e) => {
                    tracing::debug!(error = %e, "rejected date input");
                    writeln!(out, "Ungültiges Datum. Bitte Format TT.MM.JJJJ verwenden.")?;
                    continue;
                }
            };

            let week = week_range(date);
            writeln!(out, "Berechnete NFL-Week: Donnerstag–Dienstag {}", week)?;

            let completed = match choice {
                Choice::Odds => self.odds(&week, &mut out).await?,
                Choice::Results => self.results(&week, &mut out).await?,
                Choice::Exit => unreachable!("handled above"),
            };

            if completed && prompt(&mut input, &mut out, "\nWeiter mit Enter...")?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Returns whether a file was written.
    async fn odds<W: Write>(&mut self, week: &WeekRange, out: &mut W) -> Result<bool> {
        let Some(feed) = self.odds.as_mut() else {
            writeln!(
                out,
                "FEHLER: Kein gültiger API-Key gesetzt. Bitte ODDS_API_KEY in .env oder der Umgebung setzen."
            )?;
            return Ok(false);
        };

        match export_odds(feed.as_mut(), week, &self.output).await {
            Ok(Export::Written { path, count }) => {
                writeln!(out, "{} Quoten gespeichert in: {}", count, path.display())?;
                if let Some(quota) = feed.last_quota() {
                    writeln!(out, "Odds API: {} Anfragen verbleibend", quota.requests_remaining)?;
                }
                Ok(true)
            }
            Ok(Export::Empty) => {
                writeln!(out, "Keine Quoten für diese NFL-Week gefunden.")?;
                Ok(false)
            }
            Err(e) => {
                tracing::error!(%week, error = %format!("{:#}", e), "odds export failed");
                writeln!(out, "Fehler beim Holen der Quoten: {:#}", e)?;
                Ok(false)
            }
        }
    }

    async fn results<W: Write>(&mut self, week: &WeekRange, out: &mut W) -> Result<bool> {
        match export_results(self.scores.as_mut(), week, &self.output).await {
            Ok(Export::Written { path, count }) => {
                writeln!(out, "{} Ergebnisse gespeichert in: {}", count, path.display())?;
                writeln!(out, "Format der Zeilen: Awayteam : Hometeam AwayScore:HomeScore")?;
                Ok(true)
            }
            Ok(Export::Empty) => {
                writeln!(out, "Keine Ergebnisse für diese NFL-Week gefunden.")?;
                Ok(false)
            }
            Err(e) => {
                tracing::error!(%week, error = %format!("{:#}", e), "results export failed");
                writeln!(out, "Fehler beim Holen der Ergebnisse: {:#}", e)?;
                Ok(false)
            }
        }
    }
}

fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "========================================")?;
    writeln!(out, " NFL TXT TOOL (Week Donnerstag–Dienstag)")?;
    writeln!(out, "========================================")?;
    writeln!(out, "1) NFL-Quoten für eine Week holen und als TXT speichern")?;
    writeln!(out, "2) NFL-Ergebnisse für eine Week holen und als TXT speichern")?;
    writeln!(out, "3) Beenden")?;
    writeln!(out, "========================================")?;
    Ok(())
}

/// Print `label` and read one line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
