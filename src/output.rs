use crate::week::WeekRange;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `{prefix}_{start}_bis_{end}.txt` with ISO dates.
pub fn week_file_name(prefix: &str, week: &WeekRange) -> String {
    format!(
        "{}_{}_bis_{}.txt",
        prefix,
        week.start.format("%Y-%m-%d"),
        week.end.format("%Y-%m-%d")
    )
}

/// Write one line per record into `dir`, replacing any earlier file for the
/// same week. Returns the path written.
pub fn write_lines<I, S>(lines: I, prefix: &str, week: &WeekRange, dir: &Path) -> Result<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = dir.join(week_file_name(prefix, week));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut count = 0usize;
    for line in lines {
        writeln!(writer, "{}", line.as_ref())
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        count += 1;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    tracing::info!(path = %path.display(), lines = count, "output written");
    Ok(path)
}
