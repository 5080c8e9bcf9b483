use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// One row of the per-line dataset: a single line of code as of the
/// snapshot, blamed to the commit that last touched it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRecord {
    pub commit_id: String,
    pub file: String,
    /// 1-based position within `file`.
    pub line: u32,
    pub depth: u32,
    pub length: u32,
    /// Language / extension tag, the `type` column.
    pub kind: String,
    pub author: String,
    pub datetime: DateTime<FixedOffset>,
    pub timezone: String,
    pub hour_fraction: f64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: field `{field}` is not a non-negative integer: {value:?}")]
    BadInteger {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row}: line numbers start at 1, got 0")]
    ZeroLine { row: usize },
    #[error("row {row}: cannot parse timestamp {value:?}")]
    BadTimestamp { row: usize, value: String },
}

// Raw shape of a CSV row. Numbers stay strings here so a bad cell can be
// reported with its row and column instead of a generic serde message.
#[derive(Debug, Deserialize)]
struct RawRow {
    commit: String,
    author: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    datetime: String,
    line: String,
    depth: String,
    length: String,
    file: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Hour of day plus minutes as a fraction, in the timestamp's own offset.
pub fn hour_fraction(datetime: &DateTime<FixedOffset>) -> f64 {
    datetime.hour() as f64 + datetime.minute() as f64 / 60.0
}

fn parse_count(row: usize, field: &'static str, value: &str) -> Result<u32, LoadError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| LoadError::BadInteger {
            row,
            field,
            value: value.to_string(),
        })
}

fn parse_timestamp(row: usize, raw: &RawRow) -> Result<DateTime<FixedOffset>, LoadError> {
    let candidate = if raw.datetime.trim().is_empty() {
        format!("{}T{}{}", raw.date.trim(), raw.time.trim(), raw.timezone.trim())
    } else {
        raw.datetime.trim().to_string()
    };
    DateTime::parse_from_rfc3339(&candidate).map_err(|_| LoadError::BadTimestamp {
        row,
        value: candidate,
    })
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<LineRecord, LoadError> {
        let line = parse_count(row, "line", &self.line)?;
        if line == 0 {
            return Err(LoadError::ZeroLine { row });
        }
        let depth = parse_count(row, "depth", &self.depth)?;
        let length = parse_count(row, "length", &self.length)?;
        let datetime = parse_timestamp(row, &self)?;
        let timezone = if self.timezone.trim().is_empty() {
            datetime.offset().to_string()
        } else {
            self.timezone.trim().to_string()
        };
        Ok(LineRecord {
            commit_id: self.commit,
            file: self.file,
            line,
            depth,
            length,
            kind: self.kind,
            author: self.author,
            hour_fraction: hour_fraction(&datetime),
            datetime,
            timezone,
        })
    }
}

/// Parses every row of a CSV source. The first bad row aborts the load.
/// `on_row` is called after each successfully parsed row.
pub fn read_records<R: Read>(
    source: R,
    mut on_row: impl FnMut(usize),
) -> Result<Vec<LineRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(source);
    let mut records = Vec::new();
    for (idx, raw) in reader.deserialize::<RawRow>().enumerate() {
        // Row numbers as a spreadsheet shows them: the header is row 1.
        let row = idx + 2;
        records.push(raw?.into_record(row)?);
        on_row(records.len());
    }
    log::debug!("parsed {} line records", records.len());
    Ok(records)
}

pub fn load_records(path: &Path) -> Result<Vec<LineRecord>, LoadError> {
    let file = std::fs::File::open(path)?;
    read_records(file, |_| {})
}
