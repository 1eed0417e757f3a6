//! Franchise dataset loader.
//!
//! A dataset is one CSV file with a header row. Columns are matched by name,
//! so extra columns and any column order are accepted. Cells that fail to
//! parse degrade to `None` instead of failing the row.

use std::cmp::Ordering;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;
use tracing::{debug, info};

use crate::error::DatasetError;

pub const REQUIRED_COLUMNS: [&str; 14] = [
    "title",
    "release_date",
    "production_budget",
    "box_office",
    "profit",
    "roi_percentage",
    "performance",
    "poster_url",
    "backdrop_url",
    "runtime",
    "tagline",
    "trailer",
    "sentiment_score",
    "comment",
];

/// "Mon DD, YYYY", e.g. `May 25, 1977`.
const RELEASE_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short case_sensitive:false] [day], [year]");
const RELEASE_DATE_UNPADDED: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short case_sensitive:false] [day padding:none], [year]");

/// One film. This is also the hover payload attached to every plotted marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub release_date: Option<Date>,
    /// `release_date` rendered back as "Mon DD, YYYY".
    pub formatted_release_date: Option<String>,
    pub production_budget: Option<f64>,
    pub box_office: Option<f64>,
    pub profit: Option<f64>,
    pub roi_percentage: Option<f64>,
    pub performance: Option<f64>,
    pub poster_url: String,
    pub backdrop_url: String,
    /// Minutes.
    pub runtime: Option<u32>,
    pub tagline: String,
    pub trailer: String,
    pub sentiment_score: Option<f64>,
    pub comment: String,
}

impl MovieRecord {
    /// Release date as seconds since the Unix epoch (midnight UTC).
    pub fn timestamp(&self) -> Option<f64> {
        self.release_date.map(date_timestamp)
    }
}

/// Rows of one franchise, ordered by release date (undated rows last).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<MovieRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows that have a parsed release date, in order.
    pub fn dated(&self) -> impl Iterator<Item = &MovieRecord> {
        self.records.iter().filter(|r| r.release_date.is_some())
    }

    pub fn undated_count(&self) -> usize {
        self.records.len() - self.dated().count()
    }
}

/// Cells absent from a short row deserialize as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    title: String,
    release_date: String,
    production_budget: String,
    box_office: String,
    profit: String,
    roi_percentage: String,
    performance: String,
    poster_url: String,
    backdrop_url: String,
    runtime: String,
    tagline: String,
    trailer: String,
    sentiment_score: String,
    comment: String,
}

impl From<RawRow> for MovieRecord {
    fn from(raw: RawRow) -> Self {
        let release_date = parse_release_date(&raw.release_date);
        Self {
            title: raw.title,
            formatted_release_date: release_date.and_then(format_release_date),
            release_date,
            production_budget: parse_number(&raw.production_budget),
            box_office: parse_number(&raw.box_office),
            profit: parse_number(&raw.profit),
            roi_percentage: parse_number(&raw.roi_percentage),
            performance: parse_number(&raw.performance),
            poster_url: raw.poster_url,
            backdrop_url: raw.backdrop_url,
            runtime: parse_runtime(&raw.runtime),
            tagline: raw.tagline,
            trailer: raw.trailer,
            sentiment_score: parse_number(&raw.sentiment_score),
            comment: raw.comment,
        }
    }
}

/// Read and parse the dataset at `path`. The file is read on every call.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(file)?;
    info!(
        "Loaded {} row(s) from {path:?} ({} without a parseable release date)",
        dataset.len(),
        dataset.undated_count()
    );
    Ok(dataset)
}

pub fn parse_dataset<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        records.push(MovieRecord::from(row?));
    }

    records.sort_by(|a, b| compare_release(a.release_date, b.release_date));
    debug!("Parsed {} row(s)", records.len());
    Ok(Dataset { records })
}

/// Ascending by date, undated rows last.
fn compare_release(a: Option<Date>, b: Option<Date>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn parse_release_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    Date::parse(raw, RELEASE_DATE_FORMAT)
        .or_else(|_| Date::parse(raw, RELEASE_DATE_UNPADDED))
        .ok()
}

pub fn format_release_date(date: Date) -> Option<String> {
    date.format(RELEASE_DATE_FORMAT).ok()
}

pub fn date_timestamp(date: Date) -> f64 {
    date.midnight().assume_utc().unix_timestamp() as f64
}

/// Lenient numeric coercion: tolerates `$`, `,` and `%` decoration; anything
/// else that doesn't parse to a finite number is `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_runtime(raw: &str) -> Option<u32> {
    parse_number(raw)
        .filter(|minutes| *minutes >= 0.0 && *minutes <= u32::MAX as f64)
        .map(|minutes| minutes.round() as u32)
}
