use crate::item::{CleanText, Item, ItemId, UNKNOWN_GENRE};
use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use time::macros::{date, format_description};
use time::Date;

/// Columns a catalog file must carry.
pub const REQUIRED_COLUMNS: [&str; 7] =
    ["title", "listed_in", "description", "director", "cast", "duration", "date_added"];

/// Date assigned to rows with a missing or unparseable `date_added`.
pub const SENTINEL_DATE: Date = date!(1900 - 01 - 01);

lazy_static! {
    static ref DIGITS: Regex = Regex::new(r"\d+").expect("valid regex");
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    listed_in: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    cast: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    date_added: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    release_year: Option<String>,
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Item>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening catalog {}", path.display()))?;
    load_reader(f).with_context(|| format!("reading catalog {}", path.display()))
}

pub fn load_reader<R: Read>(reader: R) -> Result<Vec<Item>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("catalog is missing required columns: {}", missing.join(", "));
    }

    let mut items = Vec::new();
    for (row, record) in rdr.deserialize::<RawRecord>().enumerate() {
        let raw = record.with_context(|| format!("malformed record at row {}", row + 1))?;
        items.push(clean_record(items.len() as ItemId, raw));
    }
    tracing::debug!(items = items.len(), "catalog rows loaded");
    Ok(items)
}

fn field(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn clean_record(id: ItemId, raw: RawRecord) -> Item {
    let title = field(raw.title);
    let listed_in = field(raw.listed_in);
    let description = field(raw.description);
    let director = field(raw.director);
    let cast = field(raw.cast);
    let duration = field(raw.duration);
    let date_added = field(raw.date_added);

    let genre_tags = if listed_in.is_empty() {
        vec![UNKNOWN_GENRE.to_string()]
    } else {
        listed_in.split(", ").map(|s| s.to_string()).collect()
    };

    let clean = CleanText {
        genre: listed_in.to_lowercase().replace(',', " ").replace('&', "and"),
        description: description.to_lowercase(),
        director: clear_placeholder(director.to_lowercase(), "unknown director"),
        cast: clear_placeholder(cast.to_lowercase(), "unknown cast"),
    };

    Item {
        id,
        title,
        listed_in,
        genre_tags,
        description,
        director,
        cast,
        duration_minutes: parse_duration(&duration),
        is_tv_show: duration.contains("Season"),
        date_added: parse_date(&date_added),
        kind: field(raw.kind),
        country: field(raw.country),
        rating: field(raw.rating),
        release_year: field(raw.release_year).parse().ok(),
        clean,
    }
}

fn clear_placeholder(value: String, placeholder: &str) -> String {
    if value == placeholder {
        String::new()
    } else {
        value
    }
}

/// First run of digits in a duration such as "90 min" or "2 Seasons".
pub fn parse_duration(raw: &str) -> u32 {
    DIGITS
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub fn parse_date(raw: &str) -> Date {
    let raw = raw.trim();
    if raw.is_empty() {
        return SENTINEL_DATE;
    }
    let long = format_description!(
        "[month repr:long case_sensitive:false] [day padding:none], [year]"
    );
    let short = format_description!(
        "[month repr:short case_sensitive:false] [day padding:none], [year]"
    );
    let iso = format_description!("[year]-[month]-[day]");
    Date::parse(raw, long)
        .or_else(|_| Date::parse(raw, short))
        .or_else(|_| Date::parse(raw, iso))
        .unwrap_or(SENTINEL_DATE)
}
