use csv::{ReaderBuilder, Trim, WriterBuilder};
use encoding_rs::Encoding;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::cleaner::{coerce_bids_count, normalize_skills};
use crate::dataset::errors::DatasetError;
use crate::dataset::model::{
    BUDGET_UNSPECIFIED, CLEAN_COLUMNS, ProjectRecord, RAW_COLUMNS, RawDataset, RawRecord,
    RawSkills, TIME_LEFT_UNKNOWN,
};

/// Columns a cleaned file must carry to be usable by the matcher.
const CLEAN_REQUIRED: [&str; 5] = ["title", "description", "skills", "url", "match_text"];

/// A file row. Absent columns and empty cells both read as `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    platform: Option<String>,
    category: Option<String>,
    title: Option<String>,
    description: Option<String>,
    skills: Option<String>,
    budget: Option<String>,
    time_left: Option<String>,
    bids_count: Option<String>,
    url: Option<String>,
    scraped_at: Option<String>,
    match_text: Option<String>,
}

impl From<CsvRow> for RawRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            platform: row.platform,
            category: row.category,
            title: row.title,
            description: row.description,
            skills: row.skills.map(RawSkills::Text),
            budget: row.budget,
            time_left: row.time_left,
            bids_count: row.bids_count,
            url: row.url,
            scraped_at: row.scraped_at,
            match_text: row.match_text,
        }
    }
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_raw_dataset(path: impl AsRef<Path>) -> Result<RawDataset, DatasetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let text = decode_to_utf8(&bytes)?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        records.push(RawRecord::from(row?));
    }

    debug!(rows = records.len(), columns = columns.len(), "read dataset");
    Ok(RawDataset::new(columns, records))
}

/// Read a cleaned dataset, as written by [`write_clean_dataset`].
pub fn read_clean_dataset(path: impl AsRef<Path>) -> Result<Vec<ProjectRecord>, DatasetError> {
    let dataset = read_raw_dataset(path)?;

    let missing: Vec<String> = CLEAN_REQUIRED
        .iter()
        .filter(|c| !dataset.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::Schema(missing));
    }

    Ok(dataset
        .records
        .into_iter()
        .map(|r| ProjectRecord {
            platform: r.platform.unwrap_or_default(),
            category: r.category.unwrap_or_default(),
            title: r.title.unwrap_or_default(),
            description: r.description.unwrap_or_default(),
            skills: normalize_skills(r.skills.as_ref()),
            budget: r.budget.unwrap_or_else(|| BUDGET_UNSPECIFIED.to_string()),
            time_left: r.time_left.unwrap_or_else(|| TIME_LEFT_UNKNOWN.to_string()),
            bids_count: coerce_bids_count(r.bids_count.as_deref()),
            url: r.url.unwrap_or_default(),
            scraped_at: r.scraped_at.unwrap_or_default(),
            match_text: r.match_text.unwrap_or_default(),
        })
        .collect())
}

#[instrument(skip_all, fields(path = %path.as_ref().display(), rows = records.len()))]
pub fn write_raw_dataset(path: impl AsRef<Path>, records: &[RawRecord]) -> Result<(), DatasetError> {
    let mut writer = open_writer(path.as_ref())?;
    writer.write_record(RAW_COLUMNS)?;

    for r in records {
        let skills = skills_cell(r.skills.as_ref())?;
        writer.write_record([
            cell(&r.platform),
            cell(&r.category),
            cell(&r.title),
            cell(&r.description),
            skills.as_str(),
            cell(&r.budget),
            cell(&r.time_left),
            cell(&r.bids_count),
            cell(&r.url),
            cell(&r.scraped_at),
        ])?;
    }

    writer.flush()?;
    info!("saved raw dataset");
    Ok(())
}

#[instrument(skip_all, fields(path = %path.as_ref().display(), rows = records.len()))]
pub fn write_clean_dataset(
    path: impl AsRef<Path>,
    records: &[ProjectRecord],
) -> Result<(), DatasetError> {
    let mut writer = open_writer(path.as_ref())?;
    writer.write_record(CLEAN_COLUMNS)?;

    for r in records {
        let skills = serde_json::to_string(&r.skills)?;
        let bids = r.bids_count.to_string();
        writer.write_record([
            r.platform.as_str(),
            r.category.as_str(),
            r.title.as_str(),
            r.description.as_str(),
            skills.as_str(),
            r.budget.as_str(),
            r.time_left.as_str(),
            bids.as_str(),
            r.url.as_str(),
            r.scraped_at.as_str(),
            r.match_text.as_str(),
        ])?;
    }

    writer.flush()?;
    info!("saved clean dataset");
    Ok(())
}

fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>, DatasetError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(WriterBuilder::new().from_path(path)?)
}

fn cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn skills_cell(skills: Option<&RawSkills>) -> Result<String, DatasetError> {
    Ok(match skills {
        Some(RawSkills::List(list)) => serde_json::to_string(list)?,
        Some(RawSkills::Text(text)) => text.clone(),
        None => String::new(),
    })
}

fn decode_to_utf8(bytes: &[u8]) -> Result<String, DatasetError> {
    // 1. Byte order mark
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    // 2. Plain UTF-8
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    // 3. Heuristic guess for legacy spreadsheet exports
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let guessed = detector.guess(None, true);
    debug!(encoding = guessed.name(), "guessed dataset encoding");
    decode_with(guessed, bytes)
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<String, DatasetError> {
    let (decoded, had_errors) = encoding.decode_without_bom_handling(bytes);

    if had_errors {
        return Err(DatasetError::Charset(format!(
            "failed to decode dataset with encoding: {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}
