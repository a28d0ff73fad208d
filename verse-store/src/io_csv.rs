//! CSV reader for the verse corpus.
//!
//! Expected header columns (others are ignored):
//! - `ID`: verse identifier
//! - `Chapter`: integer chapter number
//! - `Verse`: integer verse number
//! - `EngMeaning`: English meaning text

use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::verse::VerseEntry;

const REQUIRED_COLUMNS: [&str; 4] = ["ID", "Chapter", "Verse", "EngMeaning"];

/// Row shape of the dataset.
#[derive(Deserialize)]
struct VerseRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Chapter")]
    chapter: u32,
    #[serde(rename = "Verse")]
    verse: u32,
    #[serde(rename = "EngMeaning")]
    eng_meaning: String,
}

/// Reads the corpus strictly, keeping file order.
///
/// # Errors
/// - [`StoreError::Open`] if the file cannot be opened.
/// - [`StoreError::MissingColumn`] if a required header is absent.
/// - [`StoreError::Csv`] if any row fails strict deserialization.
/// - [`StoreError::EmptyCorpus`] if there are no rows.
pub fn read_verses(csv_path: impl AsRef<Path>) -> Result<Vec<VerseEntry>, StoreError> {
    let path = csv_path.as_ref();
    info!("Reading verse corpus: {:?}", path);

    let file = File::open(path).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_verses_from(file)
}

/// Same as [`read_verses`] over any reader.
pub fn read_verses_from<R: Read>(reader: R) -> Result<Vec<VerseEntry>, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(StoreError::MissingColumn(col));
        }
    }

    let mut out = Vec::new();
    for row in rdr.deserialize::<VerseRow>() {
        let r = row?;
        out.push(VerseEntry {
            id: r.id,
            chapter: r.chapter,
            verse: r.verse,
            eng_meaning: r.eng_meaning,
        });
    }

    if out.is_empty() {
        return Err(StoreError::EmptyCorpus);
    }

    debug!("Loaded {} verses", out.len());
    Ok(out)
}
