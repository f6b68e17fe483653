//! Citing-sentences training dataset generation
//!
//! Batch ETL, disconnected from the runtime workflow: walks a corpus of
//! per-paper text files whose sentences are separated by a fixed record
//! delimiter, labels each sentence by the presence of a citation marker,
//! strips the markers from the text, and writes a labeled CSV. The marker
//! pattern is the same one the live sentence filter uses.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::citation::{contains_citation, strip_citations};
use crate::error::Result;

/// Record separator between sentences in the raw corpus files
pub const SENTENCE_DELIMITER: &str = "\n============\n";

/// Name of the CSV file produced in the output directory
pub const DATASET_FILENAME: &str = "citing_sentences.csv";

/// Generate the labeled citing-sentences CSV from a corpus directory.
///
/// Every `.txt` file under `data_dir` is split on the record delimiter;
/// each record becomes one row with the marker-stripped sentence and a
/// boolean `citing` label. Returns the path of the written CSV.
pub fn generate_citing_sentences_dataset(data_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
    let files: Vec<PathBuf> = WalkDir::new(data_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext == "txt")
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    tracing::info!(count = files.len(), "found corpus files");

    let output_path = output_dir.join(DATASET_FILENAME);
    let mut writer = csv::Writer::from_path(&output_path)?;
    writer.write_record(["sentence", "citing"])?;

    let mut rows = 0usize;
    for file in files {
        let content = std::fs::read_to_string(&file)?;
        for sentence in content.split(SENTENCE_DELIMITER) {
            let citing = contains_citation(sentence);
            let stripped = strip_citations(sentence);
            writer.write_record([stripped.as_str(), if citing { "true" } else { "false" }])?;
            rows += 1;
        }
    }

    writer.flush()?;
    tracing::info!(rows, path = %output_path.display(), "dataset written");

    Ok(output_path)
}
