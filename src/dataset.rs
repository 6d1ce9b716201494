//! CSV dataset of question/answer pairs.
//!
//! Loaded once at startup (and on explicit reindex). Records are immutable
//! after load; a missing or unreadable dataset is fatal so the service never
//! serves from a silently-empty index.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One row of the dataset. Expected CSV header: `question,answer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
}

pub fn load_dataset(path: &Path) -> anyhow::Result<Vec<QaRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: QaRecord =
            row.with_context(|| format!("malformed row in {}", path.display()))?;
        if record.question.trim().is_empty() {
            continue;
        }
        records.push(record);
    }

    anyhow::ensure!(
        !records.is_empty(),
        "dataset {} contains no usable rows",
        path.display()
    );

    Ok(records)
}
