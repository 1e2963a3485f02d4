use crate::error::CadenceError;
use crate::service::record_ops::RecordOps;
use crate::service::validation::validate_insert;
use crate::types::records::RecordKind;
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path};
use tracing::{info, warn};

/// Contents of a seed file. Items stay untyped so each one goes through the
/// same validation as an API insert.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub directory: Vec<Value>,
    #[serde(default)]
    pub resources: Vec<Value>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub directory_inserted: usize,
    pub resources_inserted: usize,
    pub skipped: usize,
}

pub fn load_seed_file(path: &Path) -> Result<Option<SeedFile>, CadenceError> {
    if !path.exists() {
        info!(path = %path.display(), "seed file not found; skipping");
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let seed: SeedFile = serde_json::from_str(&contents)?;
    Ok(Some(seed))
}

/// Insert seed items into collections that are still empty. Invalid items
/// are logged and skipped.
pub async fn apply_seed(ops: &RecordOps, seed: &SeedFile) -> Result<SeedReport, CadenceError> {
    let mut report = SeedReport::default();

    if ops.storage().count_directory_entries().await? == 0 {
        for item in &seed.directory {
            if seed_item(ops, RecordKind::DirectoryEntry, item).await? {
                report.directory_inserted += 1;
            } else {
                report.skipped += 1;
            }
        }
    } else {
        info!("directory already populated; not seeding");
    }

    if ops.storage().count_resources().await? == 0 {
        for item in &seed.resources {
            if seed_item(ops, RecordKind::Resource, item).await? {
                report.resources_inserted += 1;
            } else {
                report.skipped += 1;
            }
        }
    } else {
        info!("resource library already populated; not seeding");
    }

    Ok(report)
}

/// `Ok(false)` when the item was invalid and skipped.
async fn seed_item(ops: &RecordOps, kind: RecordKind, item: &Value) -> Result<bool, CadenceError> {
    match validate_insert(kind, item) {
        Ok(input) => {
            ops.store_validated(input).await?;
            Ok(true)
        }
        Err(e) => {
            warn!(?kind, error = %e, "skipping invalid seed item");
            Ok(false)
        }
    }
}

/// Load `path` and seed empty collections from it.
pub async fn seed_from_path(ops: &RecordOps, path: &Path) -> Result<SeedReport, CadenceError> {
    match load_seed_file(path)? {
        Some(seed) => apply_seed(ops, &seed).await,
        None => Ok(SeedReport::default()),
    }
}
