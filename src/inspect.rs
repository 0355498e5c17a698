//! Archive inspection - what an importer will see in a bundle

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::info;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::assets::{collect_asset_refs, mime_for_path};
use crate::bundle::{io_error, BundleError};
use crate::config::BundleConfig;
use crate::hashing::sha256_hex;
use crate::validation::{ValidationReport, Validator};

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveAsset {
    pub path: String,
    pub mime: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSummary {
    pub archive: PathBuf,
    pub schema_sha256: String,
    pub slide_count: usize,
    pub validation: ValidationReport,
    pub assets: Vec<ArchiveAsset>,
    /// References in the schema with no matching archive entry.
    pub missing: Vec<String>,
}

pub fn inspect_archive(
    path: &Path,
    validator: &Validator,
    config: &BundleConfig,
) -> Result<ArchiveSummary, BundleError> {
    let file = File::open(path).map_err(io_error(path))?;
    let mut archive = ZipArchive::new(file)?;

    let schema_text = {
        let mut entry = match archive.by_name(&config.schema_entry) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(BundleError::MissingSchemaEntry(config.schema_entry.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut text = String::new();
        entry.read_to_string(&mut text).map_err(io_error(path))?;
        text
    };

    let entry_path = path.join(&config.schema_entry);
    let document: Value = serde_json::from_str(&schema_text).map_err(|source| BundleError::InvalidJson {
        path: entry_path.clone(),
        source,
    })?;
    if !document.is_object() {
        return Err(BundleError::NotAnObject(entry_path));
    }

    let validation = validator.validate(&document);

    let mut assets = Vec::new();
    let mut names = BTreeSet::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_dir() || !entry.name().starts_with(&config.asset_prefix) {
            continue;
        }
        names.insert(entry.name().to_string());
        assets.push(ArchiveAsset {
            path: entry.name().to_string(),
            mime: mime_for_path(entry.name()).to_string(),
            size: entry.size(),
        });
    }
    assets.sort_by(|a, b| a.path.cmp(&b.path));

    let missing: Vec<String> = collect_asset_refs(&document, &config.asset_prefix)
        .into_iter()
        .filter(|r| !names.contains(r))
        .collect();

    let slide_count = document
        .get("slides")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    info!(
        archive = %path.display(),
        valid = validation.is_valid(),
        assets = assets.len(),
        missing = missing.len(),
        "inspected carousel bundle"
    );

    Ok(ArchiveSummary {
        archive: path.to_path_buf(),
        schema_sha256: sha256_hex(schema_text.as_bytes()),
        slide_count,
        validation,
        assets,
        missing,
    })
}
