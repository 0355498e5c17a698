//! Bundler - Single Entry Point for Packaging
//!
//! CRITICAL: `bundle` always validates first. An invalid document never
//! reaches the archive writer.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::assets::{collect_asset_refs, mime_for_path};
use crate::config::{BundleConfig, CarouselConfig};
use crate::hashing::sha256_hex;
use crate::inspect::{inspect_archive, ArchiveSummary};
use crate::validation::{ValidationPolicy, ValidationReport, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {}", .path.display(), .source)]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),

    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("Strict mode rejected {} warning(s): {}", .0.len(), .0.join("; "))]
    StrictWarnings(Vec<String>),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Archive has no {0} entry")]
    MissingSchemaEntry(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BundleError {
    /// Failures caused by the document's content rather than the host.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, BundleError::ValidationFailed(_) | BundleError::StrictWarnings(_))
    }
}

pub(crate) fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BundleError + '_ {
    move |source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads and parses a schema document. Anything that is not a JSON object
/// is rejected here, before validation.
pub fn load_document(path: &Path) -> Result<Value, BundleError> {
    let content = fs::read_to_string(path).map_err(io_error(path))?;
    let document: Value = serde_json::from_str(&content).map_err(|source| BundleError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;
    if !document.is_object() {
        return Err(BundleError::NotAnObject(path.to_path_buf()));
    }
    Ok(document)
}

#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub schema_path: PathBuf,
    pub output_path: PathBuf,
    /// Directory that contains the `assets/` folder. Resolved from the schema
    /// location when absent.
    pub assets_root: Option<PathBuf>,
    pub policy: ValidationPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct BundledAsset {
    pub path: String,
    pub mime: String,
    pub size: u64,
    pub sha256: String,
    /// False for files packed from the assets folder without a reference.
    pub referenced: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BundleReport {
    pub output: PathBuf,
    pub engine_version: String,
    pub slide_count: usize,
    pub schema_sha256: String,
    pub assets: Vec<BundledAsset>,
    /// Referenced paths that could not be packed.
    pub missing: Vec<String>,
    /// Validation warnings carried by the bundled document.
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The bundler - validates, then packs a document with its assets.
pub struct Bundler {
    validator: Validator,
    config: BundleConfig,
}

impl Bundler {
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            validator: Validator::with_config(config.editorial),
            config: config.bundle,
        }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// This is the ONLY validation entry point for bundling.
    pub fn validate(&self, document: &Value) -> ValidationReport {
        self.validator.validate(document)
    }

    /// Referenced asset paths, as the archive will name them.
    pub fn asset_refs(&self, document: &Value) -> Vec<String> {
        collect_asset_refs(document, &self.config.asset_prefix)
    }

    /// Load, validate and pack `request.schema_path`.
    pub fn bundle(&self, request: &BundleRequest) -> Result<BundleReport, BundleError> {
        let document = load_document(&request.schema_path)?;
        let assets_root = match &request.assets_root {
            Some(root) => root.clone(),
            None => self.resolve_assets_root(&request.schema_path)?,
        };
        self.bundle_document(&document, &assets_root, &request.output_path, request.policy)
    }

    /// Pack an already-loaded document.
    ///
    /// CRITICAL: validation always runs here. No bypass possible.
    pub fn bundle_document(
        &self,
        document: &Value,
        assets_root: &Path,
        output: &Path,
        policy: ValidationPolicy,
    ) -> Result<BundleReport, BundleError> {
        let validation = self.validate(document);
        if !validation.is_valid() {
            return Err(BundleError::ValidationFailed(owned(validation.errors())));
        }
        if !validation.passes(policy) {
            return Err(BundleError::StrictWarnings(owned(validation.warnings())));
        }

        let refs = self.asset_refs(document);
        debug!(refs = refs.len(), root = %assets_root.display(), "resolving asset references");

        let (schema_json, assets, missing) =
            write_atomically(output, |file| self.write_archive(file, document, assets_root, refs))?;

        let slide_count = document
            .get("slides")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        info!(
            output = %output.display(),
            slides = slide_count,
            assets = assets.len(),
            missing = missing.len(),
            "carousel bundle written"
        );

        Ok(BundleReport {
            output: output.to_path_buf(),
            engine_version: ENGINE_VERSION.to_string(),
            slide_count,
            schema_sha256: sha256_hex(schema_json.as_bytes()),
            assets,
            missing,
            warnings: owned(validation.warnings()),
            created_at: Utc::now(),
        })
    }

    /// Schema entry first, then referenced assets, then (when configured)
    /// the unreferenced files of the assets folder.
    fn write_archive<W: Write + Seek>(
        &self,
        writer: W,
        document: &Value,
        assets_root: &Path,
        refs: Vec<String>,
    ) -> Result<(String, Vec<BundledAsset>, Vec<String>), BundleError> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let schema_json = serde_json::to_string_pretty(document)?;
        zip.start_file(self.config.schema_entry.as_str(), options)?;
        zip.write_all(schema_json.as_bytes())
            .map_err(io_error(Path::new(&self.config.schema_entry)))?;

        let mut assets = Vec::new();
        let mut missing = Vec::new();
        let mut packed = BTreeSet::new();

        for reference in refs {
            let source = assets_root.join(&reference);
            if !is_contained(&reference) || !source.is_file() {
                warn!(asset = %reference, "referenced asset not found");
                missing.push(reference);
                continue;
            }
            let asset = pack_file(&mut zip, options, &source, &reference, true)?;
            packed.insert(reference);
            assets.push(asset);
        }

        if self.config.include_unreferenced {
            let dir_name = self.config.asset_dir_name();
            for (name, source) in list_files(&assets_root.join(dir_name))? {
                let entry = format!("{dir_name}/{name}");
                if packed.contains(&entry) {
                    continue;
                }
                let asset = pack_file(&mut zip, options, &source, &entry, false)?;
                packed.insert(entry);
                assets.push(asset);
            }
        }

        zip.finish()?;
        Ok((schema_json, assets, missing))
    }

    /// Read back a bundle and validate the document it carries.
    pub fn inspect(&self, archive: &Path) -> Result<ArchiveSummary, BundleError> {
        inspect_archive(archive, &self.validator, &self.config)
    }

    /// The schema's own directory when it holds an assets folder, otherwise
    /// the working directory.
    fn resolve_assets_root(&self, schema_path: &Path) -> Result<PathBuf, BundleError> {
        let schema_dir = match schema_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if schema_dir.join(self.config.asset_dir_name()).is_dir() {
            return Ok(schema_dir);
        }
        std::env::current_dir().map_err(io_error(Path::new(".")))
    }
}

impl Default for Bundler {
    fn default() -> Self {
        Self::new(CarouselConfig::default())
    }
}

fn owned(messages: Vec<&str>) -> Vec<String> {
    messages.into_iter().map(str::to_string).collect()
}

/// Runs `write` against a temporary file next to `output` and moves it into
/// place only on success. On failure `output` is left untouched.
fn write_atomically<T>(
    output: &Path,
    write: impl FnOnce(&mut File) -> Result<T, BundleError>,
) -> Result<T, BundleError> {
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    let value = write(staged.as_file_mut())?;
    staged.persist(output).map_err(|e| BundleError::Io {
        path: output.to_path_buf(),
        source: e.error,
    })?;
    Ok(value)
}

/// Relative path made only of normal components: no `..`, no root.
fn is_contained(reference: &str) -> bool {
    Path::new(reference)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

fn pack_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    source: &Path,
    entry: &str,
    referenced: bool,
) -> Result<BundledAsset, BundleError> {
    let data = fs::read(source).map_err(io_error(source))?;
    zip.start_file(entry, options)?;
    zip.write_all(&data).map_err(io_error(source))?;
    Ok(BundledAsset {
        path: entry.to_string(),
        mime: mime_for_path(entry).to_string(),
        size: data.len() as u64,
        sha256: sha256_hex(&data),
        referenced,
    })
}

/// Regular files directly inside `dir`, sorted by name. A missing directory
/// yields nothing.
fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, BundleError> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            files.push((name.to_string(), path));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
