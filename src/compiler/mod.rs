//! The collection compiler.
//!
//! A linear pipeline of pure transformations over immutable values:
//! load metadata, scan record files, validate and normalize each record,
//! sort, serialize. The compiler is stateless; compiling unchanged
//! sources twice yields byte-identical artifacts, which is what makes
//! `check` meaningful as a CI gate.

pub mod normalize;
pub mod scanner;
pub mod serialize;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, trace};

use crate::error::{Result, SkcError};
use crate::utils::fs::{ensure_dir, read_optional_bytes};
use crate::variant::Variant;

use normalize::{NormalizeContext, normalize_record};

/// Fully-resolved inputs for one compilation.
///
/// Resolution (CLI flags, config file, variant defaults) happens at the
/// boundary; the compiler never consults ambient process state.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub meta_path: PathBuf,
    pub records_dir: PathBuf,
    pub out_path: PathBuf,
    /// JSON field the records are ordered by.
    pub sort_field: String,
}

/// The result of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub bytes: Vec<u8>,
    pub records: usize,
}

impl Compiled {
    #[must_use]
    pub fn digest(&self) -> String {
        serialize::digest(&self.bytes)
    }
}

pub struct Compiler {
    variant: &'static Variant,
    options: CompileOptions,
}

impl Compiler {
    #[must_use]
    pub fn new(variant: &'static Variant, options: CompileOptions) -> Self {
        Self { variant, options }
    }

    #[must_use]
    pub fn out_path(&self) -> &Path {
        &self.options.out_path
    }

    /// Compile metadata and records into the artifact byte sequence.
    ///
    /// The first invalid record aborts the whole compilation; nothing is
    /// written here, so a failed compile never leaves a partial artifact.
    pub fn compile(&self) -> Result<Compiled> {
        let metadata = self.load_metadata()?;
        let collection_id = metadata
            .get(self.variant.id_field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let ctx = NormalizeContext {
            collection_id,
            default_author: metadata.get("author").cloned(),
        };

        let paths = scanner::scan_records(&self.options.records_dir)?;
        let mut records = Vec::with_capacity(paths.len());
        for path in &paths {
            trace!(path = %path.display(), "loading record");
            let record = load_record(path)?;
            validate::validate_record(self.variant, path, &record, &ctx.collection_id)?;
            records.push(normalize_record(self.variant, &record, &ctx));
        }

        sort_records(&mut records, &self.options.sort_field, self.variant.id_field);

        let mut collection = metadata;
        collection.insert(
            self.variant.records_field.to_string(),
            Value::Array(records),
        );
        let bytes = serialize::to_artifact_bytes(&collection).map_err(|err| {
            SkcError::io(
                &self.options.out_path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, err),
            )
        })?;

        debug!(
            records = paths.len(),
            digest = %serialize::digest(&bytes),
            "compiled collection"
        );
        Ok(Compiled {
            bytes,
            records: paths.len(),
        })
    }

    /// Overwrite the artifact file unconditionally.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.options.out_path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_dir(parent)?;
            }
        }
        fs::write(&self.options.out_path, bytes)
            .map_err(|err| SkcError::io(&self.options.out_path, err))?;
        info!(path = %self.options.out_path.display(), "artifact written");
        Ok(())
    }

    /// Compare the on-disk artifact byte-for-byte against `bytes`.
    ///
    /// A missing artifact file reads as empty content, so it simply
    /// compares as stale rather than erroring.
    pub fn check(&self, bytes: &[u8]) -> Result<()> {
        let existing = read_optional_bytes(&self.options.out_path)?.unwrap_or_default();
        if existing != bytes {
            return Err(SkcError::StaleArtifact(self.options.out_path.clone()));
        }
        debug!(path = %self.options.out_path.display(), "artifact up to date");
        Ok(())
    }

    fn load_metadata(&self) -> Result<Map<String, Value>> {
        let path = &self.options.meta_path;
        let raw = fs::read_to_string(path).map_err(|err| SkcError::io(path, err))?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|err| SkcError::InvalidMetadata {
                path: path.clone(),
                reason: err.to_string(),
            })?;
        let Some(object) = value.as_object() else {
            return Err(SkcError::InvalidMetadata {
                path: path.clone(),
                reason: "expected a JSON object".to_string(),
            });
        };

        let id = object.get(self.variant.id_field).ok_or_else(|| {
            SkcError::InvalidMetadata {
                path: path.clone(),
                reason: format!("missing required field {:?}", self.variant.id_field),
            }
        })?;
        if !id.is_string() {
            return Err(SkcError::InvalidMetadata {
                path: path.clone(),
                reason: format!("{} must be a string", self.variant.id_field),
            });
        }

        let tag = self
            .variant
            .type_fields
            .iter()
            .find_map(|field| object.get(*field))
            .ok_or_else(|| SkcError::InvalidMetadata {
                path: path.clone(),
                reason: format!(
                    "missing required field {}",
                    self.variant.type_field_label()
                ),
            })?;
        let actual = tag.as_str().unwrap_or_default();
        if actual != self.variant.collection_sentinel {
            return Err(SkcError::InvalidMetadata {
                path: path.clone(),
                reason: format!(
                    "type tag is {actual:?}, expected {:?}",
                    self.variant.collection_sentinel
                ),
            });
        }

        Ok(object.clone())
    }
}

fn load_record(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|err| SkcError::io(path, err))?;
    serde_json::from_str(&raw).map_err(|err| SkcError::MalformedRecord {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Total order: case-insensitive sort key (absent projects to the empty
/// string), ties broken by the case-insensitive primary identifier.
pub fn sort_records(records: &mut [Value], sort_field: &str, id_field: &str) {
    records.sort_by(|a, b| {
        key_of(a, sort_field)
            .cmp(&key_of(b, sort_field))
            .then_with(|| key_of(a, id_field).cmp(&key_of(b, id_field)))
    });
}

fn key_of(record: &Value, field: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase()
}
