//! Configuration loading.
//!
//! An optional TOML file supplies per-variant path defaults so repeated
//! invocations don't need the full flag set. Precedence is CLI flag,
//! then config file, then the built-in variant defaults; resolution
//! happens once at the CLI boundary and the compiler only ever sees
//! fully-resolved paths.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SkcError};
use crate::variant::Variant;

const DEFAULT_CONFIG_FILE: &str = "skc.toml";

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub skills: VariantConfig,
    #[serde(default)]
    pub competencies: VariantConfig,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct VariantConfig {
    pub meta: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub sort_by: Option<String>,
}

impl Config {
    /// Load configuration from an explicit path, `SKC_CONFIG`, or
    /// `skc.toml` in the working directory. A missing file yields the
    /// built-in defaults; an unreadable or unparseable file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => std::env::var("SKC_CONFIG")
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from),
        };

        if !path.exists() {
            // Only an explicitly requested file is required to exist.
            if explicit.is_some() {
                return Err(SkcError::io(
                    &path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                ));
            }
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|err| SkcError::io(&path, err))?;
        toml::from_str(&raw)
            .map_err(|err| SkcError::InvalidArgument(format!("config {}: {err}", path.display())))
    }

    /// The config section for one record family.
    #[must_use]
    pub fn variant(&self, variant: &Variant) -> &VariantConfig {
        if variant.name == "competencies" {
            &self.competencies
        } else {
            &self.skills
        }
    }
}
