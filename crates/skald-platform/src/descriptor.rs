//! Per-backend target descriptors.
//!
//! A descriptor is a `<id>.config` file in the platform directory holding
//! `KEY=value` lines. Two keys are recognized:
//!
//! - `PLATFORM_LOWERING_CONFIG`: stages appended to the lowering pipeline
//! - `CODEGEN_EMISSION`: the translation target
//!
//! Other lines are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

/// Pipeline every backend starts from.
pub const BASELINE_PIPELINE: &str = "canonicalize";

/// Descriptor key extending the lowering pipeline.
pub const LOWERING_KEY: &str = "PLATFORM_LOWERING_CONFIG";

/// Descriptor key naming the translation target.
pub const EMISSION_KEY: &str = "CODEGEN_EMISSION";

/// File extension of descriptor files.
pub const DESCRIPTOR_EXTENSION: &str = "config";

/// What a backend expects from lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// Comma-separated stage names.
    pub pipeline: String,
    /// Translation target; `None` if the descriptor sets none.
    pub codegen_target: Option<String>,
}

impl Default for TargetDescriptor {
    fn default() -> Self {
        Self {
            pipeline: BASELINE_PIPELINE.to_string(),
            codegen_target: None,
        }
    }
}

impl TargetDescriptor {
    /// Path of the descriptor for `backend` under `platform_dir`.
    pub fn path(platform_dir: &Path, backend: &str) -> PathBuf {
        platform_dir.join(format!("{backend}.{DESCRIPTOR_EXTENSION}"))
    }

    /// Read and parse the descriptor for `backend`.
    pub fn load(platform_dir: &Path, backend: &str) -> Result<Self, ConfigError> {
        let path = Self::path(platform_dir, backend);
        debug!(path = %path.display(), "reading target descriptor");
        let text = fs::read_to_string(&path)
            .map_err(|source| ConfigError::DescriptorUnreadable { path, source })?;
        Ok(Self::parse(&text))
    }

    /// Parse descriptor text.
    ///
    /// Every `PLATFORM_LOWERING_CONFIG` value is appended to the baseline
    /// pipeline with a comma, double quotes removed. The last
    /// `CODEGEN_EMISSION` wins.
    pub fn parse(text: &str) -> Self {
        let mut descriptor = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().replace('"', "");
            match key.trim() {
                LOWERING_KEY => {
                    descriptor.pipeline.push(',');
                    descriptor.pipeline.push_str(&value);
                }
                EMISSION_KEY => descriptor.codegen_target = Some(value),
                _ => {}
            }
        }
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptor() {
        let d = TargetDescriptor::parse(
            "# ionq\nPLATFORM_LOWERING_CONFIG=\"expand-controls,cz-gate-set-mapping\"\nCODEGEN_EMISSION=qir-base\nOTHER=1\n",
        );
        assert_eq!(d.pipeline, "canonicalize,expand-controls,cz-gate-set-mapping");
        assert_eq!(d.codegen_target.as_deref(), Some("qir-base"));
    }

    #[test]
    fn test_lowering_lines_accumulate() {
        let d = TargetDescriptor::parse(
            "PLATFORM_LOWERING_CONFIG=expand-controls\nPLATFORM_LOWERING_CONFIG=canonicalize\n",
        );
        assert_eq!(d.pipeline, "canonicalize,expand-controls,canonicalize");
        assert_eq!(d.codegen_target, None);
    }

    #[test]
    fn test_empty_descriptor_keeps_baseline() {
        assert_eq!(TargetDescriptor::parse(""), TargetDescriptor::default());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TargetDescriptor::load(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, ConfigError::DescriptorUnreadable { .. }));
    }
}
