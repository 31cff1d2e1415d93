//! Platform configuration.

use std::env;
use std::path::PathBuf;

use skald_codegen::{CodegenOptions, DEFAULT_LITERAL_HASH_THRESHOLD};

/// Environment variable overriding the platform directory.
pub const PLATFORM_DIR_ENV: &str = "SKALD_PLATFORM_DIR";

/// Where descriptors live and how code is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Directory holding `<backend>.config` descriptors.
    pub platform_dir: PathBuf,
    /// Literal length above which symbol names are hashed.
    pub literal_hash_threshold: usize,
}

impl PlatformConfig {
    /// Use `platform_dir` with default codegen settings.
    pub fn new(platform_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform_dir: platform_dir.into(),
            literal_hash_threshold: DEFAULT_LITERAL_HASH_THRESHOLD,
        }
    }

    /// Resolve the platform directory from `SKALD_PLATFORM_DIR`, falling
    /// back to `~/.skald/platforms`, then `./platforms`.
    pub fn from_env() -> Self {
        let dir = env::var_os(PLATFORM_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".skald").join("platforms")))
            .unwrap_or_else(|| PathBuf::from("platforms"));
        Self::new(dir)
    }

    /// Override the literal hashing threshold.
    pub fn with_literal_hash_threshold(mut self, threshold: usize) -> Self {
        self.literal_hash_threshold = threshold;
        self
    }

    /// Code-generation options derived from this config.
    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            literal_hash_threshold: self.literal_hash_threshold,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
