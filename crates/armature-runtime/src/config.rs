//! Serve options loading using figment.
//!
//! Options are merged from layered sources, later sources overriding earlier
//! ones on overlapping keys:
//!
//! 1. Built-in defaults
//! 2. The conventional options file (`armature.toml`) discovered in the
//!    search paths (current directory by default) — **best-effort**: a
//!    missing or unusable file contributes nothing and is never an error
//! 3. Environment variables (`ARMATURE_*`, `__` as section separator)
//! 4. Runtime-argument overrides (highest precedence)
//!
//! # Example
//!
//! ```rust,ignore
//! use armature_runtime::config::OptionsLoader;
//!
//! let options = OptionsLoader::new()
//!     .overrides(serde_json::json!({ "port": 8080 }))
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Conventional options file probed in the search paths.
pub const OPTIONS_FILE: &str = "armature.toml";

// ─── Schema ───────────────────────────────────────────────────────────────────

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug-level diagnostics.
    Debug,
    /// Standard operational logging (default).
    #[default]
    Info,
    /// Only warnings and errors.
    Warn,
    /// Only errors.
    Error,
}

impl LogLevel {
    /// Returns the lowercase level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing::Level`.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output (default).
    #[default]
    Compact,
    /// Full formatter output.
    Full,
    /// Multi-line human-friendly output.
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base log level (`RUST_LOG` overrides when set).
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

/// Merged configuration handed to the serve entry point.
///
/// Unknown keys are preserved in `extra` so host-specific options
/// participate in precedence merging without the core knowing their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeOptions {
    /// Bind address for the host server.
    pub address: String,
    /// Bind port for the host server.
    pub port: u16,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Host-specific options passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 3000,
            logging: LoggingConfig::default(),
            extra: Map::new(),
        }
    }
}

// ─── OptionsLoader ────────────────────────────────────────────────────────────

/// Layered options loader.
///
/// # Example
///
/// ```rust,ignore
/// let options = OptionsLoader::new()
///     .search_path("/etc/armature")
///     .overrides(runtime_opts)
///     .load()?;
/// ```
pub struct OptionsLoader {
    /// Search paths for the conventional options file.
    search_paths: Vec<PathBuf>,
    /// Specific options file to load (missing file becomes an error).
    options_file: Option<PathBuf>,
    /// Whether to load `ARMATURE_*` environment variables.
    load_env: bool,
    /// Runtime-argument overrides, highest precedence.
    overrides: Option<Value>,
}

impl Default for OptionsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsLoader {
    /// Creates a loader with default settings (probe the current directory,
    /// read environment variables, no overrides).
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
            options_file: None,
            load_env: true,
            overrides: None,
        }
    }

    /// Adds a search path for the conventional options file.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific options file to load.
    ///
    /// Unlike the conventional-file probe, a missing explicit file fails
    /// with [`ConfigError::FileNotFound`].
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.options_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Sets runtime-argument overrides; these win over every other source.
    pub fn overrides(mut self, overrides: Value) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Loads and returns the merged options.
    pub fn load(self) -> ConfigResult<ServeOptions> {
        let file = self.resolve_file()?;
        let figment = self.build_figment(file.as_deref());

        match figment.extract::<ServeOptions>() {
            Ok(options) => {
                debug!(
                    address = %options.address,
                    port = options.port,
                    logging_level = %options.logging.level,
                    "Options loaded"
                );
                Ok(options)
            }
            // The conventional-file probe is best-effort: retry without it.
            Err(e) if file.is_some() && self.options_file.is_none() => {
                warn!(
                    path = %file.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
                    error = %e,
                    "Discovered options file is not usable — ignoring it"
                );
                self.build_figment(None)
                    .extract()
                    .map_err(|e| ConfigError::Parse(e.to_string()))
            }
            Err(e) => Err(ConfigError::Parse(e.to_string())),
        }
    }

    /// Resolves which options file, if any, participates in the merge.
    fn resolve_file(&self) -> ConfigResult<Option<PathBuf>> {
        if let Some(path) = &self.options_file {
            if path.exists() {
                info!(path = %path.display(), "Loading options file");
                return Ok(Some(path.clone()));
            }
            return Err(ConfigError::FileNotFound(path.clone()));
        }

        for search_path in self.effective_search_paths() {
            let candidate = search_path.join(OPTIONS_FILE);
            if candidate.exists() {
                info!(path = %candidate.display(), "Loading options file");
                return Ok(Some(candidate));
            }
        }
        debug!("No options file found, proceeding without one");
        Ok(None)
    }

    fn effective_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            std::env::current_dir().into_iter().collect()
        } else {
            self.search_paths.clone()
        }
    }

    /// Builds the figment instance with all sources, lowest to highest.
    fn build_figment(&self, file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ServeOptions::default()));

        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }

        if self.load_env {
            figment = figment.merge(Env::prefixed("ARMATURE_").split("__"));
        }

        // A null override value means "no contribution from this source".
        if let Some(overrides) = self.overrides.as_ref().filter(|v| !v.is_null()) {
            figment = figment.merge(Serialized::defaults(overrides.clone()));
        }

        figment
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = OptionsLoader::new()
            .search_path("/nonexistent")
            .without_env()
            .load()
            .unwrap();
        assert_eq!(options.port, 3000);
        assert_eq!(options.address, "0.0.0.0");
        assert_eq!(options.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_discovered_file_contributes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(OPTIONS_FILE),
            "port = 4000\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let options = OptionsLoader::new()
            .search_path(dir.path())
            .without_env()
            .load()
            .unwrap();
        assert_eq!(options.port, 4000);
        assert_eq!(options.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(OPTIONS_FILE), "port = 4000\nregion = \"eu\"\n").unwrap();

        let options = OptionsLoader::new()
            .search_path(dir.path())
            .without_env()
            .overrides(json!({ "port": 5000 }))
            .load()
            .unwrap();
        // Overlapping key: override wins. Non-overlapping file key survives.
        assert_eq!(options.port, 5000);
        assert_eq!(options.extra.get("region"), Some(&json!("eu")));
    }

    #[test]
    fn test_env_beats_file_but_loses_to_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(OPTIONS_FILE, "port = 4000\naddress = \"127.0.0.1\"\n")?;
            jail.set_env("ARMATURE_PORT", "7000");
            jail.set_env("ARMATURE_LOGGING__LEVEL", "warn");

            let options = OptionsLoader::new()
                .search_path(jail.directory())
                .overrides(json!({ "address": "10.0.0.1" }))
                .load()
                .unwrap();

            // Env wins over the file, including nested `__` keys.
            assert_eq!(options.port, 7000);
            assert_eq!(options.logging.level, LogLevel::Warn);
            // Runtime overrides win over env and file.
            assert_eq!(options.address, "10.0.0.1");
            Ok(())
        });
    }

    #[test]
    fn test_unusable_discovered_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(OPTIONS_FILE), "port = \"not-a-port\"\n").unwrap();

        let options = OptionsLoader::new()
            .search_path(dir.path())
            .without_env()
            .load()
            .unwrap();
        assert_eq!(options.port, 3000);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = OptionsLoader::new()
            .file("/nonexistent/armature.toml")
            .without_env()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_extra_keys_round_trip() {
        let options = OptionsLoader::new()
            .search_path("/nonexistent")
            .without_env()
            .overrides(json!({ "replayMode": true }))
            .load()
            .unwrap();
        assert_eq!(options.extra.get("replayMode"), Some(&json!(true)));
    }
}
