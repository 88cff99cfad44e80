use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AutotaskError, Result};

/// Top-level configuration for the autotask service.
///
/// Loaded from `autotask.toml` unless the CLI names another file. Every section has
/// defaults so a partial (or empty) file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutotaskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub process: ProcessConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub datagen: DatagenConfig,
}

impl AutotaskConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AutotaskConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sandbox.root.trim().is_empty() {
            return Err(AutotaskError::Config(
                "sandbox.root must not be empty".to_string(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(AutotaskError::Config(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.process.timeout_secs == 0 {
            return Err(AutotaskError::Config(
                "process.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !self.llm.endpoint.starts_with("http://") && !self.llm.endpoint.starts_with("https://")
        {
            return Err(AutotaskError::Config(format!(
                "llm.endpoint must be an http(s) URL, got: {}",
                self.llm.endpoint
            )));
        }
        Ok(())
    }
}

/// Server and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// HTTP server port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// The directory every action reads from and writes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub root: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            root: "/data".to_string(),
        }
    }
}

impl SandboxConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }
}

/// Outbound HTTP settings shared by the fetch and LLM handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request ceiling in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 20 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External tool binaries and the ceiling on how long any of them may run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub timeout_secs: u64,
    pub python: String,
    pub npx: String,
    pub pandoc: String,
    pub git: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            python: "python3".to_string(),
            npx: "npx".to_string(),
            pandoc: "pandoc".to_string(),
            git: "git".to_string(),
        }
    }
}

impl ProcessConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote inference service used by the transcription action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-proxy-url/run".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 100,
            token_env: "AIPROXY_TOKEN".to_string(),
        }
    }
}

/// Data generation script fetched and run by `uv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatagenConfig {
    pub script_url: String,
}

impl Default for DatagenConfig {
    fn default() -> Self {
        Self {
            script_url: "https://raw.githubusercontent.com/sanand0/tools-in-data-science-public/tds-2025-01/project-1/datagen.py".to_string(),
        }
    }
}
