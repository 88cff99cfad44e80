//! CLI argument definitions for the autotask server.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// autotask - runs catalogued automation tasks inside a sandbox directory.
#[derive(Parser, Debug)]
#[command(name = "autotask", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Address to bind the API server to.
    #[arg(short = 'b', long = "bind")]
    pub bind: Option<String>,

    /// Sandbox root every action is confined to.
    #[arg(short = 's', long = "sandbox-root")]
    pub sandbox_root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > AUTOTASK_CONFIG env var > ./autotask.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("AUTOTASK_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("autotask.toml")
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > AUTOTASK_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("AUTOTASK_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        config_port
    }

    /// Resolve the sandbox root.
    ///
    /// Priority: --sandbox-root flag > AUTOTASK_SANDBOX env var.
    /// Returns `None` if neither is set (use the config value).
    pub fn resolve_sandbox_root(&self) -> Option<String> {
        if let Some(ref p) = self.sandbox_root {
            return Some(p.to_string_lossy().to_string());
        }
        std::env::var("AUTOTASK_SANDBOX")
            .ok()
            .filter(|p| !p.is_empty())
    }

    pub fn resolve_bind_addr(&self) -> Option<String> {
        self.bind.clone()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_take_priority() {
        let args = CliArgs::parse_from([
            "autotask",
            "--config",
            "/etc/autotask.toml",
            "--port",
            "9001",
            "--sandbox-root",
            "/srv/data",
            "-l",
            "debug",
        ]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/etc/autotask.toml"));
        assert_eq!(args.resolve_port(8000), 9001);
        assert_eq!(args.resolve_sandbox_root().as_deref(), Some("/srv/data"));
        assert_eq!(args.resolve_log_level().as_deref(), Some("debug"));
    }

    #[test]
    fn test_no_flags_leave_overrides_unset() {
        let args = CliArgs::parse_from(["autotask"]);
        assert!(args.resolve_log_level().is_none());
        assert!(args.resolve_bind_addr().is_none());
    }
}
