//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Staging configuration
    pub staging: StagingConfig,
    /// External tool configuration
    pub tools: ToolConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Staging configuration
#[derive(Debug, Clone)]
pub struct StagingConfig {
    /// Base directory under which per-request staging areas are created
    pub base_dir: PathBuf,
}

/// External tool configuration
///
/// Binary names are configurable so tests (and unusual installs) can point
/// the invoker at a different executable.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Timeout for conversion and compression runs (in seconds)
    pub timeout_secs: u64,
    /// LibreOffice binary used for office format conversion
    pub soffice_bin: String,
    /// Ghostscript binary used for PDF recompression
    pub ghostscript_bin: String,
    /// qpdf binary used for PDF encryption/decryption
    pub qpdf_bin: String,
    /// Poppler binary used to rasterize PDF pages to JPEG
    pub pdftoppm_bin: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            staging: StagingConfig {
                base_dir: env::var_os("STAGING_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(env::temp_dir),
            },
            tools: ToolConfig {
                timeout_secs: env::var("TOOL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(120),
                soffice_bin: env::var("SOFFICE_BIN").unwrap_or_else(|_| "soffice".to_string()),
                ghostscript_bin: env::var("GS_BIN").unwrap_or_else(|_| "gs".to_string()),
                qpdf_bin: env::var("QPDF_BIN").unwrap_or_else(|_| "qpdf".to_string()),
                pdftoppm_bin: env::var("PDFTOPPM_BIN")
                    .unwrap_or_else(|_| "pdftoppm".to_string()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
