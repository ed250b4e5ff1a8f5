// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Published files configuration
///
/// All three files must exist in the serving directory before the
/// listener binds.
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    pub csv_report: String,
    pub markdown_report: String,
    pub landing_page: String,
}

impl FilesConfig {
    /// Required files in report order: CSV report, Markdown report,
    /// landing page.
    pub fn required(&self) -> [&str; 3] {
        [&self.csv_report, &self.markdown_report, &self.landing_page]
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}
