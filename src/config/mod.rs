// Configuration module entry point
// Builds the immutable startup configuration from defaults and an
// optional config.toml next to the binary

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};

// Re-export public types
pub use state::ServerState;
pub use types::{Config, FilesConfig};

impl Config {
    /// Load configuration from "config.toml" in the serving directory,
    /// falling back to built-in defaults for every missing key.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "localhost")?
            .set_default("server.port", 8000)?
            .set_default("files.csv_report", "test_plan.csv")?
            .set_default("files.markdown_report", "TEST_PLAN.md")?
            .set_default("files.landing_page", "test_plan_download.html")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve the listen address. The default host is the name
    /// `localhost`, so this goes through the resolver rather than
    /// `SocketAddr` parsing.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let authority = format!("{}:{}", self.server.host, self.server.port);
        authority
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address '{authority}': {e}"))?
            .next()
            .ok_or_else(|| format!("Address '{authority}' did not resolve"))
    }

    /// Base URL clients use to reach the server
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.server.host, self.server.port)
    }

    /// URL of the download landing page
    pub fn landing_page_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.files.landing_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> Config {
        // File name that never exists, so only defaults apply
        Config::load_from("config-defaults-for-tests").unwrap()
    }

    #[test]
    fn defaults_match_published_constants() {
        let cfg = default_config();
        assert_eq!(cfg.server.host, "localhost");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.files.csv_report, "test_plan.csv");
        assert_eq!(cfg.files.markdown_report, "TEST_PLAN.md");
        assert_eq!(cfg.files.landing_page, "test_plan_download.html");
        assert!(cfg.logging.access_log);
    }

    #[test]
    fn required_files_in_report_order() {
        let cfg = default_config();
        assert_eq!(
            cfg.files.required(),
            ["test_plan.csv", "TEST_PLAN.md", "test_plan_download.html"]
        );
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let cfg = default_config();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn landing_page_url_uses_configured_host() {
        let cfg = default_config();
        assert_eq!(
            cfg.landing_page_url(),
            "http://localhost:8000/test_plan_download.html"
        );
    }
}
