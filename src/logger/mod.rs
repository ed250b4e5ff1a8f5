//! Logger module
//!
//! Provides logging utilities for the download server including:
//! - Startup banner and missing-file reporting
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

/// Operational banner printed once the listener is bound
pub fn log_server_start(config: &Config, serving_dir: &Path, file_sizes: &[(String, u64)]) {
    let base = config.base_url();
    write_info("======================================");
    write_info("Test plan download server started");
    write_info(&format!("Serving files from: {}", serving_dir.display()));
    write_info(&format!("Server running at: {base}"));
    write_info(&format!(
        "Download page: {base}/{}",
        config.files.landing_page
    ));
    write_info(&format!(
        "Direct CSV download: {base}/{}",
        config.files.csv_report
    ));
    write_info(&format!(
        "Direct Markdown download: {base}/{}",
        config.files.markdown_report
    ));
    write_info("Available files for download:");
    for (name, size) in file_sizes {
        write_info(&format!("  {name} ({size} bytes)"));
    }
    write_info("Press Ctrl+C to stop the server");
    write_info("======================================\n");
}

/// Report missing required files; the listener is never bound in this case
pub fn log_missing_files(missing: &[String]) {
    write_error(&format!("Missing required files: {}", missing.join(", ")));
    write_error("Place the test plan files next to the server binary and restart.");
}

pub fn log_browser_opened(url: &str) {
    write_info(&format!("Opened browser at {url}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown() {
    write_info("\nServer stopped by user");
}
