use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod browser;
mod config;
mod handler;
mod http;
mod logger;
mod server;

use config::FilesConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The serving directory is wherever the binary lives; all published
    // files and the optional config.toml sit next to it.
    let serving_dir = resolve_serving_dir()?;
    std::env::set_current_dir(&serving_dir)?;

    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Required-file preflight: report and exit before binding anything
    let missing = missing_required_files(&cfg.files, &serving_dir);
    if !missing.is_empty() {
        logger::log_missing_files(&missing);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg, serving_dir))
}

async fn async_main(
    cfg: config::Config,
    serving_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    // Bind failure (port in use, permission denied) is fatal
    let listener = server::create_listener(addr)?;

    let sizes = required_file_sizes(&cfg.files, &serving_dir);
    logger::log_server_start(&cfg, &serving_dir, &sizes);

    browser::open_landing_page(&browser::SystemBrowser, &cfg.landing_page_url());

    let shutdown = Arc::new(tokio::sync::Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    let state = Arc::new(config::ServerState::new(cfg));
    server::run(listener, state, shutdown).await
}

/// Directory containing the executable
fn resolve_serving_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "executable has no parent directory",
        )
    })
}

/// Names of required files absent from the serving directory
fn missing_required_files(files: &FilesConfig, dir: &Path) -> Vec<String> {
    files
        .required()
        .into_iter()
        .filter(|name| !dir.join(name).is_file())
        .map(ToString::to_string)
        .collect()
}

/// Sizes of the required files, in report order, for the startup banner
fn required_file_sizes(files: &FilesConfig, dir: &Path) -> Vec<(String, u64)> {
    files
        .required()
        .into_iter()
        .map(|name| {
            let size = std::fs::metadata(dir.join(name)).map_or(0, |m| m.len());
            (name.to_string(), size)
        })
        .collect()
}
