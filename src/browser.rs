//! Browser launch module
//!
//! Best-effort opening of the landing page in the user's default
//! browser at startup. Failure never affects serving.

use crate::logger;
use std::io;
use std::process::{Command, Stdio};

/// Capability seam for opening a URL. Tests substitute a stub so no
/// process is spawned.
pub trait BrowserOpener {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opens URLs with the platform's default handler
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        let mut command = platform_open_command();
        command
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

#[cfg(target_os = "macos")]
fn platform_open_command() -> Command {
    Command::new("open")
}

#[cfg(target_os = "windows")]
fn platform_open_command() -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_open_command() -> Command {
    Command::new("xdg-open")
}

/// Open the landing page, logging a warning if it fails (headless
/// environment, no browser installed)
pub fn open_landing_page(opener: &dyn BrowserOpener, url: &str) {
    match opener.open(url) {
        Ok(()) => logger::log_browser_opened(url),
        Err(e) => logger::log_warning(&format!("Could not open browser automatically: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingOpener {
        opened: std::cell::RefCell<Vec<String>>,
    }

    impl BrowserOpener for RecordingOpener {
        fn open(&self, url: &str) -> io::Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    struct FailingOpener;

    impl BrowserOpener for FailingOpener {
        fn open(&self, _url: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no browser"))
        }
    }

    #[test]
    fn passes_url_to_opener() {
        let opener = RecordingOpener {
            opened: std::cell::RefCell::new(Vec::new()),
        };
        open_landing_page(&opener, "http://localhost:8000/test_plan_download.html");
        assert_eq!(
            opener.opened.borrow().as_slice(),
            ["http://localhost:8000/test_plan_download.html"]
        );
    }

    #[test]
    fn launch_failure_is_non_fatal() {
        // Only logs a warning; must not panic or propagate
        open_landing_page(&FailingOpener, "http://localhost:8000/test_plan_download.html");
    }
}
