// Server module entry point
// Listener construction, connection handling, accept loop, shutdown signal

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module keeps the file name via #[path]
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::run;
pub use signal::start_signal_handler;
