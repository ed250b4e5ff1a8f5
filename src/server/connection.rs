// Connection handling module
// Serves each accepted connection on its own task

use crate::config::ServerState;
use crate::handler;
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// Handle a single connection in a spawned task.
///
/// Requests on the connection share nothing but the immutable server
/// state; a failed connection affects only itself.
pub fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<ServerState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(
                io,
                service_fn(move |req| {
                    let state = Arc::clone(&state);
                    async move { handler::handle_request(req, peer_addr, state).await }
                }),
            );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
