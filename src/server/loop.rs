// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop for the function host
///
/// Returns once `shutdown` is notified. Connections already being served are
/// left to the enclosing `LocalSet`.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = shutdown.notified() => {
                logger::log_shutdown("Shutdown signal received");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::function::SUCCESS_BODY;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_function_until_shutdown() {
        let cfg = Config::load_from("does-not-exist/config").unwrap();
        let state = Arc::new(AppState::new(&cfg));
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&shutdown),
                ));

                let ok = roundtrip(
                    addr,
                    "GET /api/smmsg?password=hunter2 HTTP/1.1\r\nHost: example.com\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(ok.starts_with("HTTP/1.1 200 OK"));
                assert!(ok.ends_with(SUCCESS_BODY));

                let rejected = roundtrip(
                    addr,
                    "POST /api/smmsg?q=%00 HTTP/1.1\r\nHost: example.com\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(rejected.starts_with("HTTP/1.1 400 Bad Request"));
                assert!(rejected.ends_with(r#"{"error":"Invalid request URL"}"#));

                shutdown.notify_one();
                server.await.unwrap();
            })
            .await;
    }
}
