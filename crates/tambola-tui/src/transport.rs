//! WebSocket transport for the client.
//!
//! Provides [`Connection`] which carries JSON text frames to and from the
//! room server. This is a thin layer that only moves text; protocol logic
//! stays in the Sans-IO [`tambola_client::Client`].

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 32;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The address is not a WebSocket URL.
    #[error("invalid server address '{0}': expected ws:// or wss://")]
    InvalidUrl(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Handle to an open WebSocket connection.
///
/// Text frames are sent and received via the channels, and an internal task
/// handles the socket I/O. The receiver closes when the socket does.
pub struct Connection {
    /// Send text frames to the server.
    pub to_server: mpsc::Sender<String>,
    /// Receive text frames from the server.
    pub from_server: mpsc::Receiver<String>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl Connection {
    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Check that `url` names a WebSocket endpoint.
pub fn validate_url(url: &str) -> Result<(), TransportError> {
    let rest = url.strip_prefix("ws://").or_else(|| url.strip_prefix("wss://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(TransportError::InvalidUrl(url.to_string())),
    }
}

/// Connect to a Tambola server.
///
/// Returns a [`Connection`] with channels for text transport.
pub async fn connect(url: &str) -> Result<Connection, TransportError> {
    validate_url(url)?;

    let (stream, _response) =
        connect_async(url).await.map_err(|e| TransportError::Connection(e.to_string()))?;
    info!(%url, "connected");

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let (from_server_tx, from_server_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(run_connection(stream, to_server_rx, from_server_tx));

    Ok(Connection {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the socket.
async fn run_connection(
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<String>,
) {
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => {
                let Some(text) = outgoing else {
                    let _ = sink.close().await;
                    break;
                };
                if let Err(e) = sink.send(Message::Text(text)).await {
                    warn!(error = %e, "send failed");
                    break;
                }
            }

            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if from_server.send(text).await.is_err() {
                        break;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "server closed the connection");
                    break;
                },
                // Pings are answered by tungstenite; binary frames are not part of the protocol
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    warn!(error = %e, "receive failed");
                    break;
                },
                None => break,
            }
        }
    }

    debug!("connection task finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_websocket_urls() {
        assert!(validate_url("ws://127.0.0.1:10000").is_ok());
        assert!(validate_url("wss://tambola.example").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        for url in ["http://127.0.0.1:10000", "127.0.0.1:10000", "ws://", ""] {
            assert!(matches!(validate_url(url), Err(TransportError::InvalidUrl(_))), "{url}");
        }
    }

    #[tokio::test]
    async fn connect_rejects_bad_url_before_dialing() {
        assert!(matches!(connect("localhost").await, Err(TransportError::InvalidUrl(_))));
    }
}
