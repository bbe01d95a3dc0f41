//! WebSocket adapter: upgrades accepted TCP streams and exposes them as
//! [`Connection`]s.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use murmur_common::ConnectionError;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

use crate::connection::Connection;

type WsStream = WebSocketStream<TcpStream>;

/// A server-side WebSocket connection split into independently locked
/// read and write halves.
pub struct WsConnection {
    sink: Mutex<SplitSink<WsStream, WsMessage>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WsConnection {
    pub fn new(ws: WsStream) -> Self {
        let (sink, stream) = ws.split();
        Self {
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        }
    }
}

fn transport_error(e: impl std::fmt::Display) -> ConnectionError {
    ConnectionError::Transport(e.to_string())
}

#[async_trait]
impl Connection for WsConnection {
    async fn send(&self, text: &str) -> Result<(), ConnectionError> {
        self.sink
            .lock()
            .await
            .send(WsMessage::Text(text.to_owned().into()))
            .await
            .map_err(transport_error)
    }

    async fn receive(&self) -> Result<String, ConnectionError> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(WsMessage::Binary(data))) => {
                    return Ok(String::from_utf8_lossy(&data).into_owned())
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    self.sink
                        .lock()
                        .await
                        .send(WsMessage::Pong(data))
                        .await
                        .map_err(transport_error)?;
                }
                Some(Ok(WsMessage::Close(_))) | None => return Err(ConnectionError::Closed),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(transport_error(e)),
            }
        }
    }

    async fn close(&self) {
        let _ = self.sink.lock().await.close().await;
    }
}

/// Run the WebSocket upgrade on `stream`, refusing any request path other
/// than `path` with a 404.
pub async fn upgrade(stream: TcpStream, path: &str) -> Result<WsConnection, ConnectionError> {
    let expected = path.to_owned();
    let check_path = move |req: &Request, resp: Response| {
        if req.uri().path() == expected {
            Ok(resp)
        } else {
            let mut reject = ErrorResponse::new(Some("not found".into()));
            *reject.status_mut() = StatusCode::NOT_FOUND;
            Err(reject)
        }
    };

    let ws = accept_hdr_async(stream, check_path)
        .await
        .map_err(transport_error)?;
    Ok(WsConnection::new(ws))
}
