use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::SessionError;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Event surfaced by the channel's inbound reader.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// A text frame from the service
    Text(String),
    /// The connection closed (either side initiated)
    Closed,
    /// Transport-level failure; the connection is unusable afterwards
    Error(String),
}

/// One message-oriented full-duplex connection to the service endpoint.
///
/// Outbound sends go through a single sink and preserve caller order.
/// Inbound frames arrive, in order, on the event receiver handed out by
/// [`Channel::open`]; the receiver exists exactly once per channel
/// lifetime. `close` is idempotent and safe to call from any task.
pub struct Channel {
    sink: Mutex<Option<WsSink>>,
    open: Arc<AtomicBool>,
}

impl Channel {
    /// Establish the connection, failing after `connect_timeout`.
    ///
    /// The timeout is a hard bound, not a retry trigger.
    pub async fn open(
        url: &str,
        connect_timeout: Duration,
    ) -> Result<(Self, mpsc::Receiver<ChannelEvent>), SessionError> {
        info!("Connecting to transcription service at {}", url);

        let (ws, _response) = tokio::time::timeout(connect_timeout, connect_async(url))
            .await
            .map_err(|_| SessionError::ConnectTimeout(connect_timeout))??;

        info!("Connected to transcription service");

        let (sink, stream) = ws.split();
        let (event_tx, event_rx) = mpsc::channel(64);
        let open = Arc::new(AtomicBool::new(true));

        tokio::spawn(read_loop(stream, event_tx, Arc::clone(&open)));

        let channel = Self {
            sink: Mutex::new(Some(sink)),
            open,
        };

        Ok((channel, event_rx))
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Send a text payload, failing if the channel is not open.
    pub async fn send_text(&self, payload: String) -> Result<(), SessionError> {
        self.send(WsMessage::Text(payload.into())).await
    }

    /// Send a binary payload, failing if the channel is not open.
    pub async fn send_binary(&self, payload: Vec<u8>) -> Result<(), SessionError> {
        self.send(WsMessage::Binary(payload.into())).await
    }

    async fn send(&self, message: WsMessage) -> Result<(), SessionError> {
        if !self.is_open() {
            return Err(SessionError::NotOpen);
        }

        let mut sink = self.sink.lock().await;
        match sink.as_mut() {
            Some(sink) => Ok(sink.send(message).await?),
            None => Err(SessionError::NotOpen),
        }
    }

    /// Close the connection. Safe to call repeatedly or when already
    /// closed by the peer.
    pub async fn close(&self) {
        if !self.open.swap(false, Ordering::SeqCst) {
            return;
        }

        let mut sink = self.sink.lock().await;
        if let Some(mut sink) = sink.take() {
            // A failed close frame means the peer is already gone.
            if let Err(e) = sink.send(WsMessage::Close(None)).await {
                debug!("Close frame not delivered: {}", e);
            }
            let _ = sink.close().await;
        }

        debug!("Transport channel closed");
    }
}

/// Forward inbound frames as channel events until the connection ends.
async fn read_loop(
    mut stream: WsStream,
    events: mpsc::Sender<ChannelEvent>,
    open: Arc<AtomicBool>,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                if events
                    .send(ChannelEvent::Text(text.as_str().to_string()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Ok(WsMessage::Close(frame)) => {
                debug!("Service closed the connection: {:?}", frame);
                break;
            }
            Ok(_) => {
                // Binary and ping/pong frames are not part of the reply
                // protocol; tungstenite answers pings itself.
            }
            Err(e) => {
                warn!("Transport channel error: {}", e);
                open.store(false, Ordering::SeqCst);
                let _ = events.send(ChannelEvent::Error(e.to_string())).await;
                return;
            }
        }
    }

    open.store(false, Ordering::SeqCst);
    let _ = events.send(ChannelEvent::Closed).await;
}
