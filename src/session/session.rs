use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::transcript::{TranscriptAccumulator, TranscriptSnapshot};
use crate::audio::AudioCapture;
use crate::delivery::{BulkReplay, DeliveryStrategy, LiveStream};
use crate::error::SessionError;
use crate::protocol::{self, Channel, ChannelEvent, HandshakeConfig, InboundEvent};

/// How long teardown waits for the reply pump to drain the socket
/// before giving up on it.
const PUMP_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Lifecycle state of a transcription session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Connecting,
    AwaitingReady,
    Delivering,
    AwaitingResult,
    Closed,
}

/// A transcription session against a streaming speech service.
///
/// Orchestrates connect → handshake → deliver → await-result →
/// disconnect with a bounded wait at every suspension point, and
/// guarantees teardown on every exit path. At most one connection is
/// active at a time; starting a new one tears the previous one down.
pub struct TranscriptionSession {
    /// Session configuration
    config: SessionConfig,

    /// Accumulated transcript, readable at any time (also after teardown)
    transcript: Arc<TranscriptAccumulator>,

    /// Lifecycle state, observable by callers
    state_tx: Arc<watch::Sender<SessionState>>,

    /// The currently active connection, if any
    active: Mutex<Option<Active>>,
}

/// Per-connection runtime shared between the session and its reply pump.
struct Inner {
    session_id: String,
    channel: Channel,
    ready_tx: watch::Sender<bool>,
    closed_tx: watch::Sender<bool>,
    state_tx: Arc<watch::Sender<SessionState>>,
    transcript: Arc<TranscriptAccumulator>,
    /// Teardown was service-initiated (DISCONNECT)
    forced: AtomicBool,
    torn_down: AtomicBool,
    /// Stop signal for an in-flight live delivery, if one is running
    stream_stop: Mutex<Option<watch::Sender<bool>>>,
}

struct Active {
    inner: Arc<Inner>,
    ready_rx: watch::Receiver<bool>,
    closed_rx: watch::Receiver<bool>,
    pump: JoinHandle<()>,
    streaming: Option<JoinHandle<()>>,
}

impl Inner {
    /// Unconditional teardown: stop live delivery, close the channel,
    /// reset readiness, publish `Closed`. Reentrant-safe; repeated
    /// calls are no-ops.
    async fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(stop) = self.stream_stop.lock().await.take() {
            stop.send_replace(true);
        }

        self.channel.close().await;
        self.ready_tx.send_replace(false);
        self.state_tx.send_replace(SessionState::Closed);
        self.closed_tx.send_replace(true);

        info!("Session {} torn down", self.session_id);
    }

    /// Why waits observing the close should fail.
    fn close_reason(&self) -> SessionError {
        if self.forced.load(Ordering::SeqCst) {
            SessionError::ForcedDisconnect
        } else {
            SessionError::Closed
        }
    }
}

impl TranscriptionSession {
    pub fn new(config: SessionConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);

        Self {
            config,
            transcript: Arc::new(TranscriptAccumulator::new()),
            state_tx: Arc::new(state_tx),
            active: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Subscribe to lifecycle state changes.
    pub fn state_changes(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Latest aggregated transcript text.
    pub fn current_transcript(&self) -> String {
        self.transcript.current()
    }

    pub fn transcript_snapshot(&self) -> TranscriptSnapshot {
        self.transcript.snapshot()
    }

    pub async fn is_connected(&self) -> bool {
        let guard = self.active.lock().await;
        guard
            .as_ref()
            .map(|a| !a.inner.torn_down.load(Ordering::SeqCst) && a.inner.channel.is_open())
            .unwrap_or(false)
    }

    /// Open the connection and send the handshake.
    ///
    /// Any previous connection is torn down first; the transcript is
    /// reset for the new session. On return the session is awaiting
    /// the service's readiness signal.
    pub async fn connect(&self) -> Result<(), SessionError> {
        self.disconnect().await;

        self.transcript.reset();
        self.state_tx.send_replace(SessionState::Connecting);

        let session_id = protocol::new_session_id();
        info!(
            "Starting session {} against {}",
            session_id, self.config.endpoint
        );

        let (channel, events) =
            match Channel::open(&self.config.endpoint, self.config.connect_timeout).await {
                Ok(opened) => opened,
                Err(e) => {
                    self.state_tx.send_replace(SessionState::Closed);
                    return Err(e);
                }
            };

        let handshake = HandshakeConfig::new(
            session_id.clone(),
            self.config.language.clone(),
            self.config.task,
            self.config.model.clone(),
            self.config.use_vad,
        );

        let (ready_tx, ready_rx) = watch::channel(false);
        let (closed_tx, closed_rx) = watch::channel(false);

        let inner = Arc::new(Inner {
            session_id,
            channel,
            ready_tx,
            closed_tx,
            state_tx: Arc::clone(&self.state_tx),
            transcript: Arc::clone(&self.transcript),
            forced: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
            stream_stop: Mutex::new(None),
        });

        if let Err(e) = protocol::handshake::send_config(&inner.channel, &handshake).await {
            inner.teardown().await;
            return Err(e);
        }

        // Publish the state before the pump runs so a teardown it
        // triggers cannot be overwritten by this transition.
        self.state_tx.send_replace(SessionState::AwaitingReady);

        let pump = tokio::spawn(reply_pump(Arc::clone(&inner), events));

        *self.active.lock().await = Some(Active {
            inner,
            ready_rx,
            closed_rx,
            pump,
            streaming: None,
        });

        Ok(())
    }

    /// Bulk-replay a complete audio buffer (raw f32le mono PCM, or any
    /// pre-converted byte stream the service accepts) and return the
    /// first non-empty transcript.
    ///
    /// Connects first if needed. The session is torn down afterwards on
    /// every path, matching the one-shot contract of the service.
    pub async fn transcribe_buffer(&self, buffer: Vec<u8>) -> Result<String, SessionError> {
        if !self.is_connected().await {
            self.connect().await?;
        }

        let result = self.replay_and_await(buffer).await;
        self.disconnect().await;
        result
    }

    async fn replay_and_await(&self, buffer: Vec<u8>) -> Result<String, SessionError> {
        let (inner, ready_rx, closed_rx) = self.snapshot_active().await?;

        self.transcript.reset();

        self.wait_until_ready(&inner, ready_rx, closed_rx.clone())
            .await?;

        let mut strategy =
            BulkReplay::new(buffer, self.config.chunk_size, self.config.chunk_interval);

        self.state_tx.send_replace(SessionState::Delivering);
        debug!("Delivering audio via {}", strategy.name());

        strategy
            .deliver(&inner.channel)
            .await
            .map_err(|e| delivery_error(&inner, e))?;

        self.state_tx.send_replace(SessionState::AwaitingResult);

        self.wait_for_result(&inner, closed_rx).await
    }

    /// Begin live streaming from the given capture source.
    ///
    /// Connects first if needed, waits for readiness, then forwards
    /// frames until [`stop_streaming`](Self::stop_streaming) or
    /// [`disconnect`](Self::disconnect); transcript updates land in the
    /// accumulator as they arrive.
    pub async fn start_streaming(
        &self,
        capture: Box<dyn AudioCapture>,
    ) -> Result<(), SessionError> {
        if !self.is_connected().await {
            self.connect().await?;
        }

        {
            let guard = self.active.lock().await;
            if guard.as_ref().is_some_and(|a| a.streaming.is_some()) {
                warn!("Live streaming already started");
                return Ok(());
            }
        }

        let (inner, ready_rx, closed_rx) = self.snapshot_active().await?;

        if let Err(e) = self
            .wait_until_ready(&inner, ready_rx, closed_rx.clone())
            .await
        {
            self.disconnect().await;
            return Err(e);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        *inner.stream_stop.lock().await = Some(stop_tx);

        let mut strategy = LiveStream::new(capture, stop_rx);

        self.state_tx.send_replace(SessionState::Delivering);
        debug!("Delivering audio via {}", strategy.name());

        let task_inner = Arc::clone(&inner);
        let handle = tokio::spawn(async move {
            if let Err(e) = strategy.deliver(&task_inner.channel).await {
                if !task_inner.torn_down.load(Ordering::SeqCst) {
                    error!("Live delivery failed: {}", e);
                    task_inner.teardown().await;
                }
            }
        });

        let mut guard = self.active.lock().await;
        if let Some(active) = guard.as_mut() {
            active.streaming = Some(handle);
        } else {
            // Torn down while we were spawning; the task will stop on
            // its own via the fired stop signal.
            handle.abort();
            return Err(inner.close_reason());
        }

        Ok(())
    }

    /// Stop live delivery, releasing the capture source.
    ///
    /// The connection stays open so trailing transcript segments still
    /// reach the accumulator; `disconnect` closes it.
    pub async fn stop_streaming(&self) {
        let (stop, handle) = {
            let mut guard = self.active.lock().await;
            let Some(active) = guard.as_mut() else {
                warn!("Live streaming not active");
                return;
            };
            let stop = active.inner.stream_stop.lock().await.take();
            (stop, active.streaming.take())
        };

        if stop.is_none() && handle.is_none() {
            warn!("Live streaming not active");
            return;
        }

        if let Some(stop) = stop {
            stop.send_replace(true);
        }

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Live delivery task panicked: {}", e);
            }
        }

        if self.state() == SessionState::Delivering {
            self.state_tx.send_replace(SessionState::AwaitingResult);
        }

        info!("Live streaming stopped");
    }

    /// Tear the session down. Idempotent and safe from any state; the
    /// accumulated transcript remains readable afterwards.
    pub async fn disconnect(&self) {
        let active = { self.active.lock().await.take() };
        let Some(mut active) = active else {
            return;
        };

        active.inner.teardown().await;

        // A state transition racing an earlier teardown may have
        // overwritten Closed; settle it here.
        if self.state() != SessionState::Closed {
            self.state_tx.send_replace(SessionState::Closed);
        }

        if let Some(streaming) = active.streaming.take() {
            let _ = streaming.await;
        }

        // The pump exits once the socket drains; don't wait forever on
        // a wedged peer.
        let mut pump = active.pump;
        if tokio::time::timeout(PUMP_DRAIN_GRACE, &mut pump).await.is_err() {
            pump.abort();
        }
    }

    /// Clone the active connection's handles without holding the lock
    /// across a wait point.
    async fn snapshot_active(
        &self,
    ) -> Result<(Arc<Inner>, watch::Receiver<bool>, watch::Receiver<bool>), SessionError> {
        let guard = self.active.lock().await;
        let active = guard.as_ref().ok_or(SessionError::Closed)?;
        Ok((
            Arc::clone(&active.inner),
            active.ready_rx.clone(),
            active.closed_rx.clone(),
        ))
    }

    /// Block until the service signals readiness, the session closes,
    /// or the ready timeout elapses. Audio must not flow before this
    /// returns `Ok`.
    async fn wait_until_ready(
        &self,
        inner: &Arc<Inner>,
        mut ready_rx: watch::Receiver<bool>,
        mut closed_rx: watch::Receiver<bool>,
    ) -> Result<(), SessionError> {
        if *ready_rx.borrow_and_update() {
            return Ok(());
        }

        let deadline = self.config.ready_timeout;
        let wait = async {
            loop {
                tokio::select! {
                    changed = ready_rx.changed() => {
                        if changed.is_err() {
                            return Err(inner.close_reason());
                        }
                        if *ready_rx.borrow() {
                            return Ok(());
                        }
                    }
                    _ = closed_rx.changed() => {
                        if *closed_rx.borrow() {
                            return Err(inner.close_reason());
                        }
                    }
                }
            }
        };

        match tokio::time::timeout(deadline, wait).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SessionError::ReadyTimeout(deadline)),
        }
    }

    /// Block until the first non-empty transcript ("first result
    /// wins"), the session closes, or the result timeout elapses.
    async fn wait_for_result(
        &self,
        inner: &Arc<Inner>,
        mut closed_rx: watch::Receiver<bool>,
    ) -> Result<String, SessionError> {
        let mut transcript_rx = self.transcript.subscribe();
        let deadline = self.config.result_timeout;

        let wait = async {
            loop {
                let text = transcript_rx.borrow_and_update().text.clone();
                if !text.trim().is_empty() {
                    return Ok(text.trim().to_string());
                }

                tokio::select! {
                    changed = transcript_rx.changed() => {
                        if changed.is_err() {
                            return Err(inner.close_reason());
                        }
                    }
                    _ = closed_rx.changed() => {
                        if *closed_rx.borrow() {
                            // A final segment may have landed just
                            // before the close.
                            let text = transcript_rx.borrow().text.clone();
                            if !text.trim().is_empty() {
                                return Ok(text.trim().to_string());
                            }
                            return Err(inner.close_reason());
                        }
                    }
                }
            }
        };

        match tokio::time::timeout(deadline, wait).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SessionError::ResultTimeout(deadline)),
        }
    }
}

/// A send that failed because the service tore the session down is a
/// forced disconnect, not a transport fault.
fn delivery_error(inner: &Inner, err: SessionError) -> SessionError {
    if inner.forced.load(Ordering::SeqCst) {
        SessionError::ForcedDisconnect
    } else {
        err
    }
}

/// Single consumer of channel events and single writer of the
/// transcript accumulator. Runs until the channel's event stream ends.
async fn reply_pump(inner: Arc<Inner>, mut events: mpsc::Receiver<ChannelEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            ChannelEvent::Text(raw) => {
                // Frames buffered before the close must not mutate
                // state after teardown.
                if inner.torn_down.load(Ordering::SeqCst) {
                    continue;
                }

                let ready = *inner.ready_tx.borrow();

                for event in protocol::interpret(&raw, &inner.session_id, ready) {
                    match event {
                        InboundEvent::Ready => {
                            info!("Service ready for session {}", inner.session_id);
                            inner.ready_tx.send_replace(true);
                        }
                        InboundEvent::Transcript(text) => {
                            debug!("Transcript update ({} chars)", text.len());
                            inner.transcript.update(text);
                        }
                        InboundEvent::QueueWait(minutes) => {
                            warn!("Service queue full, advertised wait: {} min", minutes);
                        }
                        InboundEvent::ForceDisconnect => {
                            info!(
                                "Service requested disconnect for session {}",
                                inner.session_id
                            );
                            inner.forced.store(true, Ordering::SeqCst);
                            inner.teardown().await;
                        }
                        InboundEvent::Foreign => {}
                    }
                }
            }
            ChannelEvent::Error(e) => {
                error!("Transport channel failed: {}", e);
                inner.teardown().await;
            }
            ChannelEvent::Closed => {
                inner.teardown().await;
            }
        }
    }

    debug!("Reply pump for session {} stopped", inner.session_id);
}
