//! Transport channel actors.
//!
//! A channel is one tokio task that owns its state, metrics, render target
//! and in-flight flag. Commands, ticks and network completions are all
//! handled inside the task's `select!` loop, so a channel never mutates its
//! state from two places at once. Network work runs in helper tasks that
//! post their results back stamped with the connection epoch they belong to.

use {
    crate::*,
    base::*,
    std::{fmt, sync::Arc, time::Duration},
    tokio::{
        sync::{mpsc, oneshot, watch},
        task::JoinHandle,
        time::{Instant, Interval, MissedTickBehavior, interval_at},
    },
    video::FrameSource,
};

mod polling;
pub use polling::spawn_polling;

mod streaming;
pub use streaming::spawn_streaming;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Connecting,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Polling,
    Streaming,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Polling => write!(f, "polling"),
            ChannelKind::Streaming => write!(f, "streaming"),
        }
    }
}

pub(crate) enum Command {
    Connect(oneshot::Sender<()>),
    Disconnect(oneshot::Sender<()>),
    ResetMetrics(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Control and observation handle of a running channel.
pub struct ChannelHandle {
    kind: ChannelKind,
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<ChannelState>,
    metrics: watch::Receiver<ChannelMetrics>,
    task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl ChannelHandle {
    pub(crate) fn new(
        kind: ChannelKind,
        commands: mpsc::Sender<Command>,
        state: watch::Receiver<ChannelState>,
        metrics: watch::Receiver<ChannelMetrics>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            kind,
            commands,
            state,
            metrics,
            task: std::sync::Mutex::new(Some(task)),
        }
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<()>) -> Command,
    ) -> Result<(), DispatchError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(command(ack_tx))
            .await
            .map_err(|_| DispatchError::ChannelClosed)?;
        ack_rx.await.map_err(|_| DispatchError::ChannelClosed)
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Start the channel. Does nothing if it is already connecting or active.
    ///
    /// For the streaming channel this returns as soon as the connection
    /// attempt has started; watch the state for `Active`.
    pub async fn connect(&self) -> Result<(), DispatchError> {
        self.request(Command::Connect).await
    }

    /// Stop sampling, drop the connection and clear the render target.
    pub async fn disconnect(&self) -> Result<(), DispatchError> {
        self.request(Command::Disconnect).await
    }

    /// Zero the metrics without touching the connection.
    pub async fn reset_metrics(&self) -> Result<(), DispatchError> {
        self.request(Command::ResetMetrics).await
    }

    /// Disconnect and end the channel task.
    pub async fn shutdown(&self) -> Result<(), DispatchError> {
        let result = self.request(Command::Shutdown).await;
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                log_error!("{} channel: task failed: {}", self.kind, e);
            }
        }
        result
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn metrics(&self) -> ChannelMetrics {
        *self.metrics.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<ChannelMetrics> {
        self.metrics.clone()
    }

    /// Resolve once the channel reaches `state`.
    pub async fn wait_for_state(&self, state: ChannelState) -> Result<(), DispatchError> {
        let mut rx = self.watch_state();
        rx.wait_for(|s| *s == state)
            .await
            .map(|_| ())
            .map_err(|_| DispatchError::ChannelClosed)
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().unwrap_or_else(|e| e.into_inner()).take() {
            task.abort();
        }
    }
}

/// Per-channel presentation and timing.
#[derive(Debug, Clone)]
pub(crate) struct ChannelSettings {
    pub label: String,
    pub color: Color,
    pub quality: u8,
    pub interval: Duration,
}

impl ChannelSettings {
    pub fn from_config(config: &DispatchConfig, kind: ChannelKind) -> Self {
        let (label, color) = match kind {
            ChannelKind::Polling => (config.poll_label(), config.poll_color()),
            ChannelKind::Streaming => (config.stream_label(), config.stream_color()),
        };
        Self {
            label: label.to_string(),
            color,
            quality: config.jpeg_quality(),
            interval: config.interval(),
        }
    }
}

/// State shared by both channel kinds.
pub(crate) struct ChannelCore {
    pub kind: ChannelKind,
    pub epoch: Epoch,
    pub in_flight: bool,
    pub ticker: Option<Interval>,
    pub fps: FpsMeter,
    settings: ChannelSettings,
    source: Arc<dyn FrameSource>,
    target: Box<dyn RenderTarget>,
    state: watch::Sender<ChannelState>,
    metrics: watch::Sender<ChannelMetrics>,
}

impl ChannelCore {
    pub fn new(
        kind: ChannelKind,
        settings: ChannelSettings,
        source: Arc<dyn FrameSource>,
        target: Box<dyn RenderTarget>,
    ) -> (Self, watch::Receiver<ChannelState>, watch::Receiver<ChannelMetrics>) {
        let (state, state_rx) = watch::channel(ChannelState::Idle);
        let (metrics, metrics_rx) = watch::channel(ChannelMetrics::default());
        let core = Self {
            kind,
            epoch: Epoch::new(),
            in_flight: false,
            ticker: None,
            fps: FpsMeter::new(Instant::now()),
            settings,
            source,
            target,
            state,
            metrics,
        };
        (core, state_rx, metrics_rx)
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn set_state(&self, state: ChannelState) {
        self.state.send_if_modified(|current| {
            let changed = *current != state;
            *current = state;
            changed
        });
    }

    /// Start the sampling timer. The first tick fires one period from now;
    /// ticks missed while busy are skipped, not queued.
    pub fn start_ticker(&mut self) {
        let now = Instant::now();
        let mut ticker = interval_at(now + self.settings.interval, self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.ticker = Some(ticker);
        self.fps = FpsMeter::new(now);
    }

    /// Back to `Idle`: invalidate pending work, stop the timer, clear the
    /// overlay. Safe to call in any state.
    pub fn teardown(&mut self) {
        self.epoch.advance();
        self.ticker = None;
        self.in_flight = false;
        self.target.clear();
        if self.state() != ChannelState::Idle {
            log_info!("{} channel: disconnected", self.kind);
        }
        self.set_state(ChannelState::Idle);
    }

    /// Encode the current frame and size the target to match it.
    ///
    /// Encoding failures are counted as errors.
    pub fn sample_frame(&mut self) -> Option<FrameSnapshot> {
        match sample(&*self.source, self.settings.quality) {
            Ok(Some(frame)) => {
                self.target.resize(frame.size);
                Some(frame)
            }
            Ok(None) => None,
            Err(e) => {
                log_warn!("{} channel: frame encoding failed: {}", self.kind, e);
                self.count_error();
                None
            }
        }
    }

    pub fn draw(&mut self, detection: &DetectionResult) {
        render(&mut *self.target, detection, &self.settings.label, self.settings.color);
    }

    pub fn apply(&self, update: impl FnOnce(&ChannelMetrics) -> MetricsUpdate) {
        self.metrics.send_modify(|metrics| {
            let update = update(&*metrics);
            metrics.update(update);
        });
    }

    /// Record a successful sample at `now`: bump the count and refresh fps.
    pub fn count_sample(&mut self, now: Instant, latency_ms: Option<u64>) {
        let fps = self.fps.sample(now);
        self.apply(|m| MetricsUpdate {
            fps,
            latency_ms,
            count: Some(m.count + 1),
            errors: None,
        });
    }

    pub fn count_error(&self) {
        self.apply(|m| MetricsUpdate::default().errors(m.errors + 1));
    }

    pub fn reset_metrics(&self) {
        self.metrics.send_modify(ChannelMetrics::reset);
    }
}

/// Wait for the next tick, or forever when the timer is stopped.
pub(crate) async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Behaviour specific to one channel kind.
pub(crate) trait ChannelActor {
    fn core(&mut self) -> &mut ChannelCore;

    fn connect(&mut self);

    fn disconnect(&mut self);

    /// Apply a command; returns false once the actor should exit.
    fn handle_command(&mut self, command: Command) -> bool {
        let (ack, keep_running) = match command {
            Command::Connect(ack) => {
                if self.core().state() == ChannelState::Idle {
                    self.connect();
                } else {
                    log_debug!("{} channel: already connected", self.core().kind);
                }
                (ack, true)
            }
            Command::Disconnect(ack) => {
                self.disconnect();
                (ack, true)
            }
            Command::ResetMetrics(ack) => {
                self.core().reset_metrics();
                (ack, true)
            }
            Command::Shutdown(ack) => {
                self.disconnect();
                (ack, false)
            }
        };
        // the caller may have given up waiting
        let _ = ack.send(());
        keep_running
    }
}
