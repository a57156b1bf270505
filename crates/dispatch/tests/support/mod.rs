#![allow(dead_code)]

use {
    base::{Rect, Vec2},
    dispatch::{
        channel::{spawn_polling, spawn_streaming},
        *,
    },
    image::Image,
    std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        time::Duration,
    },
    tokio::sync::{Notify, mpsc, oneshot, watch},
    video::{FrameSlot, FrameSource},
};

pub const FRAME_SIZE: Vec2<usize> = Vec2 { x: 64, y: 48 };

pub const NO_HAND: &str = r#"{"handDetected":false,"handType":null,"bbox":null}"#;
pub const RIGHT_HAND: &str =
    r#"{"handDetected":true,"handType":"Right","bbox":{"x":10,"y":12,"w":20,"h":16}}"#;

pub fn frame() -> Image {
    Image::solid_rgb(FRAME_SIZE, [90, 120, 200])
}

/// A slot that is ready and holds one frame.
pub fn ready_slot() -> FrameSlot {
    let slot = FrameSlot::new();
    slot.mark_ready(FRAME_SIZE);
    slot.publish(frame());
    slot
}

/// Frame source that remembers whether it was stopped.
pub struct TrackedSource {
    pub slot: FrameSlot,
    pub stopped: AtomicBool,
}

impl TrackedSource {
    pub fn new(slot: FrameSlot) -> Arc<Self> {
        Arc::new(Self {
            slot,
            stopped: AtomicBool::new(false),
        })
    }
}

impl FrameSource for TrackedSource {
    fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    fn readiness(&self) -> watch::Receiver<bool> {
        self.slot.readiness()
    }

    fn size(&self) -> Option<Vec2<usize>> {
        self.slot.size()
    }

    fn snapshot(&self) -> Option<Arc<Image>> {
        if self.stopped.load(Ordering::Relaxed) {
            return None;
        }
        self.slot.snapshot()
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}

/// Polling channel with default config over a ready source.
pub fn spawn_poll(poll: MockPoll, target: impl RenderTarget + 'static) -> ChannelHandle {
    spawn_polling(&DispatchConfig::default(), Arc::new(ready_slot()), poll, Box::new(target))
}

/// Streaming channel with default config over a ready source.
pub fn spawn_stream(
    connector: MockConnector,
    target: impl RenderTarget + 'static,
) -> ChannelHandle {
    spawn_streaming(&DispatchConfig::default(), Arc::new(ready_slot()), connector, Box::new(target))
}

/// Canvas sized like the test frames with something already drawn on it.
pub fn painted_canvas() -> OverlayCanvas {
    let mut canvas = OverlayCanvas::new(FRAME_SIZE);
    canvas.fill_rect(Rect::from_xywh(0, 0, 8, 8), Color::rgb(255, 0, 0));
    canvas
}

pub type Reply = Result<String, DispatchError>;

/// Scripted polling transport.
///
/// Replies after `delay` with the configured reply, or, when gated, hands a
/// responder to the test for every request and waits for it.
#[derive(Clone)]
pub struct MockPoll {
    reply: Arc<Mutex<Reply>>,
    delay: Duration,
    gate: Option<mpsc::UnboundedSender<oneshot::Sender<Reply>>>,
    pub calls: Arc<AtomicUsize>,
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
    pub frames: Arc<Mutex<Vec<FrameSnapshot>>>,
}

impl MockPoll {
    pub fn replying(body: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new(Ok(body.to_string()))),
            delay: Duration::ZERO,
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            frames: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        let mock = Self::replying("");
        mock.set_reply(Err(DispatchError::Send(message.to_string())));
        mock
    }

    pub fn gated() -> (Self, mpsc::UnboundedReceiver<oneshot::Sender<Reply>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut mock = Self::replying(NO_HAND);
        mock.gate = Some(tx);
        (mock, rx)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PollTransport for MockPoll {
    async fn detect(&self, frame: FrameSnapshot) -> Result<String, DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.frames.lock().unwrap().push(frame);

        let reply = match &self.gate {
            Some(gate) => {
                let (tx, rx) = oneshot::channel();
                gate.send(tx).unwrap();
                rx.await.unwrap_or(Err(DispatchError::Send("dropped".to_string())))
            }
            None => {
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                let reply = self.reply.lock().unwrap().clone();
                reply
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }
}

/// Test side of one mock streaming connection.
pub struct MockConnection {
    pub sent: mpsc::UnboundedReceiver<String>,
    pub incoming: mpsc::UnboundedSender<StreamEvent>,
    pub closed: Arc<AtomicBool>,
}

pub struct MockSender {
    sent: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
    fail: Arc<AtomicBool>,
    stall: Arc<AtomicBool>,
    release: Arc<Notify>,
}

pub struct MockReceiver {
    incoming: mpsc::UnboundedReceiver<StreamEvent>,
}

impl FrameSender for MockSender {
    async fn send_text(&mut self, text: String) -> Result<(), DispatchError> {
        // outcome is fixed when the send starts
        let fail = self.fail.load(Ordering::SeqCst);
        if self.stall.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if fail {
            return Err(DispatchError::Send("socket write failed".to_string()));
        }
        // the test may have dropped its end
        let _ = self.sent.send(text);
        Ok(())
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl ResultReceiver for MockReceiver {
    async fn next_event(&mut self) -> StreamEvent {
        self.incoming.recv().await.unwrap_or(StreamEvent::Closed)
    }
}

/// Scripted stream connector; every opened connection is handed to the test.
pub struct MockConnector {
    connections: mpsc::UnboundedSender<MockConnection>,
    fail: bool,
    open_delay: Duration,
    pub fail_sends: Arc<AtomicBool>,
    /// Sends started while set wait for `release_sends`.
    pub stall_sends: Arc<AtomicBool>,
    pub release_sends: Arc<Notify>,
    pub opens: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MockConnection>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                connections: tx,
                fail: false,
                open_delay: Duration::ZERO,
                fail_sends: Arc::new(AtomicBool::new(false)),
                stall_sends: Arc::new(AtomicBool::new(false)),
                release_sends: Arc::new(Notify::new()),
                opens: Arc::new(AtomicUsize::new(0)),
            },
            rx,
        )
    }

    pub fn failing() -> Self {
        let (mut connector, _) = Self::new();
        connector.fail = true;
        connector
    }

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }
}

impl StreamConnector for MockConnector {
    type Sender = MockSender;
    type Receiver = MockReceiver;

    async fn open(&self) -> Result<(MockSender, MockReceiver), DispatchError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }
        if self.fail {
            return Err(DispatchError::ConnectionLost("connection refused".to_string()));
        }
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let _ = self.connections.send(MockConnection {
            sent: sent_rx,
            incoming: incoming_tx,
            closed: closed.clone(),
        });
        Ok((
            MockSender {
                sent: sent_tx,
                closed,
                fail: self.fail_sends.clone(),
                stall: self.stall_sends.clone(),
                release: self.release_sends.clone(),
            },
            MockReceiver {
                incoming: incoming_rx,
            },
        ))
    }
}

/// Drawing calls recorded by [`RecordingTarget`].
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Resize(Vec2<usize>),
    Clear,
    Stroke(Rect<i32>, u32, Color),
    Fill(Rect<i32>, Color),
    Text(Vec2<i32>, String, Color),
}

#[derive(Clone, Default)]
pub struct RecordingTarget {
    pub ops: Arc<Mutex<Vec<Op>>>,
    size: Vec2<usize>,
}

impl RecordingTarget {
    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }
}

impl RenderTarget for RecordingTarget {
    fn size(&self) -> Vec2<usize> {
        self.size
    }

    fn resize(&mut self, size: Vec2<usize>) {
        self.size = size;
        self.ops.lock().unwrap().push(Op::Resize(size));
    }

    fn clear(&mut self) {
        self.ops.lock().unwrap().push(Op::Clear);
    }

    fn stroke_rect(&mut self, rect: Rect<i32>, width: u32, color: Color) {
        self.ops.lock().unwrap().push(Op::Stroke(rect, width, color));
    }

    fn fill_rect(&mut self, rect: Rect<i32>, color: Color) {
        self.ops.lock().unwrap().push(Op::Fill(rect, color));
    }

    fn fill_text(&mut self, origin: Vec2<i32>, text: &str, _px: f32, color: Color) {
        self.ops.lock().unwrap().push(Op::Text(origin, text.to_string(), color));
    }
}
