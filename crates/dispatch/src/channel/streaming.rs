use super::*;

enum StreamingEvent<C: StreamConnector> {
    Opened(Result<(C::Sender, C::Receiver), DispatchError>),
    Received(StreamEvent),
    SendFailed(DispatchError),
}

type Events<C> = mpsc::UnboundedSender<Stamped<StreamingEvent<C>>>;

struct StreamingChannel<C: StreamConnector> {
    core: ChannelCore,
    connector: Arc<C>,
    events: Events<C>,
    writer: Option<mpsc::Sender<String>>,
    reader: Option<JoinHandle<()>>,
    last_sent: Option<Instant>,
}

/// Start a persistent-connection channel.
///
/// Connecting opens the connection in the background (`Connecting`), and the
/// channel turns `Active` once it is open. Frames are sent without waiting
/// for the answer; replies are handled whenever they arrive. A closed
/// connection takes the channel back to `Idle`.
pub fn spawn_streaming<C: StreamConnector>(
    config: &DispatchConfig,
    source: Arc<dyn FrameSource>,
    connector: C,
    target: Box<dyn RenderTarget>,
) -> ChannelHandle {
    let kind = ChannelKind::Streaming;
    let settings = ChannelSettings::from_config(config, kind);
    let (core, state_rx, metrics_rx) = ChannelCore::new(kind, settings, source, target);
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let channel = StreamingChannel {
        core,
        connector: Arc::new(connector),
        events: event_tx,
        writer: None,
        reader: None,
        last_sent: None,
    };
    let task = tokio::spawn(channel.run(command_rx, event_rx));
    ChannelHandle::new(kind, command_tx, state_rx, metrics_rx, task)
}

// Owns the write half; closing the queue closes the connection.
async fn write_loop<C: StreamConnector>(
    mut sender: C::Sender,
    mut queue: mpsc::Receiver<String>,
    events: Events<C>,
    epoch: u64,
) {
    while let Some(text) = queue.recv().await {
        if let Err(e) = sender.send_text(text).await {
            let _ = events.send(Stamped::new(epoch, StreamingEvent::SendFailed(e)));
        }
    }
    sender.close().await;
}

async fn read_loop<C: StreamConnector>(mut receiver: C::Receiver, events: Events<C>, epoch: u64) {
    loop {
        let event = receiver.next_event().await;
        let closed = event == StreamEvent::Closed;
        if events
            .send(Stamped::new(epoch, StreamingEvent::Received(event)))
            .is_err()
            || closed
        {
            break;
        }
    }
}

impl<C: StreamConnector> StreamingChannel<C> {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut events: mpsc::UnboundedReceiver<Stamped<StreamingEvent<C>>>,
    ) {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    if !self.handle_command(command) {
                        break;
                    }
                }

                Some(event) = events.recv() => self.on_event(event),

                _ = next_tick(&mut self.core.ticker) => self.on_tick(),
            }
        }
        self.disconnect();
    }

    fn on_event(&mut self, event: Stamped<StreamingEvent<C>>) {
        let Some(event) = event.take_if_current(&self.core.epoch) else {
            log_debug!("streaming channel: dropped stale event");
            return;
        };
        match event {
            StreamingEvent::Opened(Ok((sender, receiver))) => self.on_open(sender, receiver),
            StreamingEvent::Opened(Err(e)) => {
                log_warn!("streaming channel: connect failed: {}", e);
                self.core.count_error();
                self.disconnect();
            }
            StreamingEvent::Received(StreamEvent::Message(text)) => self.on_message(&text),
            StreamingEvent::Received(StreamEvent::Error(e)) => {
                log_warn!("streaming channel: transport error: {}", e);
                self.core.count_error();
                self.core.in_flight = false;
            }
            StreamingEvent::Received(StreamEvent::Closed) => {
                log_info!("streaming channel: connection closed");
                self.disconnect();
            }
            StreamingEvent::SendFailed(e) => {
                log_warn!("streaming channel: {}", e);
                self.core.count_error();
                self.core.in_flight = false;
            }
        }
    }

    fn on_open(&mut self, sender: C::Sender, receiver: C::Receiver) {
        if self.core.state() != ChannelState::Connecting {
            return;
        }
        let epoch = self.core.epoch.current();

        let (writer_tx, writer_rx) = mpsc::channel(1);
        tokio::spawn(write_loop::<C>(sender, writer_rx, self.events.clone(), epoch));
        self.writer = Some(writer_tx);
        self.reader = Some(tokio::spawn(read_loop::<C>(receiver, self.events.clone(), epoch)));

        self.core.start_ticker();
        self.core.set_state(ChannelState::Active);
        log_info!("streaming channel: active");
    }

    fn on_tick(&mut self) {
        if self.core.in_flight {
            return;
        }
        self.core.in_flight = true;

        let Some(frame) = self.core.sample_frame() else {
            self.core.in_flight = false;
            return;
        };
        let Some(writer) = &self.writer else {
            self.core.in_flight = false;
            return;
        };

        let now = Instant::now();
        match writer.try_send(frame.to_data_url()) {
            Ok(()) => {
                self.last_sent = Some(now);
                self.core.count_sample(now, None);
            }
            Err(e) => {
                log_warn!("streaming channel: send queue: {}", e);
                self.core.count_error();
                self.core.in_flight = false;
            }
        }
    }

    fn on_message(&mut self, text: &str) {
        self.core.in_flight = false;
        let now = Instant::now();
        match parse_detection(text) {
            Ok(detection) => {
                self.core.draw(&detection);
                if let Some(sent_at) = self.last_sent {
                    let latency = duration_ms(now.saturating_duration_since(sent_at));
                    self.core.apply(|_| MetricsUpdate::default().latency_ms(latency));
                }
            }
            Err(e) => {
                log_warn!("streaming channel: {}", e);
                self.core.count_error();
            }
        }
    }
}

impl<C: StreamConnector> ChannelActor for StreamingChannel<C> {
    fn core(&mut self) -> &mut ChannelCore {
        &mut self.core
    }

    fn connect(&mut self) {
        self.core.epoch.advance();
        self.core.in_flight = false;
        self.core.set_state(ChannelState::Connecting);
        log_info!("streaming channel: connecting");

        let epoch = self.core.epoch.current();
        let connector = Arc::clone(&self.connector);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = connector.open().await;
            let _ = events.send(Stamped::new(epoch, StreamingEvent::Opened(result)));
        });
    }

    fn disconnect(&mut self) {
        // dropping the queue lets the writer close the connection
        self.writer = None;
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.last_sent = None;
        self.core.teardown();
    }
}
