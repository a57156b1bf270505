use super::*;

struct PollResponse {
    result: Result<String, DispatchError>,
    sent_at: Instant,
}

struct PollingChannel<P> {
    core: ChannelCore,
    transport: Arc<P>,
    responses: mpsc::UnboundedSender<Stamped<PollResponse>>,
}

/// Start a request/response channel.
///
/// On connect the channel goes straight to `Active`. Every tick it sends the
/// current frame unless a request is still outstanding, and draws and counts
/// the answer when it comes back.
pub fn spawn_polling<P: PollTransport>(
    config: &DispatchConfig,
    source: Arc<dyn FrameSource>,
    transport: P,
    target: Box<dyn RenderTarget>,
) -> ChannelHandle {
    let kind = ChannelKind::Polling;
    let settings = ChannelSettings::from_config(config, kind);
    let (core, state_rx, metrics_rx) = ChannelCore::new(kind, settings, source, target);
    let (command_tx, command_rx) = mpsc::channel(16);
    let (response_tx, response_rx) = mpsc::unbounded_channel();

    let channel = PollingChannel {
        core,
        transport: Arc::new(transport),
        responses: response_tx,
    };
    let task = tokio::spawn(channel.run(command_rx, response_rx));
    ChannelHandle::new(kind, command_tx, state_rx, metrics_rx, task)
}

impl<P: PollTransport> PollingChannel<P> {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut responses: mpsc::UnboundedReceiver<Stamped<PollResponse>>,
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

                Some(response) = responses.recv() => self.on_response(response),

                _ = next_tick(&mut self.core.ticker) => self.on_tick(),
            }
        }
        self.disconnect();
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

        let epoch = self.core.epoch.current();
        let transport = Arc::clone(&self.transport);
        let responses = self.responses.clone();
        let sent_at = Instant::now();
        tokio::spawn(async move {
            let result = transport.detect(frame).await;
            // the channel may be gone already
            let _ = responses.send(Stamped::new(epoch, PollResponse { result, sent_at }));
        });
    }

    fn on_response(&mut self, response: Stamped<PollResponse>) {
        let Some(response) = response.take_if_current(&self.core.epoch) else {
            log_debug!("polling channel: dropped stale response");
            return;
        };
        self.core.in_flight = false;

        match response.result.and_then(|body| parse_detection(&body)) {
            Ok(detection) => {
                self.core.draw(&detection);
                let now = Instant::now();
                let latency = duration_ms(now.saturating_duration_since(response.sent_at));
                self.core.count_sample(now, Some(latency));
            }
            Err(e) => {
                log_warn!("polling channel: {}", e);
                self.core.count_error();
            }
        }
    }
}

impl<P: PollTransport> ChannelActor for PollingChannel<P> {
    fn core(&mut self) -> &mut ChannelCore {
        &mut self.core
    }

    fn connect(&mut self) {
        self.core.epoch.advance();
        self.core.in_flight = false;
        self.core.start_ticker();
        self.core.set_state(ChannelState::Active);
        log_info!("polling channel: active");
    }

    fn disconnect(&mut self) {
        self.core.teardown();
    }
}
