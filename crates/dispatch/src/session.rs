use {
    crate::{
        channel::{spawn_polling, spawn_streaming},
        *,
    },
    base::*,
    com::HttpClient,
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    video::FrameSource,
};

/// One comparison session: a shared frame source and its two channels.
///
/// The session is the only owner of the source's lifecycle. Both channels
/// sample the same source independently and draw onto their own targets.
pub struct Session {
    source: Arc<dyn FrameSource>,
    polling: ChannelHandle,
    streaming: ChannelHandle,
    stopped: AtomicBool,
}

impl Session {
    /// Build a session around explicit transports and render targets.
    ///
    /// Must be called from within a tokio runtime; both channel tasks start
    /// immediately in the `Idle` state.
    pub fn new<P, C>(
        config: &DispatchConfig,
        source: Arc<dyn FrameSource>,
        poll: P,
        stream: C,
        poll_target: impl RenderTarget + 'static,
        stream_target: impl RenderTarget + 'static,
    ) -> Self
    where
        P: PollTransport,
        C: StreamConnector,
    {
        let polling = spawn_polling(config, Arc::clone(&source), poll, Box::new(poll_target));
        let streaming =
            spawn_streaming(config, Arc::clone(&source), stream, Box::new(stream_target));
        Self {
            source,
            polling,
            streaming,
            stopped: AtomicBool::new(false),
        }
    }

    /// Session talking HTTP and WebSocket to the endpoints in `config`.
    pub fn remote(
        config: &DispatchConfig,
        source: Arc<dyn FrameSource>,
        poll_target: impl RenderTarget + 'static,
        stream_target: impl RenderTarget + 'static,
    ) -> Self {
        Self::new(
            config,
            source,
            HttpClient::new(config.poll_url()),
            WsConnector::new(config.stream_url()),
            poll_target,
            stream_target,
        )
    }

    pub fn is_ready(&self) -> bool {
        self.source.is_ready()
    }

    /// Resolve once the frame source is ready.
    pub async fn wait_ready(&self) -> Result<(), DispatchError> {
        let mut readiness = self.source.readiness();
        readiness
            .wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| DispatchError::SourceNotReady)
    }

    pub fn channel(&self, kind: ChannelKind) -> &ChannelHandle {
        match kind {
            ChannelKind::Polling => &self.polling,
            ChannelKind::Streaming => &self.streaming,
        }
    }

    pub fn polling(&self) -> &ChannelHandle {
        &self.polling
    }

    pub fn streaming(&self) -> &ChannelHandle {
        &self.streaming
    }

    /// Start one channel.
    ///
    /// Refused with `SourceNotReady` until the source is ready. Connecting an
    /// already connected channel does nothing.
    pub async fn connect(&self, kind: ChannelKind) -> Result<(), DispatchError> {
        if !self.is_ready() {
            return Err(DispatchError::SourceNotReady);
        }
        self.channel(kind).connect().await
    }

    pub async fn disconnect(&self, kind: ChannelKind) -> Result<(), DispatchError> {
        self.channel(kind).disconnect().await
    }

    pub fn state(&self, kind: ChannelKind) -> ChannelState {
        self.channel(kind).state()
    }

    pub fn metrics(&self, kind: ChannelKind) -> ChannelMetrics {
        self.channel(kind).metrics()
    }

    /// Zero the metrics of both channels. Connections are left alone.
    pub async fn reset_metrics(&self) -> Result<(), DispatchError> {
        self.polling.reset_metrics().await?;
        self.streaming.reset_metrics().await
    }

    /// Disconnect both channels, end their tasks and stop the frame source.
    ///
    /// Later calls do nothing.
    pub async fn shutdown(&self) -> Result<(), DispatchError> {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let polling = self.polling.shutdown().await;
        let streaming = self.streaming.shutdown().await;
        self.source.stop();
        log_info!("session: shut down");
        polling.and(streaming)
    }
}

impl Drop for Session {
    // channel tasks are aborted by their handles
    fn drop(&mut self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.source.stop();
            log_debug!("session: dropped without shutdown, source stopped");
        }
    }
}
