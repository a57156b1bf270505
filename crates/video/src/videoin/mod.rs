use {
    crate::*,
    base::{Vec2, log_error, log_info},
    image::Image,
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    tokio::task::{JoinHandle, spawn_blocking},
};

mod still;
pub use still::StillImageConfig;

mod testpattern;
pub use testpattern::TestPatternConfig;

#[derive(Debug, Clone)]
pub enum VideoInConfig {
    TestPattern(TestPatternConfig),
    StillImage(StillImageConfig),
}

impl Default for VideoInConfig {
    fn default() -> Self {
        VideoInConfig::TestPattern(TestPatternConfig::default())
    }
}

pub(crate) trait VideoInDevice: Send {
    // open the device, return the actual frame size
    fn open(&mut self) -> Result<Vec2<usize>, VideoError>;
    fn close(&mut self);
    // wait for and return the next frame
    fn blocking_capture(&mut self) -> Result<Image, VideoError>;
}

/// A running capture device feeding a [`FrameSlot`].
///
/// The device is driven on a blocking worker thread. Readiness is latched as
/// soon as the device opens; frames follow at the device's own rate.
pub struct VideoIn {
    slot: FrameSlot,
    cancel: Arc<AtomicBool>,
    size: Vec2<usize>,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    fn create_device(config: &VideoInConfig) -> Box<dyn VideoInDevice> {
        match config {
            VideoInConfig::TestPattern(config) => {
                Box::new(testpattern::TestPattern::new(config.clone()))
            }
            VideoInConfig::StillImage(config) => Box::new(still::StillImage::new(config.clone())),
        }
    }

    pub async fn open(config: VideoInConfig) -> Result<Self, VideoError> {
        let mut device = Self::create_device(&config);
        let slot = FrameSlot::new();
        let cancel = Arc::new(AtomicBool::new(false));

        // device.open() runs on the same thread as blocking_capture(); the
        // result comes back over a oneshot
        let (init_tx, init_rx) = tokio::sync::oneshot::channel::<Result<Vec2<usize>, VideoError>>();

        let join_handle = spawn_blocking({
            let slot = slot.clone();
            let cancel = Arc::clone(&cancel);
            move || {
                match device.open() {
                    Ok(size) => {
                        slot.mark_ready(size);
                        let _ = init_tx.send(Ok(size));
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(e));
                        return;
                    }
                }

                log_info!("video worker: starting capture loop");
                while !cancel.load(Ordering::Relaxed) {
                    match device.blocking_capture() {
                        Ok(frame) => slot.publish(frame),
                        Err(e) => {
                            log_error!("video worker: capture failed: {}", e);
                            break;
                        }
                    }
                }
                device.close();
                log_info!("video worker: stopped");
            }
        });

        let size = init_rx
            .await
            .map_err(|_| VideoError::Device("Worker thread died during init".to_string()))??;

        Ok(Self {
            slot,
            cancel,
            size,
            join_handle: Some(join_handle),
        })
    }

    /// Handle to the shared latest-frame slot.
    pub fn slot(&self) -> FrameSlot {
        self.slot.clone()
    }

    pub async fn wait_ready(&self) {
        self.slot.wait_ready().await
    }

    /// Stop the worker and wait for the device to close.
    pub async fn close(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            if let Err(e) = join_handle.await {
                log_error!("video worker: join failed: {}", e);
            }
        }
    }
}

impl FrameSource for VideoIn {
    fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    fn readiness(&self) -> tokio::sync::watch::Receiver<bool> {
        self.slot.readiness()
    }

    fn size(&self) -> Option<Vec2<usize>> {
        self.slot.size().or(Some(self.size))
    }

    fn snapshot(&self) -> Option<Arc<Image>> {
        if self.cancel.load(Ordering::Relaxed) {
            return None;
        }
        self.slot.snapshot()
    }

    fn stop(&self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.slot.clear();
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            join_handle.abort();
        }
    }
}
