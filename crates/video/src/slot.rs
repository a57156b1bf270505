use {
    crate::*,
    base::Vec2,
    image::Image,
    std::sync::{Arc, Mutex},
    tokio::sync::watch,
};

#[derive(Default)]
struct SlotState {
    size: Option<Vec2<usize>>,
    frame: Option<Arc<Image>>,
}

/// Latest-frame mailbox shared between a producer and any number of readers.
///
/// Publishing replaces the previous frame; readers only ever see the newest
/// one. Readiness is latched: once set it stays set.
#[derive(Clone)]
pub struct FrameSlot {
    state: Arc<Mutex<SlotState>>,
    ready: Arc<watch::Sender<bool>>,
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSlot {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            state: Arc::new(Mutex::new(SlotState::default())),
            ready: Arc::new(ready),
        }
    }

    /// Latch readiness and record the source dimensions.
    pub fn mark_ready(&self, size: Vec2<usize>) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).size = Some(size);
        self.ready.send_if_modified(|ready| {
            let changed = !*ready;
            *ready = true;
            changed
        });
    }

    /// Replace the current frame.
    pub fn publish(&self, image: Image) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.size = Some(image.size);
        state.frame = Some(Arc::new(image));
    }

    /// Drop the current frame; readiness is unaffected.
    pub fn clear(&self) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).frame = None;
    }

    /// Resolve once the slot has been marked ready.
    pub async fn wait_ready(&self) {
        let mut rx = self.readiness();
        // the sender lives as long as self, so this cannot fail
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl FrameSource for FrameSlot {
    fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    fn readiness(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    fn size(&self) -> Option<Vec2<usize>> {
        if !self.is_ready() {
            return None;
        }
        self.state.lock().unwrap_or_else(|e| e.into_inner()).size
    }

    fn snapshot(&self) -> Option<Arc<Image>> {
        if !self.is_ready() {
            return None;
        }
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .frame
            .clone()
    }
}
