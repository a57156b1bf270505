use {base::Vec2, image::Image, std::sync::Arc, tokio::sync::watch};

/// Read-only view of a live frame source.
///
/// Sampling never fails: a source that is not ready yet, or that has not
/// produced a frame, simply answers `None`.
pub trait FrameSource: Send + Sync {
    /// True once the device is available. Never goes back to false.
    fn is_ready(&self) -> bool;

    /// Watch the readiness latch; the value flips to true exactly once.
    fn readiness(&self) -> watch::Receiver<bool>;

    /// Current pixel dimensions, known once the source is ready.
    fn size(&self) -> Option<Vec2<usize>>;

    /// The most recent frame, if any.
    fn snapshot(&self) -> Option<Arc<Image>>;

    /// Stop producing frames and release the device.
    fn stop(&self) {}
}
