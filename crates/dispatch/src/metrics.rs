use {std::time::Duration, tokio::time::Instant};

/// Live counters of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelMetrics {
    pub fps: u32,
    pub latency_ms: u64,
    pub count: u64,
    pub errors: u64,
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsUpdate {
    pub fps: Option<u32>,
    pub latency_ms: Option<u64>,
    pub count: Option<u64>,
    pub errors: Option<u64>,
}

impl MetricsUpdate {
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    pub fn latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn errors(mut self, errors: u64) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl ChannelMetrics {
    pub fn update(&mut self, update: MetricsUpdate) {
        if let Some(fps) = update.fps {
            self.fps = fps;
        }
        if let Some(latency_ms) = update.latency_ms {
            self.latency_ms = latency_ms;
        }
        if let Some(count) = update.count {
            self.count = count;
        }
        if let Some(errors) = update.errors {
            self.errors = errors;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Instantaneous rate for one sample interval, `round(1000 / delta_ms)`.
///
/// `None` for a zero interval.
pub fn fps_from_delta(delta: Duration) -> Option<u32> {
    let ms = delta.as_secs_f64() * 1000.0;
    if ms <= 0.0 {
        return None;
    }
    Some((1000.0 / ms).round() as u32)
}

/// Whole milliseconds, rounded to nearest.
pub fn duration_ms(delta: Duration) -> u64 {
    (delta.as_secs_f64() * 1000.0).round() as u64
}

/// Tracks the time between consecutive successful samples.
#[derive(Debug, Clone, Copy)]
pub struct FpsMeter {
    last: Instant,
}

impl FpsMeter {
    /// Start measuring from `start` (the connect or open time).
    pub fn new(start: Instant) -> Self {
        Self { last: start }
    }

    /// Record a successful sample at `now`.
    ///
    /// Returns the new rate, or `None` when no time has passed since the
    /// previous sample; the reference point only moves when a rate is
    /// produced.
    pub fn sample(&mut self, now: Instant) -> Option<u32> {
        let fps = fps_from_delta(now.saturating_duration_since(self.last))?;
        self.last = now;
        Some(fps)
    }
}
