use {crate::Color, std::time::Duration};

pub const DEFAULT_POLL_URL: &str = "http://localhost:8000/detect-hand";
pub const DEFAULT_STREAM_URL: &str = "ws://localhost:8000/ws/detect-hand";
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(150);

/// Configuration shared by a session and its two channels.
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    poll_url: String,
    stream_url: String,
    interval: Duration,
    jpeg_quality: u8,
    poll_label: String,
    poll_color: Color,
    stream_label: String,
    stream_color: Color,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            poll_url: DEFAULT_POLL_URL.to_string(),
            stream_url: DEFAULT_STREAM_URL.to_string(),
            interval: DEFAULT_INTERVAL,
            jpeg_quality: image::DEFAULT_JPEG_QUALITY,
            poll_label: "HTTP".to_string(),
            poll_color: Color::GREEN,
            stream_label: "WS".to_string(),
            stream_color: Color::DEEP_SKY_BLUE,
        }
    }
}

impl DispatchConfig {
    /// Set the polling endpoint (HTTP POST).
    pub fn with_poll_url(mut self, url: impl Into<String>) -> Self {
        self.poll_url = url.into();
        self
    }

    /// Set the streaming endpoint (WebSocket).
    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    /// Set the sampling period of both channels.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the JPEG quality, clamped to 1..=100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_poll_label(mut self, label: impl Into<String>) -> Self {
        self.poll_label = label.into();
        self
    }

    pub fn with_poll_color(mut self, color: Color) -> Self {
        self.poll_color = color;
        self
    }

    pub fn with_stream_label(mut self, label: impl Into<String>) -> Self {
        self.stream_label = label.into();
        self
    }

    pub fn with_stream_color(mut self, color: Color) -> Self {
        self.stream_color = color;
        self
    }

    // Getters
    pub fn poll_url(&self) -> &str {
        &self.poll_url
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn poll_label(&self) -> &str {
        &self.poll_label
    }

    pub fn poll_color(&self) -> Color {
        self.poll_color
    }

    pub fn stream_label(&self) -> &str {
        &self.stream_label
    }

    pub fn stream_color(&self) -> Color {
        self.stream_color
    }
}
