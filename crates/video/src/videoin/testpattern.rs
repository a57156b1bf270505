use {
    crate::{videoin::VideoInDevice, *},
    base::Vec2,
    image::{Image, PixelFormat},
    std::time::Duration,
};

/// Synthetic source: a bright square bouncing over a dark gradient.
#[derive(Debug, Clone)]
pub struct TestPatternConfig {
    pub size: Vec2<usize>,
    pub frame_rate: f32,
}

impl Default for TestPatternConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(640, 480),
            frame_rate: 30.0,
        }
    }
}

pub(crate) struct TestPattern {
    config: TestPatternConfig,
    frame_index: u64,
    open: bool,
}

impl TestPattern {
    pub fn new(config: TestPatternConfig) -> Self {
        Self {
            config,
            frame_index: 0,
            open: false,
        }
    }

    fn render(&self) -> Image {
        let Vec2 { x: width, y: height } = self.config.size;
        let mut data = vec![0u8; width * height * 3];
        let side = (width.min(height) / 4).max(1);
        let span_x = width.saturating_sub(side).max(1);
        let span_y = height.saturating_sub(side).max(1);
        let t = self.frame_index as usize;
        // triangle wave so the square bounces off the edges
        let bounce = |t: usize, span: usize| {
            let period = span * 2;
            let p = t % period;
            if p < span { p } else { period - p }
        };
        let sx = bounce(t * 4, span_x);
        let sy = bounce(t * 3, span_y);

        for y in 0..height {
            for x in 0..width {
                let i = (y * width + x) * 3;
                let inside = x >= sx && x < sx + side && y >= sy && y < sy + side;
                if inside {
                    data[i..i + 3].copy_from_slice(&[240, 200, 160]);
                } else {
                    let shade = ((x + y) * 64 / (width + height).max(1)) as u8;
                    data[i..i + 3].copy_from_slice(&[shade, shade, shade.saturating_add(32)]);
                }
            }
        }
        Image::new(self.config.size, data, PixelFormat::Rgb8)
    }
}

impl VideoInDevice for TestPattern {
    fn open(&mut self) -> Result<Vec2<usize>, VideoError> {
        if self.config.size.x == 0 || self.config.size.y == 0 {
            return Err(VideoError::Device(format!(
                "invalid test pattern size {}",
                self.config.size
            )));
        }
        if self.config.frame_rate <= 0.0 {
            return Err(VideoError::Device(format!(
                "invalid frame rate {}",
                self.config.frame_rate
            )));
        }
        self.open = true;
        self.frame_index = 0;
        Ok(self.config.size)
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        if !self.open {
            return Err(VideoError::Stream("test pattern is not open".to_string()));
        }
        std::thread::sleep(Duration::from_secs_f32(1.0 / self.config.frame_rate));
        let frame = self.render();
        self.frame_index += 1;
        Ok(frame)
    }
}
