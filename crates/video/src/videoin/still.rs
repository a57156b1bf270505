use {
    crate::{videoin::VideoInDevice, *},
    base::Vec2,
    image::Image,
    std::{path::PathBuf, time::Duration},
};

/// Replays a single decoded image file at a fixed rate.
#[derive(Debug, Clone)]
pub struct StillImageConfig {
    pub path: PathBuf,
    pub frame_rate: f32,
}

impl StillImageConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame_rate: 30.0,
        }
    }
}

pub(crate) struct StillImage {
    config: StillImageConfig,
    image: Option<Image>,
}

impl StillImage {
    pub fn new(config: StillImageConfig) -> Self {
        Self {
            config,
            image: None,
        }
    }
}

impl VideoInDevice for StillImage {
    fn open(&mut self) -> Result<Vec2<usize>, VideoError> {
        if self.config.frame_rate <= 0.0 {
            return Err(VideoError::Device(format!(
                "invalid frame rate {}",
                self.config.frame_rate
            )));
        }
        let bytes = std::fs::read(&self.config.path)?;
        let image = image::decode_to_rgb(&bytes)?;
        let size = image.size;
        self.image = Some(image);
        Ok(size)
    }

    fn close(&mut self) {
        self.image = None;
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        std::thread::sleep(Duration::from_secs_f32(1.0 / self.config.frame_rate));
        self.image
            .clone()
            .ok_or_else(|| VideoError::Stream("still image is not open".to_string()))
    }
}
