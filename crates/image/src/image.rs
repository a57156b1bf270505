use {crate::*, base::Vec2};

/// A single frame: pixel buffer plus its dimensions and layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// A uniformly colored RGB frame.
    pub fn solid_rgb(size: Vec2<usize>, color: [u8; 3]) -> Self {
        let data = color.repeat(size.area());
        Self::new(size, data, PixelFormat::Rgb8)
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    /// Check that the buffer length matches size and format.
    ///
    /// Compressed images are not checked.
    pub fn validate(&self) -> Result<(), ImageError> {
        if let Some(bpp) = self.format.bytes_per_pixel() {
            let expected = self.size.area() * bpp;
            if self.data.len() != expected {
                return Err(ImageError::Size {
                    expected,
                    actual: self.data.len(),
                });
            }
        }
        Ok(())
    }
}
