use {
    base::Vec2,
    image::{ImageError, JPEG_MIME, encode_jpeg, to_data_url},
    video::FrameSource,
};

/// One encoded frame, owned by the send that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub jpeg: Vec<u8>,
    pub size: Vec2<usize>,
}

impl FrameSnapshot {
    /// `data:image/jpeg;base64,...`
    pub fn to_data_url(&self) -> String {
        to_data_url(JPEG_MIME, &self.jpeg)
    }
}

/// Encode the source's current frame.
///
/// `Ok(None)` when the source is not ready or has no frame yet.
pub fn sample(source: &dyn FrameSource, quality: u8) -> Result<Option<FrameSnapshot>, ImageError> {
    if !source.is_ready() {
        return Ok(None);
    }
    let Some(frame) = source.snapshot() else {
        return Ok(None);
    };
    let jpeg = encode_jpeg(&frame, quality)?;
    Ok(Some(FrameSnapshot {
        jpeg,
        size: frame.size,
    }))
}
