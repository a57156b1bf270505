use {crate::*, base::Vec2, crates_image::ImageEncoder};

/// Quality used for frames sent to the detector.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

pub fn rgb_to_jpeg(size: Vec2<usize>, data: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    let expected = size.area() * 3;
    if data.len() != expected {
        return Err(ImageError::Size {
            expected,
            actual: data.len(),
        });
    }
    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(
        &mut buffer,
        quality.clamp(1, 100),
    );
    encoder
        .write_image(
            data,
            size.x as u32,
            size.y as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encode any frame as JPEG. Frames that already are JPEG pass through.
pub fn encode_jpeg(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    if image.format == PixelFormat::Jpeg {
        return Ok(image.data.clone());
    }
    if image.size.x == 0 || image.size.y == 0 {
        return Err(ImageError::Encode(format!("empty frame {}", image.size)));
    }
    let rgb = to_rgb(image)?;
    rgb_to_jpeg(rgb.size, &rgb.data, quality)
}
