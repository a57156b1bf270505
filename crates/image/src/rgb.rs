use {crate::*, base::Vec2};

pub fn yuyv_to_rgb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(size.area() * 3);

    for chunk in data.chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }

    rgb
}

pub fn rgba_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4).flat_map(|c| [c[0], c[1], c[2]]).collect()
}

pub fn jpeg_to_rgb(image: &Image) -> Result<Image, ImageError> {
    if image.format != PixelFormat::Jpeg {
        return Err(ImageError::Decode(format!(
            "expected Jpeg format, got {:?}",
            image.format
        )));
    }
    decode_to_rgb(&image.data)
}

/// Decode any supported container (JPEG, PNG) into an RGB frame.
pub fn decode_to_rgb(data: &[u8]) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory(data)?;
    let rgb_image = decoded.to_rgb8();
    let (width, height) = rgb_image.dimensions();
    let size = Vec2::new(width as usize, height as usize);
    Ok(Image::new(size, rgb_image.into_raw(), PixelFormat::Rgb8))
}

/// Convert any supported frame to packed RGB.
pub fn to_rgb(image: &Image) -> Result<Image, ImageError> {
    image.validate()?;
    match image.format {
        PixelFormat::Rgb8 => Ok(image.clone()),
        PixelFormat::Rgba8 => Ok(Image::new(
            image.size,
            rgba_to_rgb(&image.data),
            PixelFormat::Rgb8,
        )),
        PixelFormat::Yuyv => Ok(Image::new(
            image.size,
            yuyv_to_rgb(image.size, &image.data),
            PixelFormat::Rgb8,
        )),
        PixelFormat::Jpeg => jpeg_to_rgb(image),
    }
}
