use base::Vec2;
use image::{DEFAULT_JPEG_QUALITY, Image, ImageError, PixelFormat};

#[test]
fn test_rgb_to_jpeg_has_soi_marker() {
    let size = Vec2::new(4, 4);
    let data: Vec<u8> = (0..48).collect();

    let jpeg = image::rgb_to_jpeg(size, &data, 90).unwrap();

    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_quality_affects_size() {
    let size = Vec2::new(16, 16);
    let data: Vec<u8> = (0..768).map(|v| (v * 37 % 256) as u8).collect();

    let low = image::rgb_to_jpeg(size, &data, 10).unwrap();
    let high = image::rgb_to_jpeg(size, &data, 100).unwrap();

    assert!(low.len() < high.len());
}

#[test]
fn test_rgb_to_jpeg_rejects_short_buffer() {
    let result = image::rgb_to_jpeg(Vec2::new(4, 4), &[0u8; 10], 80);
    assert!(matches!(
        result,
        Err(ImageError::Size {
            expected: 48,
            actual: 10
        })
    ));
}

#[test]
fn test_encode_jpeg_decodes_back_to_same_size() {
    let frame = Image::solid_rgb(Vec2::new(32, 24), [200, 10, 10]);

    let jpeg = image::encode_jpeg(&frame, DEFAULT_JPEG_QUALITY).unwrap();
    let decoded = image::decode_to_rgb(&jpeg).unwrap();

    assert_eq!(decoded.size, Vec2::new(32, 24));
    assert_eq!(decoded.format, PixelFormat::Rgb8);
    // lossy, but a flat color survives closely
    let r = decoded.data[0] as i32;
    assert!((r - 200).abs() < 10);
}

#[test]
fn test_encode_jpeg_converts_rgba() {
    let size = Vec2::new(8, 8);
    let frame = Image::new(size, vec![128u8; 8 * 8 * 4], PixelFormat::Rgba8);
    let jpeg = image::encode_jpeg(&frame, 80).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_encode_jpeg_passes_jpeg_through() {
    let frame = Image::new(Vec2::new(1, 1), vec![0xFF, 0xD8, 0x00], PixelFormat::Jpeg);
    assert_eq!(image::encode_jpeg(&frame, 80).unwrap(), vec![0xFF, 0xD8, 0x00]);
}

#[test]
fn test_encode_jpeg_rejects_empty_frame() {
    let frame = Image::new(Vec2::new(0, 0), Vec::new(), PixelFormat::Rgb8);
    assert!(matches!(
        image::encode_jpeg(&frame, 80),
        Err(ImageError::Encode(_))
    ));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(image::decode_to_rgb(&[1, 2, 3, 4]).is_err());
}
