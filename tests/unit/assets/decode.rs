use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn scaled_width_rounds_to_nearest() {
    assert_eq!(scaled_width(800, 600, 1080), 1440);
    // 1000 * 100 / 300 = 333.33
    assert_eq!(scaled_width(1000, 300, 100), 333);
    // 1000 * 100 / 600 = 166.67
    assert_eq!(scaled_width(1000, 600, 100), 167);
    assert_eq!(scaled_width(1, 10_000, 10), 1);
}

#[test]
fn decode_scales_to_target_height() {
    let bytes = png_bytes(8, 6, [10, 20, 30, 255]);
    let img = decode_image(&bytes, 12).unwrap();
    assert_eq!(img.height, 12);
    assert_eq!(img.width, 16);
    assert_eq!(img.rgb8.len(), 16 * 12 * 3);
    assert_eq!(&img.rgb8[0..3], &[10, 20, 30]);
}

#[test]
fn decode_drops_alpha() {
    let bytes = png_bytes(2, 2, [200, 100, 50, 0]);
    let img = decode_image(&bytes, 2).unwrap();
    assert_eq!(img.rgb8.len(), 2 * 2 * 3);
    assert_eq!(&img.rgb8[0..3], &[200, 100, 50]);
}

#[test]
fn truncated_bytes_are_decode_errors() {
    let mut bytes = png_bytes(4, 4, [1, 2, 3, 255]);
    bytes.truncate(bytes.len() / 3);
    let err = decode_image(&bytes, 4).unwrap_err();
    assert!(matches!(err, ReelError::Decode { .. }));
}

#[test]
fn decode_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();
    match decode_image_file(&path, 4).unwrap_err() {
        ReelError::Decode { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn from_rgb8_checks_length() {
    assert!(NormalizedImage::from_rgb8(2, 2, vec![0; 12]).is_ok());
    assert!(NormalizedImage::from_rgb8(2, 2, vec![0; 11]).is_err());
    assert!(NormalizedImage::from_rgb8(0, 2, vec![]).is_err());
}
