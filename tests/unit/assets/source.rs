use std::io::Cursor;

use super::*;

fn write_png(path: &Path, w: u32, h: u32) {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([40, 80, 120]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

#[test]
fn lists_recognized_extensions_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.PNG", "a.jpg", "c.jpeg", "notes.txt", "d.webp"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("e.png")).unwrap();

    let names: Vec<String> = list_images(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.jpg", "b.PNG", "c.jpeg"]);
}

#[test]
fn missing_folder_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = list_images(&dir.path().join("nope")).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn load_skips_corrupt_files_and_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("01.png"), 4, 2);
    std::fs::write(dir.path().join("02.png"), b"garbage").unwrap();
    write_png(&dir.path().join("03.png"), 2, 2);

    let paths = list_images(dir.path()).unwrap();
    let loaded = load_images(&paths, 4);

    assert_eq!(loaded.images.len(), 2);
    assert_eq!(loaded.images[0].image.width, 8);
    assert_eq!(loaded.images[1].image.width, 4);
    assert!(loaded.images[0].path.ends_with("01.png"));
    assert_eq!(loaded.skipped.len(), 1);
    assert!(matches!(
        &loaded.skipped[0],
        ReelWarning::SkippedImage { path, .. } if path.ends_with("02.png")
    ));
}
