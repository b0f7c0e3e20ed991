use super::*;

fn img(w: u32, h: u32) -> NormalizedImage {
    NormalizedImage::from_rgb8(w, h, vec![0; w as usize * h as usize * 3]).unwrap()
}

#[test]
fn offsets_are_running_sums_with_padding() {
    let layout = StripLayout::new(vec![img(10, 4), img(7, 4), img(3, 4)], 2).unwrap();
    let offsets: Vec<i64> = layout.items().iter().map(|it| it.x_offset).collect();
    assert_eq!(offsets, vec![0, 12, 21]);
    assert_eq!(layout.total_width(), 10 + 7 + 3 + 2 * 2);
    assert_eq!(layout.padded_prefix_width(2), 12 + 9);
}

#[test]
fn total_width_matches_closed_form_for_any_count() {
    for n in 1..=6u32 {
        let images: Vec<_> = (0..n).map(|i| img(5 + i, 3)).collect();
        let sum: i64 = images.iter().map(|i| i64::from(i.width)).sum();
        let layout = StripLayout::new(images, 3).unwrap();
        assert_eq!(layout.total_width(), sum + 3 * i64::from(n - 1));
        let offsets: Vec<i64> = layout.items().iter().map(|it| it.x_offset).collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn zero_padding_packs_images_edge_to_edge() {
    let layout = StripLayout::new(vec![img(4, 2), img(4, 2)], 0).unwrap();
    assert_eq!(layout.items()[1].x_offset, 4);
    assert_eq!(layout.total_width(), 8);
}

#[test]
fn empty_and_mixed_height_inputs_fail() {
    assert!(matches!(
        StripLayout::new(vec![], 2),
        Err(ReelError::InsufficientInput { found: 0, .. })
    ));
    assert!(StripLayout::new(vec![img(4, 2), img(4, 3)], 2).is_err());
}

#[test]
fn ensure_at_least_reports_counts() {
    let layout = StripLayout::new(vec![img(4, 2), img(4, 2)], 2).unwrap();
    match layout.ensure_at_least(3).unwrap_err() {
        ReelError::InsufficientInput { found, required } => {
            assert_eq!((found, required), (2, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
    layout.ensure_at_least(2).unwrap();
}
