use super::*;

fn two_tone(red_px: u32, blue_px: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(red_px + blue_px, 1, |x, _| {
        if x < red_px {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    })
}

fn gradient(size: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(size, size, |x, y| {
        image::Rgba([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8, 255])
    })
}

#[test]
fn few_colors_are_kept_exactly_by_population() {
    let reps = representative_colors(&two_tone(3, 7), 8).unwrap();
    assert_eq!(reps, vec![[0, 0, 255, 255], [255, 0, 0, 255]]);

    let reps = representative_colors(&two_tone(5, 5), 2).unwrap();
    assert_eq!(reps, vec![[0, 0, 255, 255], [255, 0, 0, 255]]);
}

#[test]
fn transparent_pixels_are_ignored() {
    let mut img = two_tone(2, 2);
    img.put_pixel(0, 0, image::Rgba([10, 200, 10, 0]));
    let reps = representative_colors(&img, 8).unwrap();
    assert_eq!(reps.len(), 2);
    assert!(reps.iter().all(|c| c[3] == 255));

    let clear = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 0]));
    assert!(representative_colors(&clear, 8).unwrap().is_empty());
}

#[test]
fn rich_image_is_reduced_to_the_budget() {
    let img = gradient(64);
    for k in [1usize, 7, 36, 254] {
        let reps = representative_colors(&img, k).unwrap();
        assert!(!reps.is_empty() && reps.len() <= k, "k = {k}: {}", reps.len());
        assert!(reps.iter().all(|c| c[3] == 255));
        let mut unique = reps.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), reps.len(), "k = {k}");
    }
    assert!(representative_colors(&img, 0).unwrap().is_empty());
}

#[test]
fn reduction_is_deterministic() {
    let img = image::RgbaImage::from_fn(32, 32, |x, y| {
        image::Rgba([(x * 8) as u8, (y * 8) as u8, 77, 255])
    });
    assert_eq!(
        representative_colors(&img, 36).unwrap(),
        representative_colors(&img, 36).unwrap()
    );
}

#[test]
fn dominant_color_comes_first() {
    let mut img = gradient(16);
    for x in 0..16 {
        for y in 0..12 {
            img.put_pixel(x, y, image::Rgba([250, 250, 10, 255]));
        }
    }
    let reps = representative_colors(&img, 4).unwrap();
    let first = reps[0];
    let d: i32 = (0..3)
        .map(|k| (i32::from(first[k]) - i32::from([250u8, 250, 10][k])).pow(2))
        .sum();
    assert!(d < 40 * 40, "first = {first:?}");
}
