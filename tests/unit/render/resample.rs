use super::*;

fn gradient(w: u32, h: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x * 40) as u8, (y * 60) as u8, ((x + y) * 20) as u8, 255])
    })
}

#[test]
fn selector_mapping() {
    assert_eq!(Interpolation::from_selector(0), Interpolation::Nearest);
    assert_eq!(Interpolation::from_selector(1), Interpolation::Bilinear);
    assert_eq!(Interpolation::from_selector(2), Interpolation::Bicubic);
    assert_eq!(Interpolation::from_selector(3), Interpolation::Lanczos);
    assert_eq!(Interpolation::from_selector(4), Interpolation::Nearest);
    assert_eq!(Interpolation::from_selector(-1), Interpolation::Nearest);
    assert_eq!(Interpolation::default(), Interpolation::Nearest);
}

#[test]
fn out_of_range_selector_resamples_like_nearest() {
    let src = gradient(5, 4);
    let nearest = resample(&src, 11, 7, Interpolation::from_selector(0)).unwrap();
    for sel in [-5, 4, 99] {
        let other = resample(&src, 11, 7, Interpolation::from_selector(sel)).unwrap();
        assert_eq!(other, nearest);
    }
}

#[test]
fn output_has_exact_target_dimensions_for_every_mode() {
    let src = gradient(33, 17);
    let before = src.clone();
    for sel in 0..4 {
        let out = resample(&src, 280, 264, Interpolation::from_selector(sel)).unwrap();
        assert_eq!((out.width, out.height), (280, 264));
        assert_eq!(out.data.len(), 280 * 264 * 4);
    }
    assert_eq!(src, before);
}

#[test]
fn solid_color_survives_resampling() {
    let src = image::RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]));
    let out = resample(&src, 280, 264, Interpolation::Nearest).unwrap();
    assert_eq!(out.pixel(140, 132), [255, 0, 0, 255]);
}

#[test]
fn empty_target_is_an_error() {
    let src = gradient(2, 2);
    assert!(matches!(
        resample(&src, 0, 10, Interpolation::Nearest),
        Err(StripeError::Composite(_))
    ));
}
