use super::*;

const COLORS: [[u8; 4]; 7] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 255, 0, 255],
    [0, 255, 255, 255],
    [255, 0, 255, 255],
    [255, 255, 255, 255],
];

fn solid(w: u32, h: u32, c: [u8; 4]) -> image::RgbaImage {
    image::RgbaImage::from_pixel(w, h, image::Rgba(c))
}

fn opaque_masks() -> MaskSet {
    let panel = Raster::filled(300, 264, [255, 255, 255, 255]);
    MaskSet {
        left: panel.clone(),
        center: panel.clone(),
        right: panel,
        separator: Raster::filled(CANVAS_WIDTH, CANVAS_HEIGHT, [0, 0, 0, 0]),
    }
}

fn solid_sources(counts: [usize; 7]) -> Vec<SourceAnimation> {
    Weekday::ALL
        .iter()
        .zip(counts)
        .map(|(&day, n)| SourceAnimation {
            day,
            frames: vec![solid(16, 9, COLORS[day.index()]); n],
        })
        .collect()
}

fn settings(offsets: [i32; 7]) -> Settings {
    Settings {
        sources: Default::default(),
        offsets,
        interpolation: Interpolation::Nearest,
        quantize: false,
        watermark: false,
    }
}

fn color_at(palette: &Palette, frame: &OutputFrame, x: u32, y: u32) -> [u8; 4] {
    let i = frame.indices[(y * frame.width + x) as usize];
    palette.colors()[usize::from(i)]
}

fn slot_center_x(day: Weekday) -> u32 {
    (125 + 250 * day.index()) as u32
}

#[test]
fn solid_sources_land_in_their_slots() {
    let sources = solid_sources([1; 7]);
    let masks = opaque_masks();
    let palette = Palette::system();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([0; 7])).unwrap();

    let frames = comp.compose_all(false).unwrap();
    assert_eq!(frames.len(), 1);
    let f = &frames[0];
    assert_eq!((f.width, f.height), (CANVAS_WIDTH, CANVAS_HEIGHT));
    assert_eq!(f.indices.len(), (CANVAS_WIDTH * CANVAS_HEIGHT) as usize);
    assert_eq!(f.delay, 1);
    assert_eq!(f.disposal, Disposal::RestoreBackground);
    for day in Weekday::ALL {
        for y in [0, 122, 243] {
            assert_eq!(
                color_at(&palette, f, slot_center_x(day), y),
                COLORS[day.index()],
                "{day} at y={y}"
            );
        }
    }
}

#[test]
fn later_slot_is_drawn_over_the_overlap() {
    let sources = solid_sources([1; 7]);
    let masks = opaque_masks();
    let palette = Palette::system();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([0; 7])).unwrap();
    let f = comp.compose_frame(0).unwrap();
    // Monday covers x < 265, Tuesday starts at 235.
    assert_eq!(color_at(&palette, &f, 250, 100), COLORS[1]);
    assert_eq!(color_at(&palette, &f, 230, 100), COLORS[0]);
}

#[test]
fn frame_count_is_the_shortest_source() {
    let mut sources = solid_sources([5, 5, 3, 5, 5, 5, 5]);
    // Trailing frames of the long sources are black; they must never show up.
    for src in &mut sources {
        for f in src.frames.iter_mut().skip(3) {
            *f = solid(16, 9, [0, 0, 0, 255]);
        }
    }
    let masks = opaque_masks();
    let palette = Palette::system();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([0; 7])).unwrap();
    assert_eq!(comp.frame_count(), 3);

    let frames = comp.compose_all(false).unwrap();
    assert_eq!(frames.len(), 3);
    for f in &frames {
        assert_eq!(color_at(&palette, f, slot_center_x(Weekday::Monday), 50), COLORS[0]);
    }
    assert!(matches!(
        comp.compose_frame(3),
        Err(StripeError::InvalidInput(_))
    ));
}

#[test]
fn empty_source_produces_no_frames() {
    let sources = solid_sources([2, 2, 2, 2, 0, 2, 2]);
    let masks = opaque_masks();
    let palette = Palette::system();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([0; 7])).unwrap();
    assert_eq!(comp.frame_count(), 0);
    assert!(comp.compose_all(false).unwrap().is_empty());
    assert!(comp.compose_all(true).unwrap().is_empty());
}

#[test]
fn every_frame_has_canvas_size_regardless_of_source_size() {
    let mut sources = solid_sources([1; 7]);
    sources[0].frames = vec![solid(1, 1, COLORS[0])];
    sources[3].frames = vec![solid(900, 700, COLORS[3])];
    let masks = opaque_masks();
    let palette = Palette::system();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([0; 7])).unwrap();
    let f = comp.compose_frame(0).unwrap();
    assert_eq!((f.width, f.height), (1750, 244));
    assert_eq!(color_at(&palette, &f, slot_center_x(Weekday::Thursday), 10), COLORS[3]);
}

#[test]
fn offset_moves_only_its_weekday() {
    let sources = solid_sources([1; 7]);
    let masks = opaque_masks();
    let palette = Palette::system();

    let base = Compositor::new(&sources, &masks, &palette, &settings([0; 7]))
        .unwrap()
        .compose_frame(0)
        .unwrap();
    let shifted = Compositor::new(&sources, &masks, &palette, &settings([20, 0, 0, 0, 0, 0, 0]))
        .unwrap()
        .compose_frame(0)
        .unwrap();

    // Monday now starts at x = 5; the strip edge falls back to the background.
    assert_eq!(color_at(&palette, &base, 2, 100), COLORS[0]);
    assert_eq!(color_at(&palette, &shifted, 2, 100), palette.background());
    assert_eq!(color_at(&palette, &shifted, 6, 100), COLORS[0]);
    for day in &Weekday::ALL[1..] {
        let x = slot_center_x(*day);
        assert_eq!(color_at(&palette, &shifted, x, 100), color_at(&palette, &base, x, 100));
    }
}

#[test]
fn separator_is_drawn_last() {
    let sources = solid_sources([1; 7]);
    let mut masks = opaque_masks();
    for y in 0..CANVAS_HEIGHT {
        masks.separator.put_pixel(slot_center_x(Weekday::Friday), y, [0, 0, 0, 255]);
    }
    let palette = Palette::system();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([0; 7])).unwrap();
    let f = comp.compose_frame(0).unwrap();
    let x = slot_center_x(Weekday::Friday);
    assert_eq!(color_at(&palette, &f, x, 0), [0, 0, 0, 255]);
    assert_eq!(color_at(&palette, &f, x + 1, 0), COLORS[4]);
}

#[test]
fn transparent_mask_leaves_background() {
    let sources = solid_sources([1; 7]);
    let mut masks = opaque_masks();
    masks.center = Raster::filled(300, 264, [0, 0, 0, 0]);
    let palette = Palette::system();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([0; 7])).unwrap();
    let f = comp.compose_frame(0).unwrap();
    assert_eq!(
        color_at(&palette, &f, slot_center_x(Weekday::Wednesday), 100),
        palette.background()
    );
    assert_eq!(color_at(&palette, &f, slot_center_x(Weekday::Monday), 100), COLORS[0]);
    assert_eq!(color_at(&palette, &f, slot_center_x(Weekday::Sunday), 100), COLORS[6]);
}

#[test]
fn built_palette_starts_transparent() {
    let sources = solid_sources([1; 7]);
    let mut masks = opaque_masks();
    masks.center = Raster::filled(300, 264, [0, 0, 0, 0]);
    let reps: Vec<_> = sources.iter().map(|s| s.frames[0].clone()).collect();
    let palette = crate::palette::build_shared_palette(&reps).unwrap();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([0; 7])).unwrap();
    let f = comp.compose_frame(0).unwrap();
    let i = f.indices[(100 * f.width + slot_center_x(Weekday::Thursday)) as usize];
    assert_eq!(i, 0);
    assert_eq!(color_at(&palette, &f, slot_center_x(Weekday::Monday), 100), COLORS[0]);
}

#[test]
fn parallel_matches_sequential() {
    let mut sources = solid_sources([4; 7]);
    for (k, src) in sources.iter_mut().enumerate() {
        for (i, f) in src.frames.iter_mut().enumerate() {
            *f = image::RgbaImage::from_fn(8, 8, |x, y| {
                image::Rgba([(x * 30) as u8, (y * 30) as u8, (k * 30 + i * 10) as u8, 255])
            });
        }
    }
    let masks = opaque_masks();
    let palette = Palette::system();
    let comp = Compositor::new(&sources, &masks, &palette, &settings([3, -2, 0, 7, 0, 0, -9]))
        .unwrap();
    assert_eq!(comp.compose_all(false).unwrap(), comp.compose_all(true).unwrap());
}

#[test]
fn sources_must_be_seven_in_weekday_order() {
    let masks = opaque_masks();
    let palette = Palette::system();

    let short = solid_sources([1; 7])[..6].to_vec();
    assert!(matches!(
        Compositor::new(&short, &masks, &palette, &settings([0; 7])),
        Err(StripeError::InvalidInput(_))
    ));

    let mut swapped = solid_sources([1; 7]);
    swapped.swap(0, 1);
    assert!(matches!(
        Compositor::new(&swapped, &masks, &palette, &settings([0; 7])),
        Err(StripeError::InvalidInput(_))
    ));
}

#[test]
fn overflowing_offset_is_rejected_without_panicking() {
    let sources = solid_sources([1; 7]);
    let masks = opaque_masks();
    let palette = Palette::system();
    let err = Compositor::new(
        &sources,
        &masks,
        &palette,
        &settings([i32::MAX, 0, 0, 0, 0, 0, 0]),
    )
    .unwrap_err();
    assert!(matches!(err, StripeError::InvalidInput(_)));
    assert!(err.to_string().contains("monday"));
}

#[test]
fn largest_offset_moves_panel_off_canvas() {
    let sources = solid_sources([1; 7]);
    let masks = opaque_masks();
    let palette = Palette::system();
    let offsets = [
        crate::render::layout::MAX_OFFSET,
        0,
        0,
        0,
        0,
        0,
        -crate::render::layout::MAX_OFFSET,
    ];
    let f = Compositor::new(&sources, &masks, &palette, &settings(offsets))
        .unwrap()
        .compose_frame(0)
        .unwrap();
    assert_eq!(color_at(&palette, &f, 2, 100), palette.background());
    assert_eq!(color_at(&palette, &f, 1745, 100), palette.background());
    assert_eq!(color_at(&palette, &f, slot_center_x(Weekday::Wednesday), 100), COLORS[2]);
}

#[test]
fn overlap_is_blended_before_palette_mapping() {
    let sources = solid_sources([1; 7]);
    let mut masks = opaque_masks();
    masks.center = Raster::filled(300, 264, [128, 128, 128, 128]);
    let palette = Palette::system();
    let f = Compositor::new(&sources, &masks, &palette, &settings([0; 7]))
        .unwrap()
        .compose_frame(0)
        .unwrap();

    // x = 250: opaque Monday red under half-weight Tuesday green.
    let blended = crate::foundation::math::src_over(COLORS[0], COLORS[1], 128);
    let expected = PaletteIndexer::new(&palette).index_of(blended);
    assert_eq!(f.indices[(100 * f.width + 250) as usize], expected);
}
