use super::*;

fn raster(tainted: bool) -> Raster {
    Raster {
        width: 8,
        height: 4,
        data: [0u8, 0, 128, 128].repeat(32),
        tainted,
        skipped: Vec::new(),
    }
}

#[test]
fn png_round_trips_straight_alpha() {
    let bytes = encode_raster(&raster(false), &ExportOpts::default()).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (8, 4));
    assert_eq!(img.get_pixel(3, 2).0, [0, 0, 255, 128]);
}

#[test]
fn scale_resizes_before_encoding() {
    let opts = ExportOpts::default().with_scale(0.5);
    let bytes = encode_raster(&raster(false), &opts).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (4, 2));
}

#[test]
fn jpeg_is_encoded_at_requested_quality() {
    let opts = ExportOpts::default().with_format(ExportFormat::Jpeg { quality: 80 });
    let bytes = encode_raster(&raster(false), &opts).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn tainted_frame_exports_nothing() {
    let bytes = encode_raster(&raster(true), &ExportOpts::default()).unwrap();
    assert!(bytes.is_empty());
}

#[test]
fn rejects_bad_options() {
    let zero = ExportOpts::default().with_scale(0.0);
    assert!(encode_raster(&raster(false), &zero).is_err());
    let q = ExportOpts::default().with_format(ExportFormat::Jpeg { quality: 0 });
    assert!(encode_raster(&raster(false), &q).is_err());
}

#[test]
fn scaled_size_never_collapses_to_zero() {
    assert_eq!(scaled_size(1290, 2796, 0.5), (645, 1398));
    assert_eq!(scaled_size(3, 3, 0.01), (1, 1));
}
