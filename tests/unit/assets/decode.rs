use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let bmp = decode_image(&buf).unwrap();
    assert_eq!(bmp.width, 1);
    assert_eq!(bmp.height, 1);
    assert_eq!(bmp.origin, Origin::Local);
    assert_eq!(
        bmp.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn from_straight_checks_length() {
    assert!(Bitmap::from_rgba8_straight(2, 2, vec![0; 15]).is_err());
    let b = Bitmap::from_rgba8_straight(2, 1, vec![255; 8]).unwrap();
    assert_eq!(b.aspect(), 2.0);
    assert_eq!(b.with_origin(Origin::CrossOrigin).origin, Origin::CrossOrigin);
}
