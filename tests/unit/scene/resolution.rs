use super::*;

#[test]
fn named_profiles_resolve_to_pixels() {
    let r: OutputResolution = "iphone-6.7".parse().unwrap();
    assert_eq!(r, OutputResolution::IPhone67);
    assert_eq!(r.size(), (1290, 2796));
    assert_eq!(r.to_string(), "iphone-6.7");
    assert_eq!(OutputResolution::IPad129.canvas().unwrap().width, 2048);
    assert_eq!(OutputResolution::named().count(), 8);
}

#[test]
fn custom_sizes_parse_and_validate() {
    let r: OutputResolution = "300X600".parse().unwrap();
    assert_eq!(r, OutputResolution::Custom {
        width: 300,
        height: 600
    });
    assert_eq!(r.to_string(), "300x600");
    assert!("0x600".parse::<OutputResolution>().is_err());
    assert!("pixel-9".parse::<OutputResolution>().is_err());
}
