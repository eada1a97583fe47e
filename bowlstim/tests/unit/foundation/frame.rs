use super::*;

fn ramp(width: u32, height: u32) -> Frame {
    let data = (0..width * height).map(|i| (i % width) as u8).collect();
    Frame::from_raw(width, height, Channels::Gray, data).unwrap()
}

#[test]
fn from_raw_rejects_wrong_length() {
    assert!(Frame::from_raw(4, 2, Channels::Rgb, vec![0; 8]).is_err());
    assert!(Frame::from_raw(4, 2, Channels::Rgb, vec![0; 24]).is_ok());
}

#[test]
fn shift_columns_wraps_around() {
    let f = ramp(5, 2);
    let s = f.shift_columns(2);
    // out[x] = in[(x - 2) mod 5]
    assert_eq!(s.pixel(0, 0), &[3]);
    assert_eq!(s.pixel(2, 0), &[0]);
    assert_eq!(s.pixel(4, 1), &[2]);

    let back = f.shift_columns(-2);
    assert_eq!(back.pixel(0, 0), &[2]);
    assert_eq!(f.shift_columns(5), f);
}

#[test]
fn composite_fills_sentinel_from_background() {
    let mut fg = Frame::filled(3, 1, Channels::Gray, TRANSPARENT);
    fg.set_pixel(1, 0, 10);
    let bg = Frame::filled(3, 1, Channels::Gray, 77);
    let out = fg.composite_over(&bg).unwrap();
    assert_eq!(out.data(), &[77, 10, 77]);
}

#[test]
fn composite_rejects_shape_mismatch() {
    let fg = Frame::filled(3, 1, Channels::Gray, 0);
    let bg = Frame::filled(3, 1, Channels::Rgb, 0);
    assert!(fg.composite_over(&bg).is_err());
}

#[test]
fn to_rgb_replicates_gray() {
    let f = ramp(3, 1).to_rgb();
    assert_eq!(f.channels(), Channels::Rgb);
    assert_eq!(f.data(), &[0, 0, 0, 1, 1, 1, 2, 2, 2]);
}

#[test]
fn rotate_180_reverses_pixels() {
    let f = ramp(3, 2).to_rgb();
    let r = f.rotated_180();
    assert_eq!(r.pixel(0, 0), f.pixel(2, 1));
    assert_eq!(r.pixel(2, 1), f.pixel(0, 0));
    assert_eq!(r.rotated_180(), f);
}

#[test]
fn crop_checks_bounds_and_copies_window() {
    let f = ramp(6, 4);
    let c = f.crop(2, 1, 3, 2).unwrap();
    assert_eq!(c.width(), 3);
    assert_eq!(c.height(), 2);
    assert_eq!(c.data(), &[2, 3, 4, 2, 3, 4]);
    assert!(f.crop(4, 0, 3, 1).is_err());
    assert!(f.crop(0, 0, 0, 1).is_err());
}

#[test]
fn fill_rect_clamps_to_bounds() {
    let mut f = Frame::filled(4, 4, Channels::Gray, 0);
    f.fill_rect(-2, 2, 10, 10, 9);
    assert_eq!(f.sample(0, 1), 0);
    assert_eq!(f.sample(0, 2), 9);
    assert_eq!(f.sample(3, 3), 9);
}

#[test]
fn resize_nearest_keeps_channels() {
    let f = ramp(4, 2).to_rgb();
    let r = f.resized_nearest(2, 1);
    assert_eq!(r.width(), 2);
    assert_eq!(r.channels(), Channels::Rgb);
    assert_eq!(r.pixel(1, 0), &[2, 2, 2]);
}
