use super::*;

fn record(tag: &str, extra_fields: usize) -> String {
    let mut s = format!("{tag}, 1, 0.1, 0.2, 0.0");
    for i in 0..extra_fields {
        s.push_str(&format!(", {}.5", i));
    }
    s
}

#[test]
fn well_formed_record_decodes_deltas() {
    let fmt = RecordFormat::default();
    let d = fmt.parse(&record("FT", 21)).unwrap();
    assert_eq!(d.sequence_id, 1);
    assert_eq!(d.dx, 0.1);
    assert_eq!(d.dy, 0.2);
    assert_eq!(d.dz, 0.0);
}

#[test]
fn compact_comma_separation_is_accepted() {
    let fmt = RecordFormat::default();
    let raw = record("FT", 21).replace(", ", ",");
    assert!(fmt.parse(&raw).is_some());
}

#[test]
fn wrong_tag_is_rejected() {
    let fmt = RecordFormat::default();
    assert!(fmt.parse(&record("XX", 21)).is_none());
}

#[test]
fn short_record_is_rejected() {
    let fmt = RecordFormat::default();
    // 5 + 19 = 24 tokens, the minimum must be exceeded.
    assert!(fmt.parse(&record("FT", 19)).is_none());
    assert!(fmt.parse(&record("FT", 20)).is_some());
}

#[test]
fn unparsable_fields_are_rejected() {
    let fmt = RecordFormat::default();
    let bad = record("FT", 21).replacen("0.2", "abc", 1);
    assert!(fmt.parse(&bad).is_none());
    let bad_counter = record("FT", 21).replacen(" 1,", " -1,", 1);
    assert!(fmt.parse(&bad_counter).is_none());
    let nan = record("FT", 21).replacen("0.1", "NaN", 1);
    assert!(fmt.parse(&nan).is_none());
}

#[test]
fn first_record_stops_at_newline_or_padding() {
    let mut region = b"FT, 1, 2\nstale tail".to_vec();
    assert_eq!(first_record(&region), Some("FT, 1, 2"));
    region = b"FT, 3\0\0\0\0".to_vec();
    assert_eq!(first_record(&region), Some("FT, 3"));
    assert_eq!(first_record(&[0u8; 16]), None);
    assert_eq!(first_record(&[0xff, 0xfe, b'\n']), None);
}
