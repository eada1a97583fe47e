use super::*;

fn temp_region(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "bowlstim_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

fn valid_record(seq: u64, dy: f64) -> String {
    let mut s = format!("FT, {seq}, 0.0, {dy}, 0.0");
    for _ in 0..21 {
        s.push_str(", 0");
    }
    s
}

#[test]
fn bare_names_resolve_under_dev_shm() {
    assert_eq!(
        resolve_region_path("FicTracOutput"),
        PathBuf::from("/dev/shm/FicTracOutput")
    );
    assert_eq!(
        resolve_region_path("/tmp/region"),
        PathBuf::from("/tmp/region")
    );
}

#[test]
fn missing_region_is_absent_not_an_error() {
    let path = temp_region("missing");
    let mut link = ShmSensorLink::new(
        path.to_str().unwrap(),
        RecordFormat::default(),
        DEFAULT_REGION_BYTES,
    );
    assert!(link.poll().is_none());
}

#[test]
fn region_file_is_decoded_and_padding_ignored() {
    let path = temp_region("decode");
    let mut bytes = valid_record(7, 0.25).into_bytes();
    bytes.push(b'\n');
    bytes.resize(DEFAULT_REGION_BYTES, 0);
    std::fs::write(&path, &bytes).unwrap();

    let mut link = ShmSensorLink::new(
        path.to_str().unwrap(),
        RecordFormat::default(),
        DEFAULT_REGION_BYTES,
    );
    let d = link.poll().unwrap();
    assert_eq!(d.sequence_id, 7);
    assert_eq!(d.dy, 0.25);

    std::fs::write(&path, b"garbage\n").unwrap();
    assert!(link.poll().is_none());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn scripted_link_replays_then_goes_absent() {
    let mut link = ScriptedSensorLink::new(
        RecordFormat::default(),
        vec![Some(valid_record(1, 0.1)), None, Some("FT, 2".to_string())],
    );
    assert!(link.poll().is_some());
    assert!(link.poll().is_none());
    assert!(link.poll().is_none());
    assert!(link.poll().is_none());
    assert_eq!(link.polls(), 4);
    assert_eq!(link.remaining(), 0);
}
