use super::*;
use crate::foundation::clock::TimeSource;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "bowlstim_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

fn frame(v: u8) -> Frame {
    Frame::filled(3, 2, Channels::Rgb, v)
}

#[test]
fn headless_sink_counts_and_cancels_after_limit() {
    let clock = ManualClock::new(5.0);
    let mut sink = HeadlessSink::new(StopCondition {
        max_presents: Some(2),
        stop_file: None,
    })
    .with_manual_clock(clock.clone())
    .with_history();

    sink.present(&frame(1)).unwrap();
    assert!(!sink.poll_cancel());
    sink.wait(250).unwrap();
    sink.present(&frame(2)).unwrap();
    assert!(sink.poll_cancel());

    assert_eq!(sink.frames_presented(), 2);
    assert_eq!(sink.waited_ms(), 250);
    assert!((clock.now_secs() - 5.25).abs() < 1e-12);
    assert_eq!(sink.last_frame(), Some(&frame(2)));
    assert_eq!(sink.history().len(), 2);

    sink.close().unwrap();
    assert!(sink.is_closed());
    assert!(matches!(sink.present(&frame(3)), Err(StimError::Sink(_))));
}

#[test]
fn stop_file_cancels() {
    let dir = temp_dir("stop");
    std::fs::create_dir_all(&dir).unwrap();
    let stop = dir.join("STOP");
    let cond = StopCondition {
        max_presents: None,
        stop_file: Some(stop.clone()),
    };
    assert!(!cond.triggered(1_000));
    std::fs::write(&stop, b"").unwrap();
    assert!(cond.triggered(0));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_sequence_writes_numbered_frames() {
    let dir = temp_dir("png_seq");
    let mut sink = PngSequenceSink::create(
        &dir,
        StopCondition {
            max_presents: Some(2),
            stop_file: None,
        },
    )
    .unwrap();
    sink.present(&frame(10)).unwrap();
    sink.present(&Frame::filled(3, 2, Channels::Gray, 20)).unwrap();
    assert!(sink.poll_cancel());
    sink.close().unwrap();

    let img = image::open(dir.join("frame_000000.png")).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0, [10, 10, 10]);
    assert!(dir.join("frame_000001.png").exists());
    assert_eq!(sink.frames_written(), 2);
    let _ = std::fs::remove_dir_all(&dir);
}
