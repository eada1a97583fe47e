use std::rc::Rc;

use super::*;
use crate::foundation::core::Canvas;
use crate::foundation::frame::Channels;
use crate::generator::still::StillGenerator;
use crate::sensor::link::ScriptedSensorLink;
use crate::sensor::record::RecordFormat;
use crate::sequence::scene::SceneSpec;
use crate::sequence::sequencer::SequenceConfig;

fn record(seq: u64, dy: f64) -> Option<String> {
    Some(format!("FT,{seq},0.0,{dy},0.0{}", ",0".repeat(21)))
}

fn texture() -> Frame {
    Frame::filled(8, 4, Channels::Gray, 50)
}

#[test]
fn closed_loop_integrates_and_degrades_on_dropout() {
    let link = ScriptedSensorLink::new(
        RecordFormat::default(),
        vec![
            record(1, 0.1),
            None,
            record(2, 0.2),
            record(2, 0.2),
            Some("garbage".to_owned()),
        ],
    );
    let opts = ClosedLoopOpts {
        gain: 2.0,
        roll_coupling: 0.5,
        ..ClosedLoopOpts::default()
    };
    let mut p = ClosedLoopProgram::new(link, texture(), opts);
    p.start(0.0).unwrap();

    let s1 = p.step(1.0).unwrap();
    let first = 0.1_f64.to_degrees() * 2.0;
    assert!(s1.healthy);
    assert_eq!(s1.wait_ms, None);
    assert_eq!(s1.rotation.yaw, first);
    assert_eq!(s1.rotation.roll, 0.5 * first);

    let s2 = p.step(2.0).unwrap();
    assert!(!s2.healthy);
    assert_eq!(s2.wait_ms, Some(DEFAULT_DEGRADED_WAIT_MS));
    assert_eq!(s2.rotation.yaw, first);
    assert!(s2.frame.is_some());

    let s3 = p.step(3.0).unwrap();
    assert!(s3.healthy);
    let total = first + 0.2_f64.to_degrees() * 2.0;
    assert!((p.offset_deg() - total).abs() < 1e-12);

    // Same counter again: connected but stale.
    let s4 = p.step(4.0).unwrap();
    assert!(s4.healthy);
    assert!((p.offset_deg() - total).abs() < 1e-12);

    let s5 = p.step(5.0).unwrap();
    assert!(!s5.healthy);
    assert!((p.offset_deg() - total).abs() < 1e-12);

    assert_eq!(p.dropouts(), 2);
    assert_eq!(p.link().polls(), 5);
    let samples = p.take_sensor_samples();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].absolute_time, 1.0);
    assert!(!p.is_finished());
}

#[test]
fn rotation_program_scales_speed_by_run_time() {
    let mut p = RotationProgram::new(texture(), Rotation::new(0.0, 5.0, 10.0));
    p.start(100.0).unwrap();
    let s = p.step(102.0).unwrap();
    assert_eq!(s.rotation, Rotation::new(0.0, 10.0, 20.0));
    assert_eq!(s.frame, Some(texture()));
}

#[test]
fn generator_program_forwards_frames() {
    let mut p = GeneratorProgram::new("still", StillGenerator::new(texture()), ());
    p.start(0.0).unwrap();
    let s = p.step(0.5).unwrap();
    assert_eq!(s, Step::frame(texture()));
    assert_eq!(p.name(), "still");
    assert!(p.take_events().is_empty());
}

#[test]
fn sequencer_program_blanks_breaks_and_drains_log() {
    let canvas = Canvas {
        width: 8,
        height: 4,
    };
    let scenes: Rc<[SceneSpec]> = Rc::from(vec![SceneSpec::new(
        "only",
        Frame::gray(canvas, 10),
        Frame::gray(canvas, 20),
    )]);
    let mut p = SceneSequencer::new(
        scenes,
        SequenceConfig {
            side_duration: 0.5,
            sides_per_scene: 1,
            break_duration: 0.5,
            ..SequenceConfig::default()
        },
    )
    .unwrap();
    Program::start(&mut p, 0.0).unwrap();

    let s = p.step(0.0).unwrap();
    assert_eq!(s.frame, Some(Frame::gray(canvas, 0)));
    let s = p.step(0.6).unwrap();
    assert_eq!(s.frame, Some(Frame::gray(canvas, 10)));
    let s = p.step(1.2).unwrap();
    assert_eq!(s.frame, None);
    assert!(Program::is_finished(&p));

    let events = p.take_events();
    assert_eq!(events.len(), 3);
    assert!(p.take_events().is_empty());
}
