use std::path::PathBuf;

use super::*;
use crate::foundation::clock::ManualClock;
use crate::foundation::core::{Canvas, Rotation};
use crate::foundation::error::StimError;
use crate::sensor::link::ScriptedSensorLink;
use crate::sensor::record::RecordFormat;

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

fn parse(json: &str) -> ExperimentConfig {
    ExperimentConfig::from_reader(json.as_bytes()).unwrap()
}

fn small(program: &str) -> ExperimentConfig {
    parse(&format!(
        r#"{{ "display": {{ "canvas": {{ "width": 72, "height": 36 }},
                           "fov": {{ "azimuth": [0, 180], "elevation": [0, 180] }} }},
             "program": {program} }}"#
    ))
}

fn clock() -> ClockHandle {
    ClockHandle::manual(&ManualClock::new(0.0))
}

#[test]
fn display_settings_reach_stage_and_presenter() {
    let mut c = small(r#"{ "kind": "still", "texture": { "kind": "uniform", "value": 3 } }"#);
    c.display.inverted = true;
    c.display.rot_offset = Rotation::yaw(90.0);
    c.duration = Some(2.0);
    c.pacing.brackets = false;

    let plan = c.build(&clock()).unwrap();
    assert_eq!(plan.program.name(), "still");
    assert_eq!(
        plan.stage.output_canvas(),
        Canvas {
            width: 36,
            height: 36
        }
    );
    assert!(plan.stage.opts().inverted);
    assert_eq!(plan.stage.opts().rot_offset, Rotation::yaw(90.0));
    assert_eq!(plan.opts.frame_rate, Fps::hz(60).unwrap());
    assert_eq!(plan.opts.duration, Some(2.0));
    assert!(!plan.opts.brackets);
}

#[test]
fn builds_every_generator_program() {
    let programs = [
        (
            r#"{ "kind": "rotation", "texture": { "kind": "uniform", "value": 1 }, "speed": { "yaw": 10 } }"#,
            "rotation",
        ),
        (
            r#"{ "kind": "looming", "params": { "radius": 1, "speed": 10, "distance": 20, "disc": 0, "background": 200 } }"#,
            "looming",
        ),
        (r#"{ "kind": "noise", "block_deg": 10, "seed": 4 }"#, "noise"),
        (
            r#"{ "kind": "edge", "params": { "start_deg": 0, "speed_deg_per_sec": 30 }, "color1": 0, "color2": 200 }"#,
            "edge",
        ),
    ];
    for (json, name) in programs {
        let mut plan = small(json).build(&clock()).unwrap();
        assert_eq!(plan.program.name(), name);
        plan.program.start(0.0).unwrap();
        let step = plan.program.step(0.0).unwrap();
        let frame = step.frame.expect("first step produces a frame");
        let out = plan.stage.apply(&frame, step.rotation).unwrap();
        assert_eq!(out.canvas(), plan.stage.output_canvas());
    }
}

#[test]
fn sequence_scenes_get_default_labels() {
    let c = small(
        r#"{ "kind": "sequence", "timing": { "side_duration": 1.0 },
             "scenes": [
               { "foreground": { "kind": "uniform", "value": 255 }, "background": { "kind": "uniform", "value": 7 } },
               { "foreground": { "kind": "uniform", "value": 255 }, "background": { "kind": "uniform", "value": 8 } }
             ] }"#,
    );
    let mut plan = c.build(&clock()).unwrap();
    assert_eq!(plan.program.name(), "sequence");
    plan.program.start(0.0).unwrap();
    let frame = plan.program.step(0.0).unwrap().frame.unwrap();
    assert_eq!(frame.sample(0, 0), 7);
}

#[test]
fn closed_loop_uses_injected_link() {
    let mut c = small(
        r#"{ "kind": "closed_loop", "region": "unused", "gain": 2.0,
             "texture": { "kind": "uniform", "value": 1 } }"#,
    );
    c.pacing.degraded_wait_ms = 250;
    let link = ScriptedSensorLink::new(RecordFormat::default(), vec![None]);
    let mut plan = c.build_with_link(&clock(), Some(Box::new(link))).unwrap();
    assert_eq!(plan.program.name(), "closed_loop");
    plan.program.start(0.0).unwrap();
    let step = plan.program.step(0.0).unwrap();
    assert!(!step.healthy);
    assert_eq!(step.wait_ms, Some(250));
}

#[test]
fn clip_without_duration_runs_for_its_natural_length() {
    let dir = temp_dir("build_clip");
    std::fs::create_dir_all(&dir).unwrap();
    for i in 0..3u8 {
        image::save_buffer_with_format(
            dir.join(format!("{i:03}.png")),
            &[i * 50; 4],
            2,
            2,
            image::ColorType::L8,
            image::ImageFormat::Png,
        )
        .unwrap();
    }
    let c = small(&format!(
        r#"{{ "kind": "clip", "dir": {}, "rate_hz": 30 }}"#,
        serde_json::to_string(&dir).unwrap()
    ));
    let plan = c.build(&clock()).unwrap();
    assert_eq!(plan.program.name(), "clip");
    let d = plan.opts.duration.unwrap();
    assert!((d - 0.1).abs() < 1e-12, "duration = {d}");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_config_fails_before_building() {
    let mut c = small(r#"{ "kind": "still", "texture": { "kind": "uniform", "value": 3 } }"#);
    c.frame_rate = 0;
    assert!(matches!(c.build(&clock()), Err(StimError::Config(_))));

    let c = small(r#"{ "kind": "clip", "dir": "/nonexistent/bowlstim/clip", "rate_hz": 30 }"#);
    assert!(c.build(&clock()).is_err());

    let c = small(
        r#"{ "kind": "still", "texture": { "kind": "grating_vertical", "color1": 0, "color2": 9, "bar_deg": 0.001 } }"#,
    );
    assert!(c.build(&clock()).is_err());
}
