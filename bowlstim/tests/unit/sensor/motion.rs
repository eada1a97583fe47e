use super::*;
use crate::sensor::record::RecordFormat;

fn delta(seq: u64, dy: f64) -> PoseDelta {
    PoseDelta {
        sequence_id: seq,
        dx: 0.1,
        dy,
        dz: 0.0,
    }
}

#[test]
fn gain_and_scale_apply_to_degrees() {
    let mut m = MotionIntegrator::new(2.0, 1.0);
    let raw = format!("FT,1,0.1,0.2,0.0{}", ",0".repeat(21));
    let d = RecordFormat::default().parse(&raw).unwrap();
    let shift = m.apply(&d, 10.0).unwrap();
    let expected = 0.2_f64.to_degrees() * 2.0;
    assert_eq!(shift, expected);
    assert_eq!(m.offset_deg(), expected);

    // Re-reading the same record (same counter) must not integrate twice.
    assert!(m.apply(&d, 10.1).is_none());
    assert_eq!(m.offset_deg(), expected);
    assert_eq!(m.samples().len(), 1);
}

#[test]
fn offsets_accumulate_and_log() {
    let mut m = MotionIntegrator::new(1.0, 0.5);
    m.apply(&delta(1, 0.1), 1.0);
    m.apply(&delta(2, -0.3), 2.0);
    let expected = (0.1_f64.to_degrees() - 0.3_f64.to_degrees()) * 0.5;
    assert!((m.offset_deg() - expected).abs() < 1e-12);
    let log = m.take_samples();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].absolute_time, 2.0);
    assert!(m.samples().is_empty());
    m.reset();
    assert_eq!(m.offset_deg(), 0.0);
}
