use super::*;
use crate::foundation::clock::ManualClock;

fn setup(t: f64) -> MovingEdge {
    let clock = ManualClock::new(0.0);
    let handle = ClockHandle::manual(&clock);
    handle.reset();
    clock.set(t);
    handle.update();
    MovingEdge::new(
        handle,
        Canvas {
            width: 72,
            height: 36,
        },
        0,
        200,
    )
}

#[test]
fn edge_extends_with_elapsed_time() {
    let mut g = setup(2.0);
    let f = g
        .produce(&EdgeParams {
            start_deg: 50.0,
            speed_deg_per_sec: 25.0,
        })
        .unwrap();
    assert_eq!(f.sample(5, 0), 0);
    assert_eq!(f.sample(11, 0), 200);
    assert_eq!(f.sample(19, 35), 200);
    assert_eq!(f.sample(25, 0), 0);
}

#[test]
fn negative_speed_sweeps_left() {
    let mut g = setup(2.0);
    let f = g
        .produce(&EdgeParams {
            start_deg: 50.0,
            speed_deg_per_sec: -25.0,
        })
        .unwrap();
    assert_eq!(f.sample(3, 0), 200);
    assert_eq!(f.sample(15, 0), 0);
}
