use super::*;
use crate::foundation::clock::ManualClock;

#[test]
fn angular_radius_follows_approach() {
    assert!((angular_radius_deg(1.0, 1.0, 0.0, 0.0) - 45.0).abs() < 1e-12);
    assert_eq!(angular_radius_deg(1.0, 10.0, 10.0, 1.0), 90.0);
    assert_eq!(angular_radius_deg(1.0, 10.0, 10.0, 5.0), 90.0);
    assert!(angular_radius_deg(1.0, 10.0, 5.0, 1.0) > angular_radius_deg(1.0, 10.0, 5.0, 0.5));
}

#[test]
fn disk_grows_to_hemisphere() {
    let clock = ManualClock::new(0.0);
    let handle = ClockHandle::manual(&clock);
    handle.reset();
    let canvas = Canvas {
        width: 72,
        height: 36,
    };
    let mut g = LoomingDisk::new(handle.clone(), canvas, None);
    let params = LoomingParams {
        radius: 1.0,
        speed: 10.0,
        distance: 10.0,
        disc: 0,
        background: 200,
    };

    let small = g.produce(&params).unwrap();
    assert_eq!(small.sample(36, 18), 0);
    assert_eq!(small.sample(36, 20), 200);

    clock.set(1.0);
    handle.update();
    let full = g.produce(&params).unwrap();
    assert_eq!(full.sample(36, 0), 0);
    assert_eq!(full.sample(0, 0), 200);
}
