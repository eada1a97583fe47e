use super::*;
use crate::foundation::clock::ManualClock;

fn canvas() -> Canvas {
    Canvas {
        width: 72,
        height: 36,
    }
}

fn generator(clock: &std::rc::Rc<ManualClock>) -> (NoiseGenerator, ClockHandle) {
    let handle = ClockHandle::manual(clock);
    handle.reset();
    let g = NoiseGenerator::new(
        handle.clone(),
        canvas(),
        FieldOfView::default(),
        10.0,
        Fps::hz(DEFAULT_NOISE_HZ).unwrap(),
        0,
    )
    .unwrap();
    (g, handle)
}

#[test]
fn noise_is_binary_inside_window_and_black_outside() {
    let clock = ManualClock::new(0.0);
    let (mut g, _) = generator(&clock);
    let f = g.produce(&()).unwrap();
    assert!(f.data().iter().all(|&v| v == 0 || v == 255));
    for y in 0..36 {
        assert_eq!(f.sample(50, y), 0);
    }
    for x in 0..72 {
        assert_eq!(f.sample(x, 0), 0);
        assert_eq!(f.sample(x, 35), 0);
    }
    assert!(f.data().contains(&255));
}

#[test]
fn pattern_refreshes_at_local_rate() {
    let clock = ManualClock::new(0.0);
    let (mut g, handle) = generator(&clock);
    let first = g.produce(&()).unwrap();

    clock.set(0.01);
    handle.update();
    assert_eq!(g.produce(&()).unwrap(), first);
    assert_eq!(g.patterns_drawn(), 1);

    clock.set(0.04);
    handle.update();
    g.produce(&()).unwrap();
    assert_eq!(g.patterns_drawn(), 2);
}

#[test]
fn seeded_noise_repeats_after_reset() {
    let clock = ManualClock::new(0.0);
    let (mut a, _) = generator(&clock);
    let (mut b, _) = generator(&clock);
    let fa = a.produce(&()).unwrap();
    assert_eq!(fa, b.produce(&()).unwrap());

    a.reset();
    assert_eq!(a.patterns_drawn(), 0);
    assert_eq!(a.produce(&()).unwrap(), fa);
}

#[test]
fn sub_pixel_block_is_rejected() {
    let clock = ManualClock::new(0.0);
    let handle = ClockHandle::manual(&clock);
    let err = NoiseGenerator::new(
        handle,
        canvas(),
        FieldOfView::default(),
        1.0,
        Fps::hz(30).unwrap(),
        0,
    )
    .unwrap_err();
    assert!(matches!(err, StimError::Config(_)));
}
