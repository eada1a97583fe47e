use super::*;
use crate::foundation::frame::Channels;

#[test]
fn manual_clock_drives_elapsed() {
    let manual = ManualClock::new(100.0);
    let clock = ClockHandle::manual(&manual);
    assert_eq!(clock.reset(), 100.0);
    manual.advance(0.25);
    assert_eq!(clock.elapsed(), 0.0, "elapsed is cached until update");
    assert_eq!(clock.update(), 100.25);
    assert!((clock.elapsed() - 0.25).abs() < 1e-12);
    assert_eq!(clock.run_start(), 100.0);
}

#[test]
fn clones_share_the_timebase() {
    let manual = ManualClock::new(0.0);
    let a = ClockHandle::manual(&manual);
    let b = a.clone();
    a.reset();
    manual.advance_ms(40);
    a.update();
    a.set_frame_index(FrameIndex(3));
    assert!((b.elapsed() - 0.04).abs() < 1e-12);
    assert_eq!(b.frame_index(), FrameIndex(3));
}

#[test]
fn system_clock_is_absolute_and_monotonic() {
    let c = SystemClock::new();
    let a = c.now_secs();
    let b = c.now_secs();
    assert!(a > 1.0e9, "reading should be anchored to the unix epoch");
    assert!(b >= a);
}

#[test]
fn clock_state_reset_forgets_last_frame() {
    let manual = ManualClock::new(5.0);
    let mut state = ClockState::new(ClockHandle::manual(&manual));
    state.set_last_frame(Frame::filled(2, 2, Channels::Gray, 1));
    assert!(state.last_frame().is_some());
    assert_eq!(state.reset(), 5.0);
    assert!(state.last_frame().is_none());
}
