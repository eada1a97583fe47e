use super::*;

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn below_stays_in_range() {
    let mut r = Rng64::new(7);
    for _ in 0..1000 {
        assert!(r.below(3) < 3);
    }
    assert_eq!(r.below(0), 0);
}

#[test]
fn coin_lands_both_ways() {
    let mut r = Rng64::new(99);
    let heads = (0..1000).filter(|_| r.coin()).count();
    assert!((300..700).contains(&heads), "heads = {heads}");
}
