use super::*;

#[test]
fn now_ms_is_after_2024() {
    // 2024-01-01T00:00:00Z in epoch millis.
    assert!(now_ms() > 1_704_067_200_000);
}

#[test]
fn now_ms_is_monotonic_enough() {
    let a = now_ms();
    let b = now_ms();
    assert!(b >= a);
}
