use super::*;

#[test]
fn test_fence_zero_latency_returns_immediately() {
    fence_writes(0);
}

#[test]
fn test_lines_to_flush() {
    assert_eq!(lines_to_flush(0, 64), 0);
    assert_eq!(lines_to_flush(1, 64), 1);
    assert_eq!(lines_to_flush(64, 64), 1);
    assert_eq!(lines_to_flush(65, 64), 2);
}
