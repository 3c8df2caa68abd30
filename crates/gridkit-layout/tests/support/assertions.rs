//! Custom assertions for layout tests.

use gridkit_layout::Rect;

const TOLERANCE: f32 = 0.01;

/// Assert that two lengths match within a small tolerance.
#[track_caller]
pub fn assert_near(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "Length mismatch: expected {}, got {}",
        expected,
        actual
    );
}

/// Assert that a rect matches `(x, y, width, height)`.
#[track_caller]
pub fn assert_rect(actual: Rect, x: f32, y: f32, width: f32, height: f32) {
    let expected = Rect::new(x, y, width, height);
    let close = (actual.x - x).abs() <= TOLERANCE
        && (actual.y - y).abs() <= TOLERANCE
        && (actual.width - width).abs() <= TOLERANCE
        && (actual.height - height).abs() <= TOLERANCE;
    assert!(close, "Rect mismatch: expected {:?}, got {:?}", expected, actual);
}

/// Assert that grid lines match element-wise.
#[track_caller]
pub fn assert_lines(actual: &[f32], expected: &[f32]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Line count mismatch: expected {:?}, got {:?}",
        expected,
        actual
    );
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            (a - e).abs() <= TOLERANCE,
            "Line mismatch: expected {:?}, got {:?}",
            expected,
            actual
        );
    }
}

/// Assert that grid lines never decrease.
#[track_caller]
pub fn assert_monotonic(lines: &[f32]) {
    assert!(
        lines.windows(2).all(|w| w[0] <= w[1] + TOLERANCE),
        "Lines are not monotonic: {:?}",
        lines
    );
}
