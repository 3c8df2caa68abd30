//! GridKit layout integration tests
//!
//! End-to-end measure and layout passes through the public `GridLayout` API.
//!
//! ```bash
//! cargo test --package gridkit-layout --test grid_layout_tests
//! RUST_LOG=gridkit_layout=trace cargo test --package gridkit-layout --test grid_layout_tests -- --nocapture
//! ```

mod support;

use gridkit_layout::{
    Alignment, AlignmentMode, Axis, DefaultGapPolicy, EdgeSizes, GridConfig, GridLayout, Interval,
    LayoutDiagnostic, LayoutDirection, LayoutParams, LinkKind, Margins, MeasureSpec, Orientation,
    Spec, Visibility, UNDEFINED,
};
use support::*;

fn two_by_two() -> GridLayout<TestChild> {
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::fixed(50.0, 10.0), cell(0, 0)).unwrap();
    grid.add_child(TestChild::fixed(70.0, 10.0), cell(0, 1)).unwrap();
    grid.add_child(TestChild::fixed(30.0, 10.0), cell(1, 0)).unwrap();
    grid.add_child(TestChild::fixed(20.0, 10.0), cell(1, 1)).unwrap();
    grid
}

fn column(spec: Spec) -> LayoutParams {
    LayoutParams::new(Spec::at(0).unwrap(), spec).unwrap()
}

// ==================== Sizing ====================

#[test]
fn test_inflexible_columns_leave_trailing_space() {
    init_tracing();
    let grid = two_by_two();
    let outcome = grid.layout(200.0, 100.0);

    assert_lines(&outcome.column_lines, &[0.0, 50.0, 120.0]);
    assert_rect(outcome.bounds[1], 50.0, 0.0, 70.0, 10.0);
    assert_rect(outcome.bounds[3], 50.0, 10.0, 20.0, 10.0);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_weights_split_leftover_space() {
    let mut grid = GridLayout::new();
    let light = Spec::at(0).unwrap().weighted(1.0).unwrap();
    let heavy = Spec::at(1).unwrap().weighted(3.0).unwrap();
    grid.add_child(TestChild::fixed(10.0, 10.0), column(light)).unwrap();
    grid.add_child(TestChild::fixed(10.0, 10.0), column(heavy)).unwrap();

    let outcome = grid.layout(100.0, 10.0);

    // 80 leftover: a quarter to the first column, three quarters to the second.
    assert_lines(&outcome.column_lines, &[0.0, 30.0, 100.0]);
    assert_rect(outcome.bounds[0], 0.0, 0.0, 10.0, 10.0);
    assert_rect(outcome.bounds[1], 30.0, 0.0, 10.0, 10.0);
}

#[test]
fn test_fill_matches_cell_extent() {
    let mut grid = GridLayout::new();
    let fill = Spec::at(0).unwrap().aligned(Alignment::Fill);
    grid.add_child(TestChild::fixed(10.0, 10.0), column(fill)).unwrap();
    grid.add_child(TestChild::fixed(40.0, 10.0), cell(0, 1)).unwrap();

    let outcome = grid.layout(100.0, 10.0);

    assert_lines(&outcome.column_lines, &[0.0, 60.0, 100.0]);
    assert_near(outcome.bounds[0].width, 60.0);
}

#[test]
fn test_baseline_alignment_in_row() {
    let mut grid = GridLayout::new();
    let cells = [(20.0, 10.0), (25.0, 20.0), (30.0, 5.0)];
    for (column, (height, baseline)) in cells.into_iter().enumerate() {
        grid.add_child(
            TestChild::fixed(10.0, height).with_baseline(baseline),
            cell(0, column as i32),
        )
        .unwrap();
    }

    let measured = grid.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
    assert_near(measured.height, 45.0);

    let outcome = grid.layout(30.0, 45.0);
    assert_lines(&outcome.row_lines, &[0.0, 45.0]);
    let offsets: Vec<f32> = outcome.bounds.iter().map(|b| b.y).collect();
    assert_lines(&offsets, &[10.0, 0.0, 15.0]);
}

#[test]
fn test_children_without_baseline_sit_at_row_top() {
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::fixed(50.0, 10.0), cell(0, 0)).unwrap();
    grid.add_child(TestChild::fixed(70.0, 20.0), cell(0, 1)).unwrap();

    let outcome = grid.layout(120.0, 20.0);
    assert_rect(outcome.bounds[0], 0.0, 0.0, 50.0, 10.0);
    assert_rect(outcome.bounds[1], 50.0, 0.0, 70.0, 20.0);
}

#[test]
fn test_mixed_baseline_row() {
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::fixed(10.0, 10.0), cell(0, 0)).unwrap();
    grid.add_child(TestChild::fixed(10.0, 20.0).with_baseline(15.0), cell(0, 1))
        .unwrap();
    grid.add_child(TestChild::fixed(10.0, 30.0), cell(0, 2)).unwrap();
    grid.add_child(TestChild::fixed(10.0, 10.0).with_baseline(5.0), cell(0, 3))
        .unwrap();

    // Baselines need 15 + 5; the tallest child without one needs 30.
    let measured = grid.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
    assert_near(measured.height, 30.0);

    let outcome = grid.layout(40.0, 30.0);
    let offsets: Vec<f32> = outcome.bounds.iter().map(|b| b.y).collect();
    assert_lines(&offsets, &[0.0, 0.0, 0.0, 10.0]);
}

#[test]
fn test_fill_child_is_remeasured_before_rows() {
    let mut grid = GridLayout::new();
    let fill = Spec::at(0).unwrap().aligned(Alignment::Fill);
    grid.add_child(TestChild::wrapping(100.0, 2000.0), column(fill)).unwrap();

    let outcome = grid.layout(200.0, 300.0);

    assert_rect(outcome.bounds[0], 0.0, 0.0, 200.0, 10.0);
    assert_eq!(
        grid.child(0).unwrap().last_width(),
        Some(MeasureSpec::Exactly(200.0))
    );
}

#[test]
fn test_measure_shrinks_toward_minimum_sizes() {
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::range(40.0, 80.0, 10.0, 10.0), cell(0, 0)).unwrap();
    grid.add_child(TestChild::range(40.0, 80.0, 10.0, 10.0), cell(0, 1)).unwrap();

    let unbounded = grid.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
    assert_near(unbounded.width, 160.0);

    // Both shrink to 50, using the whole limit instead of dropping to 40.
    let bounded = grid.measure(MeasureSpec::AtMost(100.0), MeasureSpec::Unspecified);
    assert_near(bounded.width, 100.0);
    assert!(bounded.diagnostics.is_empty());

    let outcome = grid.layout(100.0, 10.0);
    assert_rect(outcome.bounds[0], 0.0, 0.0, 50.0, 10.0);
    assert_rect(outcome.bounds[1], 50.0, 0.0, 50.0, 10.0);

    let tight = grid.measure(MeasureSpec::AtMost(60.0), MeasureSpec::Unspecified);
    assert_near(tight.width, 80.0);
    assert!(!tight.diagnostics.is_empty());
}

#[test]
fn test_overconstrained_axis_is_reported() {
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::fixed(80.0, 10.0), cell(0, 0)).unwrap();
    grid.add_child(TestChild::fixed(80.0, 10.0), cell(0, 1)).unwrap();

    let outcome = grid.layout(100.0, 10.0);

    assert_lines(&outcome.column_lines, &[0.0, 80.0, 160.0]);
    assert!(outcome.column_lines.iter().all(|l| l.is_finite()));
    assert!(outcome.diagnostics.contains(&LayoutDiagnostic::OverconstrainedAxis {
        axis: Axis::Horizontal,
        required: 160.0,
        available: 100.0,
    }));
    assert!(outcome.diagnostics.iter().any(|d| matches!(
        d,
        LayoutDiagnostic::InconsistentConstraint {
            axis: Axis::Horizontal,
            kind: LinkKind::Container,
            ..
        }
    )));
}

// ==================== Invariants ====================

#[test]
fn test_default_specs_keep_lines_monotonic() {
    let mut grid = GridLayout::with_config(GridConfig {
        column_count: Some(3),
        ..Default::default()
    });
    for (width, height) in [(30.0, 5.0), (10.0, 25.0), (45.0, 15.0), (5.0, 5.0), (60.0, 40.0)] {
        grid.add_child(TestChild::fixed(width, height), LayoutParams::default())
            .unwrap();
    }
    let wide = LayoutParams::new(Spec::undefined(), Spec::span(UNDEFINED, 3).unwrap()).unwrap();
    grid.add_child(TestChild::fixed(200.0, 12.0), wide).unwrap();

    let outcome = grid.layout(400.0, 200.0);
    assert_monotonic(&outcome.column_lines);
    assert_monotonic(&outcome.row_lines);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.column_count(), 3);
}

#[test]
fn test_layout_is_idempotent() {
    let grid = two_by_two();
    let first = grid.layout(150.0, 40.0);
    let second = grid.layout(150.0, 40.0);
    assert_eq!(first, second);

    let measured = grid.measure(MeasureSpec::AtMost(150.0), MeasureSpec::Unspecified);
    assert_eq!(
        measured,
        grid.measure(MeasureSpec::AtMost(150.0), MeasureSpec::Unspecified)
    );
}

#[test]
fn test_order_not_preserved_leaves_free_lines_at_least_value() {
    let config = GridConfig {
        column_count: Some(3),
        column_order_preserved: false,
        ..Default::default()
    };
    let mut grid = GridLayout::with_config(config);
    grid.add_child(TestChild::fixed(10.0, 10.0), cell(0, 0)).unwrap();
    let span = LayoutParams::new(Spec::at(1).unwrap(), Spec::span(0, 3).unwrap()).unwrap();
    grid.add_child(TestChild::fixed(30.0, 10.0), span).unwrap();

    let outcome = grid.layout(100.0, 20.0);
    assert_lines(&outcome.column_lines, &[0.0, 10.0, 0.0, 30.0]);

    grid.set_column_order_preserved(true);
    let outcome = grid.layout(100.0, 20.0);
    assert_lines(&outcome.column_lines, &[0.0, 10.0, 10.0, 30.0]);
}

#[test]
fn test_order_not_preserved_measures_highest_line() {
    let config = GridConfig {
        column_count: Some(3),
        column_order_preserved: false,
        ..Default::default()
    };
    let mut grid = GridLayout::with_config(config);
    let short = LayoutParams::new(Spec::at(0).unwrap(), Spec::span(0, 2).unwrap()).unwrap();
    let long = LayoutParams::new(Spec::at(1).unwrap(), Spec::span(0, 3).unwrap()).unwrap();
    grid.add_child(TestChild::fixed(50.0, 10.0), short).unwrap();
    grid.add_child(TestChild::fixed(30.0, 10.0), long).unwrap();

    let measured = grid.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
    assert_near(measured.width, 50.0);

    let outcome = grid.layout(100.0, 20.0);
    assert_lines(&outcome.column_lines, &[0.0, 0.0, 50.0, 30.0]);
    assert_rect(outcome.bounds[0], 0.0, 0.0, 50.0, 10.0);
    assert!(outcome.diagnostics.is_empty());

    // Line 2 overshoots a 40-wide container even though the last line fits.
    let narrow = grid.measure(MeasureSpec::AtMost(40.0), MeasureSpec::Unspecified);
    assert_near(narrow.width, 50.0);
    assert!(narrow.diagnostics.contains(&LayoutDiagnostic::OverconstrainedAxis {
        axis: Axis::Horizontal,
        required: 50.0,
        available: 40.0,
    }));
}

// ==================== Placement ====================

#[test]
fn test_undefined_start_span_two_takes_first_columns() {
    let mut grid = GridLayout::with_config(GridConfig {
        column_count: Some(3),
        ..Default::default()
    });
    let wide = LayoutParams::new(Spec::undefined(), Spec::span(UNDEFINED, 2).unwrap()).unwrap();
    grid.add_child(TestChild::fixed(10.0, 10.0), wide).unwrap();
    grid.add_child(TestChild::fixed(10.0, 10.0), LayoutParams::default())
        .unwrap();

    let placements = grid.placements();
    assert_eq!(placements[0].column, Interval::new(0, 2));
    assert_eq!(placements[1].column, Interval::new(2, 3));
}

#[test]
fn test_vertical_orientation_fills_columns_first() {
    let mut grid = GridLayout::with_config(GridConfig {
        orientation: Orientation::Vertical,
        row_count: Some(2),
        ..Default::default()
    });
    for _ in 0..3 {
        grid.add_child(TestChild::fixed(10.0, 10.0), LayoutParams::default())
            .unwrap();
    }

    let placements = grid.placements();
    assert_eq!(placements[2].row, Interval::new(0, 1));
    assert_eq!(placements[2].column, Interval::new(1, 2));
    assert_eq!(grid.column_count(), 2);
}

#[test]
fn test_insert_and_remove_replace_placement() {
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::fixed(10.0, 10.0), LayoutParams::default())
        .unwrap();
    grid.insert_child(0, TestChild::fixed(20.0, 10.0), LayoutParams::default())
        .unwrap();

    let outcome = grid.layout(100.0, 10.0);
    assert_rect(outcome.bounds[1], 20.0, 0.0, 10.0, 10.0);

    let removed = grid.remove_child(0).unwrap();
    assert_eq!(removed.measure_calls(), 1);
    assert_eq!(grid.child_count(), 1);
    assert_eq!(grid.column_count(), 1);
}

// ==================== Collapsed children ====================

#[test]
fn test_collapsed_child_occupies_empty_column() {
    let mut grid = GridLayout::new();
    let margins = Margins::uniform(5.0);
    grid.add_child(
        TestChild::fixed(40.0, 40.0).collapsed(),
        LayoutParams::default().with_margins(margins),
    )
    .unwrap();
    grid.add_child(TestChild::fixed(30.0, 10.0), LayoutParams::default())
        .unwrap();

    let outcome = grid.layout(100.0, 10.0);
    assert_eq!(grid.placements()[1].column, Interval::new(1, 2));
    assert_lines(&outcome.column_lines, &[0.0, 0.0, 30.0]);
    assert_near(outcome.bounds[0].width, 0.0);
    assert_near(outcome.bounds[0].height, 0.0);

    let fill = LayoutParams::new(Spec::undefined(), Spec::undefined().aligned(Alignment::Fill))
        .unwrap()
        .with_margins(margins);
    grid.set_layout_params(0, fill).unwrap();

    // Exactly the required width, so the flexible column does not grow.
    let outcome = grid.layout(40.0, 10.0);
    assert_lines(&outcome.column_lines, &[0.0, 10.0, 40.0]);
    assert_near(outcome.bounds[0].width, 0.0);
}

#[test]
fn test_visibility_change_through_child_mut() {
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::fixed(30.0, 10.0), cell(0, 0)).unwrap();

    let before = grid.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
    assert_near(before.width, 30.0);

    grid.child_mut(0).unwrap().set_visibility(Visibility::Collapsed);
    let after = grid.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
    assert_near(after.width, 0.0);
}

// ==================== Margins and direction ====================

#[test]
fn test_rtl_mirrors_horizontally() {
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::fixed(30.0, 10.0), cell(0, 0)).unwrap();
    grid.add_child(TestChild::fixed(50.0, 10.0), cell(0, 1)).unwrap();
    grid.set_layout_direction(LayoutDirection::Rtl);

    let outcome = grid.layout(100.0, 10.0);
    assert_rect(outcome.bounds[0], 70.0, 0.0, 30.0, 10.0);
    assert_rect(outcome.bounds[1], 20.0, 0.0, 50.0, 10.0);
    assert_lines(&outcome.column_lines, &[100.0, 70.0, 20.0]);
}

#[test]
fn test_rtl_uses_right_padding_as_leading() {
    let mut grid = GridLayout::new();
    grid.set_padding(EdgeSizes {
        top: 0.0,
        right: 6.0,
        bottom: 0.0,
        left: 2.0,
    });
    grid.set_layout_direction(LayoutDirection::Rtl);
    grid.add_child(TestChild::fixed(30.0, 10.0), cell(0, 0)).unwrap();

    let outcome = grid.layout(100.0, 10.0);
    assert_rect(outcome.bounds[0], 64.0, 0.0, 30.0, 10.0);
}

#[test]
fn test_align_bounds_shares_line_margins() {
    let indented = Margins {
        left: Some(12.0),
        ..Default::default()
    };
    let mut grid = GridLayout::new();
    grid.add_child(TestChild::fixed(20.0, 10.0), cell(0, 0).with_margins(indented))
        .unwrap();
    grid.add_child(TestChild::fixed(20.0, 10.0), cell(1, 0)).unwrap();

    let outcome = grid.layout(100.0, 20.0);
    assert_near(outcome.bounds[0].x, 12.0);
    assert_near(outcome.bounds[1].x, 0.0);

    grid.set_alignment_mode(AlignmentMode::AlignBounds);
    let outcome = grid.layout(100.0, 20.0);
    assert_near(outcome.bounds[0].x, 12.0);
    assert_near(outcome.bounds[1].x, 12.0);
    assert_lines(&outcome.column_lines, &[0.0, 32.0]);
}

#[test]
fn test_default_margins_come_from_policy() {
    let mut grid = GridLayout::new();
    grid.set_use_default_margins(true);
    grid.set_margin_policy(Box::new(DefaultGapPolicy {
        gap: 10.0,
        container_margin: 0.0,
    }));
    grid.add_child(TestChild::fixed(20.0, 10.0), cell(0, 0)).unwrap();
    grid.add_child(TestChild::fixed(20.0, 10.0), cell(0, 1)).unwrap();

    let outcome = grid.layout(100.0, 10.0);
    assert_lines(&outcome.column_lines, &[0.0, 25.0, 50.0]);
    assert_rect(outcome.bounds[1], 30.0, 0.0, 20.0, 10.0);
}

// ==================== Configuration and cache ====================

#[test]
fn test_config_from_json_drives_layout() {
    let config = GridConfig::from_json(
        r#"{ "column_count": 2, "padding": { "top": 4, "left": 4 } }"#,
    )
    .unwrap();
    let mut grid = GridLayout::with_config(config);
    for _ in 0..3 {
        grid.add_child(TestChild::fixed(10.0, 10.0), LayoutParams::default())
            .unwrap();
    }

    let outcome = grid.layout(100.0, 100.0);
    assert_eq!(grid.row_count(), 2);
    assert_rect(outcome.bounds[2], 4.0, 14.0, 10.0, 10.0);
}

#[test]
fn test_placement_cache_reused_until_mutation() {
    let mut grid = two_by_two();
    let first = grid.placements();
    let stats = grid.cache_stats();

    assert_eq!(grid.placements(), first);
    assert_eq!(grid.cache_stats().hits, stats.hits + 1);
    assert_eq!(grid.cache_stats().stores, stats.stores);

    let generation = grid.generation();
    grid.set_layout_params(0, cell(2, 0)).unwrap();
    assert_eq!(grid.generation(), generation + 1);

    let moved = grid.placements();
    assert_eq!(moved[0].row, Interval::new(2, 3));
    assert_eq!(grid.cache_stats().stores, stats.stores + 1);
    assert_eq!(grid.row_count(), 3);
}
