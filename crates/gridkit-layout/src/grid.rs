//! The grid layout engine.
//!
//! [`GridLayout`] owns a list of children, each paired with its
//! [`LayoutParams`], and runs two passes over them:
//!
//! - **measure**: the size the grid wants under a pair of [`MeasureSpec`]s
//! - **layout**: the final bounds of every child inside a container of a
//!   given size
//!
//! Both passes place children, resolve margins, and solve the axis selected
//! by the orientation first. `Fill` children on that axis are then measured
//! again at their final extent before the other axis is solved, so content
//! that wraps gets the right height.

use tracing::{debug, trace};

use crate::align::Placement;
use crate::axis::{AxisChild, AxisPipeline, AxisResult};
use crate::cache::{PlacementCache, PlacementSnapshot};
use crate::child::{MeasureSpec, Measurable, Measurement, Visibility};
use crate::config::{AlignmentMode, GridConfig, LayoutDirection, Orientation};
use crate::margins::{resolve_axis_margins, AxisMargins, DefaultGapPolicy, MarginPolicy};
use crate::placer::{resolved_count, CellAssignment, Placer};
use crate::spec::{Alignment, Axis, Interval, LayoutParams};
use crate::{EdgeSizes, GridError, LayoutDiagnostic, Rect};

/// Result of a measure pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMeasurement {
    pub width: f32,
    pub height: f32,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayoutOutcome {
    /// Final bounds per child, in child order, relative to the container.
    pub bounds: Vec<Rect>,
    /// Physical x of every column line.
    pub column_lines: Vec<f32>,
    /// Physical y of every row line.
    pub row_lines: Vec<f32>,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

#[derive(Debug)]
struct GridChild<M> {
    item: M,
    params: LayoutParams,
}

/// Both axes of one pass.
struct Solved {
    columns: AxisResult,
    rows: AxisResult,
    collapsed: Vec<bool>,
}

/// A constraint-based grid container.
#[derive(Debug)]
pub struct GridLayout<M: Measurable = Box<dyn Measurable>> {
    children: Vec<GridChild<M>>,
    config: GridConfig,
    margin_policy: Box<dyn MarginPolicy>,
    cache: PlacementCache,
}

impl<M: Measurable> Default for GridLayout<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Measurable> GridLayout<M> {
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    pub fn with_config(config: GridConfig) -> Self {
        Self {
            children: Vec::new(),
            config,
            margin_policy: Box::new(DefaultGapPolicy::default()),
            cache: PlacementCache::new(),
        }
    }

    // ==================== Children ====================

    /// Append a child and return its index.
    pub fn add_child(&mut self, item: M, params: LayoutParams) -> Result<usize, GridError> {
        validate_params(&params)?;
        self.children.push(GridChild { item, params });
        self.invalidate();
        Ok(self.children.len() - 1)
    }

    pub fn insert_child(
        &mut self,
        index: usize,
        item: M,
        params: LayoutParams,
    ) -> Result<(), GridError> {
        if index > self.children.len() {
            return Err(self.out_of_range(index));
        }
        validate_params(&params)?;
        self.children.insert(index, GridChild { item, params });
        self.invalidate();
        Ok(())
    }

    pub fn remove_child(&mut self, index: usize) -> Result<M, GridError> {
        if index >= self.children.len() {
            return Err(self.out_of_range(index));
        }
        let removed = self.children.remove(index);
        self.invalidate();
        Ok(removed.item)
    }

    /// Replace a child's layout params.
    pub fn set_layout_params(
        &mut self,
        index: usize,
        params: LayoutParams,
    ) -> Result<(), GridError> {
        validate_params(&params)?;
        let count = self.children.len();
        let child = self
            .children
            .get_mut(index)
            .ok_or(GridError::ChildIndexOutOfRange { index, count })?;
        child.params = params;
        self.invalidate();
        Ok(())
    }

    pub fn layout_params(&self, index: usize) -> Option<&LayoutParams> {
        self.children.get(index).map(|c| &c.params)
    }

    pub fn child(&self, index: usize) -> Option<&M> {
        self.children.get(index).map(|c| &c.item)
    }

    /// Mutable access to a child. Invalidates cached placement.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut M> {
        self.cache.invalidate();
        self.children.get_mut(index).map(|c| &mut c.item)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Drop cached results; the next pass recomputes placement.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    fn out_of_range(&self, index: usize) -> GridError {
        GridError::ChildIndexOutOfRange {
            index,
            count: self.children.len(),
        }
    }

    // ==================== Configuration ====================

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
        self.invalidate();
    }

    /// The configured row count, `None` when derived from the children.
    pub fn defined_row_count(&self) -> Option<u32> {
        self.config.row_count
    }

    pub fn set_row_count(&mut self, count: Option<u32>) {
        self.config.row_count = count;
        self.invalidate();
    }

    /// The configured column count, `None` when derived from the children.
    pub fn defined_column_count(&self) -> Option<u32> {
        self.config.column_count
    }

    pub fn set_column_count(&mut self, count: Option<u32>) {
        self.config.column_count = count;
        self.invalidate();
    }

    pub fn use_default_margins(&self) -> bool {
        self.config.use_default_margins
    }

    pub fn set_use_default_margins(&mut self, enabled: bool) {
        self.config.use_default_margins = enabled;
        self.invalidate();
    }

    pub fn alignment_mode(&self) -> AlignmentMode {
        self.config.alignment_mode
    }

    pub fn set_alignment_mode(&mut self, mode: AlignmentMode) {
        self.config.alignment_mode = mode;
        self.invalidate();
    }

    pub fn is_row_order_preserved(&self) -> bool {
        self.config.row_order_preserved
    }

    pub fn set_row_order_preserved(&mut self, preserved: bool) {
        self.config.row_order_preserved = preserved;
        self.invalidate();
    }

    pub fn is_column_order_preserved(&self) -> bool {
        self.config.column_order_preserved
    }

    pub fn set_column_order_preserved(&mut self, preserved: bool) {
        self.config.column_order_preserved = preserved;
        self.invalidate();
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.config.layout_direction
    }

    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        self.config.layout_direction = direction;
        self.invalidate();
    }

    pub fn padding(&self) -> EdgeSizes {
        self.config.padding
    }

    pub fn set_padding(&mut self, padding: EdgeSizes) {
        self.config.padding = padding;
        self.invalidate();
    }

    pub fn margin_policy(&self) -> &dyn MarginPolicy {
        self.margin_policy.as_ref()
    }

    pub fn set_margin_policy(&mut self, policy: Box<dyn MarginPolicy>) {
        self.margin_policy = policy;
        self.invalidate();
    }

    // ==================== Placement ====================

    /// Resolved cell group of every child, in child order.
    pub fn placements(&self) -> Vec<CellAssignment> {
        self.snapshot().assignments
    }

    /// Number of rows after placement.
    pub fn row_count(&self) -> usize {
        self.snapshot().row_count
    }

    /// Number of columns after placement.
    pub fn column_count(&self) -> usize {
        self.snapshot().column_count
    }

    /// Generation of the placement cache. Bumped by every mutation.
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    fn snapshot(&self) -> PlacementSnapshot {
        self.cache.get_or_compute(|| {
            let params: Vec<LayoutParams> = self.children.iter().map(|c| c.params).collect();
            let assignments = Placer::new(&self.config).place(&params);
            let row_count = resolved_count(&assignments, Axis::Vertical, self.config.row_count);
            let column_count =
                resolved_count(&assignments, Axis::Horizontal, self.config.column_count);
            debug!(
                "Grid placement: {} children, {} rows, {} columns",
                assignments.len(),
                row_count,
                column_count
            );
            PlacementSnapshot {
                assignments,
                row_count,
                column_count,
            }
        })
    }

    // ==================== Passes ====================

    /// Compute the size the grid wants under the given constraints.
    ///
    /// `Exactly` yields the given size. Otherwise the result is the content
    /// extent plus padding; under `AtMost` the content shrinks toward
    /// minimum sizes first and only exceeds the limit when even those do not
    /// fit.
    pub fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> GridMeasurement {
        let solved = self.solve(width, height);
        let padding = self.config.padding;

        let content_width = solved.columns.required + padding.horizontal();
        let content_height = solved.rows.required + padding.vertical();
        let measured = GridMeasurement {
            width: resolve_size(width, content_width),
            height: resolve_size(height, content_height),
            diagnostics: merge(solved.columns.diagnostics, solved.rows.diagnostics),
        };

        debug!(
            "Grid measure: {:?} x {:?} -> {}x{}",
            width, height, measured.width, measured.height
        );
        measured
    }

    /// Lay children out inside a container of exactly `width` x `height`.
    pub fn layout(&self, width: f32, height: f32) -> GridLayoutOutcome {
        let solved = self.solve(MeasureSpec::Exactly(width), MeasureSpec::Exactly(height));
        let padding = self.config.padding;
        let rtl = self.config.is_rtl();
        let leading_padding = if rtl { padding.right } else { padding.left };

        let snapshot = self.snapshot();
        let mut bounds = Vec::with_capacity(self.children.len());
        for (index, assignment) in snapshot.assignments.iter().enumerate() {
            let column = &solved.columns.placements[index];
            let row = &solved.rows.placements[index];

            let logical_x =
                leading_padding + solved.columns.lines[assignment.column.min] + column.offset;
            let y = padding.top + solved.rows.lines[assignment.row.min] + row.offset;
            let (w, h) = if solved.collapsed[index] {
                (0.0, 0.0)
            } else {
                (column.size, row.size)
            };
            let x = if rtl { width - logical_x - w } else { logical_x };

            trace!("Child {} bounds: ({}, {}) {}x{}", index, x, y, w, h);
            bounds.push(Rect::new(x, y, w, h));
        }

        let column_lines = solved
            .columns
            .lines
            .iter()
            .map(|line| {
                if rtl {
                    width - padding.right - line
                } else {
                    padding.left + line
                }
            })
            .collect();
        let row_lines = solved.rows.lines.iter().map(|line| padding.top + line).collect();

        debug!(
            "Grid layout complete: {}x{}, {} columns, {} rows, {} children",
            width,
            height,
            snapshot.column_count,
            snapshot.row_count,
            bounds.len()
        );

        GridLayoutOutcome {
            bounds,
            column_lines,
            row_lines,
            diagnostics: merge(solved.columns.diagnostics, solved.rows.diagnostics),
        }
    }

    fn solve(&self, width: MeasureSpec, height: MeasureSpec) -> Solved {
        let snapshot = self.snapshot();
        let padding = self.config.padding;
        let width = width.deflate(padding.horizontal());
        let height = height.deflate(padding.vertical());

        let column_margins = self.margins(Axis::Horizontal, &snapshot);
        let row_margins = self.margins(Axis::Vertical, &snapshot);
        let collapsed: Vec<bool> = self
            .children
            .iter()
            .map(|c| c.item.visibility() == Visibility::Collapsed)
            .collect();

        let mut measurements: Vec<Measurement> = self
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                if collapsed[i] {
                    return Measurement::default();
                }
                child.item.measure(
                    width.shrink_for_child(column_margins[i].total()),
                    height.shrink_for_child(row_margins[i].total()),
                )
            })
            .collect();

        let first = self.config.orientation.first_axis();
        let (first_spec, first_margins, second_spec, second_margins) = match first {
            Axis::Horizontal => (width, &column_margins, height, &row_margins),
            Axis::Vertical => (height, &row_margins, width, &column_margins),
        };

        let first_result = self.solve_axis(
            first,
            first_spec,
            &snapshot,
            &measurements,
            first_margins,
            &collapsed,
        );

        // Fill children now know their extent on the first axis.
        for (i, child) in self.children.iter().enumerate() {
            if collapsed[i] || child.params.spec(first).alignment() != Alignment::Fill {
                continue;
            }
            let Placement { size, .. } = first_result.placements[i];
            let exact = MeasureSpec::Exactly(size);
            let other = second_spec.shrink_for_child(second_margins[i].total());
            measurements[i] = match first {
                Axis::Horizontal => child.item.measure(exact, other),
                Axis::Vertical => child.item.measure(other, exact),
            };
            trace!("Re-measured fill child {} at {}", i, size);
        }

        let second_result = self.solve_axis(
            first.cross(),
            second_spec,
            &snapshot,
            &measurements,
            second_margins,
            &collapsed,
        );

        let (columns, rows) = match first {
            Axis::Horizontal => (first_result, second_result),
            Axis::Vertical => (second_result, first_result),
        };
        Solved {
            columns,
            rows,
            collapsed,
        }
    }

    fn margins(&self, axis: Axis, snapshot: &PlacementSnapshot) -> Vec<AxisMargins> {
        let placed: Vec<(LayoutParams, Interval)> = self
            .children
            .iter()
            .zip(&snapshot.assignments)
            .map(|(child, assignment)| (child.params, assignment.interval(axis)))
            .collect();
        resolve_axis_margins(
            axis,
            &placed,
            axis_count(snapshot, axis),
            &self.config,
            self.margin_policy.as_ref(),
        )
    }

    fn solve_axis(
        &self,
        axis: Axis,
        constraint: MeasureSpec,
        snapshot: &PlacementSnapshot,
        measurements: &[Measurement],
        margins: &[AxisMargins],
        collapsed: &[bool],
    ) -> AxisResult {
        let children: Vec<AxisChild> = self
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let spec = child.params.spec(axis);
                let measurement = &measurements[i];
                AxisChild {
                    interval: snapshot.assignments[i].interval(axis),
                    alignment: spec.alignment(),
                    weight: spec.weight(),
                    min: measurement.min(axis),
                    pref: measurement.pref(axis),
                    ascent: match axis {
                        Axis::Vertical => measurement.baseline,
                        Axis::Horizontal => None,
                    },
                    margins: margins[i],
                    collapsed: collapsed[i],
                }
            })
            .collect();

        let grow = matches!(constraint, MeasureSpec::Exactly(_));
        AxisPipeline::new(
            axis,
            axis_count(snapshot, axis),
            &children,
            self.config.order_preserved(axis),
        )
        .run(constraint.limit(), grow)
    }
}

fn validate_params(params: &LayoutParams) -> Result<(), GridError> {
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let alignment = params.spec(axis).alignment();
        if !alignment.supports(axis) {
            return Err(GridError::UnsupportedAlignment { alignment, axis });
        }
    }
    Ok(())
}

fn axis_count(snapshot: &PlacementSnapshot, axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => snapshot.column_count,
        Axis::Vertical => snapshot.row_count,
    }
}

fn resolve_size(spec: MeasureSpec, content: f32) -> f32 {
    match spec {
        // Under AtMost the solver already shrank content toward the limit;
        // anything still larger overflows and reports its real extent.
        MeasureSpec::Unspecified | MeasureSpec::AtMost(_) => content,
        MeasureSpec::Exactly(size) => size,
    }
}

fn merge(mut first: Vec<LayoutDiagnostic>, second: Vec<LayoutDiagnostic>) -> Vec<LayoutDiagnostic> {
    first.extend(second);
    first
}
