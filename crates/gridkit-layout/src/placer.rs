//! Default cell assignment.
//!
//! Children whose specs leave the start undefined are given the first free
//! cells after the previous child, walking along the minor axis selected by
//! the grid orientation and wrapping at that axis' count.

use tracing::trace;

use crate::config::{GridConfig, Orientation};
use crate::spec::{Axis, Interval, LayoutParams};

/// Resolved cell group of one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAssignment {
    pub row: Interval,
    pub column: Interval,
}

impl CellAssignment {
    pub fn interval(&self, axis: Axis) -> Interval {
        match axis {
            Axis::Horizontal => self.column,
            Axis::Vertical => self.row,
        }
    }
}

/// Assigns grid indices to children in traversal order.
#[derive(Debug, Clone, Copy)]
pub struct Placer {
    orientation: Orientation,
    /// Wrapping count along the minor axis; 0 disables wrapping.
    count: usize,
}

impl Placer {
    pub fn new(config: &GridConfig) -> Self {
        let minor = config.orientation.minor_axis();
        Self {
            orientation: config.orientation,
            count: config.count(minor).unwrap_or(0) as usize,
        }
    }

    /// Place every child. The result is parallel to `params`.
    pub fn place(&self, params: &[LayoutParams]) -> Vec<CellAssignment> {
        let minor_axis = self.orientation.minor_axis();
        let major_axis = minor_axis.cross();
        let count = self.count;

        let mut major = 0usize;
        let mut minor = 0usize;
        // Per minor index, the first major index still free.
        let mut max_sizes = vec![0usize; count];
        let mut assignments = Vec::with_capacity(params.len());

        for (index, lp) in params.iter().enumerate() {
            let major_spec = lp.spec(major_axis);
            let major_span = major_spec.size() as usize;
            if let Some(start) = major_spec.start() {
                major = start as usize;
            }

            let minor_spec = lp.spec(minor_axis);
            let minor_start = minor_spec.start().map(|s| s as usize);
            let mut minor_span = clip(minor_spec.size() as usize, minor_start, count);
            if let Some(start) = minor_start {
                minor = start;
            }

            let out_of_range = minor_start.is_some_and(|start| count != 0 && start >= count);
            if out_of_range {
                // Explicit placement past the wrapping count; the count grows instead.
                minor_span = minor_spec.size() as usize;
            } else if count != 0 {
                if major_spec.start().is_none() || minor_start.is_none() {
                    while !fits(&max_sizes, major, minor, minor + minor_span) {
                        if minor_start.is_some() {
                            major += 1;
                        } else if minor + minor_span <= count {
                            minor += 1;
                        } else {
                            minor = 0;
                            major += 1;
                        }
                    }
                }
                procrustean_fill(&mut max_sizes, minor, minor + minor_span, major + major_span);
            }

            let major_interval = Interval::new(major, major + major_span);
            let minor_interval = Interval::new(minor, minor + minor_span.max(1));
            let assignment = match self.orientation {
                Orientation::Horizontal => CellAssignment {
                    row: major_interval,
                    column: minor_interval,
                },
                Orientation::Vertical => CellAssignment {
                    row: minor_interval,
                    column: major_interval,
                },
            };
            trace!(
                "Placed child {} at rows {}..{}, columns {}..{}",
                index,
                assignment.row.min,
                assignment.row.max,
                assignment.column.min,
                assignment.column.max
            );
            assignments.push(assignment);

            minor += minor_span;
        }

        assignments
    }
}

/// Number of cells along `axis`: the defined count raised to cover every
/// assignment.
pub fn resolved_count(assignments: &[CellAssignment], axis: Axis, defined: Option<u32>) -> usize {
    let max_end = assignments
        .iter()
        .map(|a| a.interval(axis).max)
        .max()
        .unwrap_or(0);
    max_end.max(defined.unwrap_or(0) as usize)
}

fn clip(size: usize, start: Option<usize>, count: usize) -> usize {
    if count == 0 {
        return size;
    }
    let min = start.map_or(0, |s| s.min(count));
    size.min(count - min)
}

fn fits(max_sizes: &[usize], value: usize, start: usize, end: usize) -> bool {
    if end > max_sizes.len() {
        return false;
    }
    max_sizes[start..end].iter().all(|&m| m <= value)
}

fn procrustean_fill(max_sizes: &mut [usize], start: usize, end: usize, value: usize) {
    let len = max_sizes.len();
    for slot in &mut max_sizes[start.min(len)..end.min(len)] {
        *slot = value;
    }
}
