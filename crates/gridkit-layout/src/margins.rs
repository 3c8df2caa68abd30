//! Child margins and the default-margin capability.
//!
//! A side left undefined in [`Margins`] is zero unless the grid has
//! `use_default_margins` enabled, in which case the injected
//! [`MarginPolicy`] decides. In `AlignBounds` mode every child starting (or
//! ending) on the same grid line shares the largest margin found on that line.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{AlignmentMode, GridConfig};
use crate::spec::{Axis, Interval, LayoutParams};

/// Per-side margins. `None` means undefined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
}

impl Margins {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// The explicit margin on the logical leading or trailing side of `axis`.
    pub fn side(&self, axis: Axis, leading: bool, rtl: bool) -> Option<f32> {
        match axis {
            Axis::Horizontal => {
                if leading != rtl {
                    self.left
                } else {
                    self.right
                }
            }
            Axis::Vertical => {
                if leading {
                    self.top
                } else {
                    self.bottom
                }
            }
        }
    }
}

/// What a [`MarginPolicy`] is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarginQuery {
    pub axis: Axis,
    /// Leading (top/start) or trailing (bottom/end) side.
    pub leading: bool,
    /// Whether that side touches the container edge.
    pub at_edge: bool,
    /// Whether the child is a spacer.
    pub spacer: bool,
}

/// Supplies platform default margins.
pub trait MarginPolicy: fmt::Debug {
    fn default_margin(&self, query: &MarginQuery) -> f32;
}

/// Half a gap between neighbours, a fixed margin at the container edge and
/// nothing around spacers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultGapPolicy {
    pub gap: f32,
    pub container_margin: f32,
}

impl Default for DefaultGapPolicy {
    fn default() -> Self {
        Self {
            gap: 8.0,
            container_margin: 0.0,
        }
    }
}

impl MarginPolicy for DefaultGapPolicy {
    fn default_margin(&self, query: &MarginQuery) -> f32 {
        if query.at_edge {
            self.container_margin
        } else if query.spacer {
            0.0
        } else {
            self.gap / 2.0
        }
    }
}

/// Resolved margins of one child along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisMargins {
    pub leading: f32,
    pub trailing: f32,
}

impl AxisMargins {
    pub fn total(&self) -> f32 {
        self.leading + self.trailing
    }
}

/// Resolve margins for every child along `axis`.
///
/// `placed` pairs each child's params with its resolved interval on `axis`;
/// `count` is the number of cells along the axis.
pub fn resolve_axis_margins(
    axis: Axis,
    placed: &[(LayoutParams, Interval)],
    count: usize,
    config: &GridConfig,
    policy: &dyn MarginPolicy,
) -> Vec<AxisMargins> {
    let own: Vec<AxisMargins> = placed
        .iter()
        .map(|(params, interval)| AxisMargins {
            leading: own_margin(axis, true, params, interval, count, config, policy),
            trailing: own_margin(axis, false, params, interval, count, config, policy),
        })
        .collect();

    if config.alignment_mode == AlignmentMode::AlignMargins {
        return own;
    }

    let mut leading_by_line = vec![0.0f32; count + 1];
    let mut trailing_by_line = vec![0.0f32; count + 1];
    for ((_, interval), margins) in placed.iter().zip(&own) {
        let start = interval.min.min(count);
        let end = interval.max.min(count);
        leading_by_line[start] = leading_by_line[start].max(margins.leading);
        trailing_by_line[end] = trailing_by_line[end].max(margins.trailing);
    }

    placed
        .iter()
        .map(|(_, interval)| AxisMargins {
            leading: leading_by_line[interval.min.min(count)],
            trailing: trailing_by_line[interval.max.min(count)],
        })
        .collect()
}

fn own_margin(
    axis: Axis,
    leading: bool,
    params: &LayoutParams,
    interval: &Interval,
    count: usize,
    config: &GridConfig,
    policy: &dyn MarginPolicy,
) -> f32 {
    if let Some(explicit) = params.margins.side(axis, leading, config.is_rtl()) {
        return explicit;
    }
    if !config.use_default_margins {
        return 0.0;
    }

    let at_edge = if leading {
        interval.min == 0
    } else {
        interval.max >= count
    };
    policy.default_margin(&MarginQuery {
        axis,
        leading,
        at_edge,
        spacer: params.spacer,
    })
}
