//! # GridKit Layout
//!
//! A constraint-based grid layout engine.
//!
//! Children are placed into the cells of a grid described by row and column
//! [`Spec`]s. Each spec names a span of grid lines, an [`Alignment`] and a
//! weight. The engine solves the grid-line coordinates along each axis,
//! distributes leftover space among flexible rows/columns and finally aligns
//! every child inside its cell group.
//!
//! ## Design Goals
//!
//! 1. **Deterministic solving**: grid lines take the least coordinates that
//!    satisfy every size constraint
//! 2. **Flexibility**: rows and columns grow only when every member asks for it
//! 3. **Weights**: leftover space is shared proportionally to declared weight
//! 4. **Alignment**: leading, trailing, center, fill and baseline alignment
//! 5. **Graceful conflicts**: overconstrained axes never fail a layout pass;
//!    they produce [`LayoutDiagnostic`]s and a best-effort result
//!
//! ## Modules
//!
//! - [`spec`]: specs, alignments and per-child layout params
//! - [`child`]: the [`Measurable`] capability implemented by the host
//! - [`placer`]: default cell assignment
//! - [`flexibility`]: flexibility classification of row/column groups
//! - [`solver`]: grid-line constraint solver
//! - [`distribute`]: weighted distribution of leftover space
//! - [`align`]: alignment groups and in-cell placement
//! - [`margins`]: margin resolution and the [`MarginPolicy`] capability
//! - [`axis`]: the per-axis pipeline tying alignment, solving and growth together
//! - [`cache`]: generation-tagged placement cache
//! - [`config`]: [`GridConfig`] and its JSON form
//! - [`grid`]: the [`GridLayout`] engine

pub mod align;
pub mod axis;
pub mod cache;
pub mod child;
pub mod config;
pub mod distribute;
pub mod flexibility;
pub mod grid;
pub mod margins;
pub mod placer;
pub mod solver;
pub mod spec;

pub use align::{AlignmentResolver, Bounds};
pub use child::{MeasureSpec, Measurable, Measurement, Visibility};
pub use config::{AlignmentMode, GridConfig, LayoutDirection, Orientation};
pub use distribute::SpaceDistributor;
pub use flexibility::{FlexibilityClassifier, IntervalFlex};
pub use grid::{GridLayout, GridLayoutOutcome, GridMeasurement};
pub use margins::{DefaultGapPolicy, MarginPolicy, MarginQuery, Margins};
pub use placer::{CellAssignment, Placer};
pub use solver::{AxisSolution, AxisSolver, Link, LinkKind};
pub use spec::{spec, Alignment, Axis, Interval, LayoutParams, Spec, UNDEFINED};

use thiserror::Error;

/// Errors raised while building specs, params or configuration.
///
/// Layout-time conflicts are not errors; see [`LayoutDiagnostic`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Spec size must be at least 1, got {size}")]
    InvalidSpan { size: i32 },

    #[error("Spec start must be non-negative or UNDEFINED, got {start}")]
    InvalidStart { start: i32 },

    #[error("Spec weight must be finite and non-negative, got {weight}")]
    InvalidWeight { weight: f32 },

    #[error("{alignment:?} alignment is not supported on the {axis:?} axis")]
    UnsupportedAlignment { alignment: Alignment, axis: Axis },

    #[error("Child index {index} out of range (child count {count})")]
    ChildIndexOutOfRange { index: usize, count: usize },

    #[error("Invalid grid configuration: {0}")]
    Config(String),
}

/// A non-fatal problem found while measuring or laying out.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutDiagnostic {
    /// The children need more room along `axis` than the container offers.
    /// The layout overflows the container.
    OverconstrainedAxis {
        axis: Axis,
        required: f32,
        available: f32,
    },
    /// A constraint that took part in a conflict was dropped by the solver.
    InconsistentConstraint {
        axis: Axis,
        from: usize,
        to: usize,
        value: f32,
        kind: LinkKind,
    },
}

/// A 2D rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Edge sizes (padding around the grid).
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total edge size along `axis`.
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }
}
