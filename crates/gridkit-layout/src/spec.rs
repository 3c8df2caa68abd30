//! Specs, alignments and per-child layout params.
//!
//! A [`Spec`] describes a child's cell group along one axis: the grid lines
//! it spans, how it is aligned inside that group and how much of any leftover
//! space it asks for. Specs are plain `Copy` values; sharing one between
//! several children is just copying it, and changing a child's assignment
//! means handing the engine a new [`LayoutParams`] value.

use crate::margins::Margins;
use crate::GridError;

/// Sentinel for an undefined spec start at the API boundary.
pub const UNDEFINED: i32 = i32::MIN;

/// The two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Columns; driven by column specs.
    Horizontal,
    /// Rows; driven by row specs.
    Vertical,
}

impl Axis {
    /// Get the perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self == Axis::Horizontal
    }
}

/// How a child is placed within its cell group along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Flush with the near edge of the cell group.
    Leading,
    /// Flush with the far edge of the cell group.
    Trailing,
    /// Centered in the cell group.
    Center,
    /// Stretched to the full extent of the cell group.
    Fill,
    /// Baselines of the group line up. Rows only.
    Baseline,
    /// Nothing declared; resolves per axis.
    #[default]
    Undefined,
}

impl Alignment {
    /// Whether an alignment was declared at all.
    pub fn is_defined(self) -> bool {
        self != Alignment::Undefined
    }

    /// Whether this alignment may be used on `axis`.
    pub fn supports(self, axis: Axis) -> bool {
        !(self == Alignment::Baseline && axis == Axis::Horizontal)
    }

    /// The concrete alignment used on `axis`.
    ///
    /// `Undefined` becomes `Baseline` for rows and `Leading` for columns.
    pub fn resolve(self, axis: Axis) -> Alignment {
        match (self, axis) {
            (Alignment::Undefined, Axis::Vertical) => Alignment::Baseline,
            (Alignment::Undefined, Axis::Horizontal) => Alignment::Leading,
            (other, _) => other,
        }
    }

    /// Distance from the leading edge of a child to its alignment line.
    ///
    /// `ascent` is only consulted for `Baseline`. A child without a baseline
    /// has no alignment line and yields `None`.
    pub fn alignment_value(self, size: f32, ascent: Option<f32>) -> Option<f32> {
        match self {
            Alignment::Leading | Alignment::Fill | Alignment::Undefined => Some(0.0),
            Alignment::Trailing => Some(size),
            Alignment::Center => Some(size / 2.0),
            Alignment::Baseline => ascent.map(|a| a.clamp(0.0, size.max(0.0))),
        }
    }

    /// Offset of a whole alignment group inside a cell with `cell_delta`
    /// units of slack.
    pub fn gravity_offset(self, cell_delta: f32) -> f32 {
        match self {
            Alignment::Trailing => cell_delta,
            Alignment::Center => cell_delta / 2.0,
            Alignment::Leading | Alignment::Fill | Alignment::Baseline | Alignment::Undefined => {
                0.0
            }
        }
    }

    /// Final size of a child measured at `size` in a cell of `cell_size`.
    pub fn size_in_cell(self, size: f32, cell_size: f32) -> f32 {
        match self {
            Alignment::Fill => cell_size.max(0.0),
            _ => size,
        }
    }
}

/// A half-open range of grid lines `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    pub min: usize,
    pub max: usize,
}

impl Interval {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Number of cells covered.
    pub fn size(&self) -> usize {
        self.max.saturating_sub(self.min)
    }

    /// Whether this interval covers the unit interval starting at `line`.
    pub fn covers(&self, line: usize) -> bool {
        self.min <= line && line < self.max
    }
}

/// The characteristics of a cell group along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spec {
    start: Option<u32>,
    size: u32,
    alignment: Alignment,
    weight: f32,
}

impl Default for Spec {
    fn default() -> Self {
        Self::undefined()
    }
}

/// Build a spec covering `[start, start + size)`.
///
/// Pass [`UNDEFINED`] as `start` to let the grid pick the position.
pub fn spec(start: i32, size: i32, alignment: Alignment, weight: f32) -> Result<Spec, GridError> {
    let start = match start {
        UNDEFINED => None,
        s if s < 0 => return Err(GridError::InvalidStart { start: s }),
        s => Some(s as u32),
    };
    if size < 1 {
        return Err(GridError::InvalidSpan { size });
    }
    validate_weight(weight)?;

    Ok(Spec {
        start,
        size: size as u32,
        alignment,
        weight,
    })
}

fn validate_weight(weight: f32) -> Result<(), GridError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(GridError::InvalidWeight { weight });
    }
    Ok(())
}

impl Spec {
    /// Undefined start, size 1, no alignment, weight 0.
    pub const fn undefined() -> Self {
        Self {
            start: None,
            size: 1,
            alignment: Alignment::Undefined,
            weight: 0.0,
        }
    }

    /// Equivalent to `spec(start, 1, Alignment::Undefined, 0.0)`.
    pub fn at(start: i32) -> Result<Self, GridError> {
        spec(start, 1, Alignment::Undefined, 0.0)
    }

    /// Equivalent to `spec(start, size, Alignment::Undefined, 0.0)`.
    pub fn span(start: i32, size: i32) -> Result<Self, GridError> {
        spec(start, size, Alignment::Undefined, 0.0)
    }

    /// A copy of this spec with a different alignment.
    pub fn aligned(self, alignment: Alignment) -> Self {
        Self { alignment, ..self }
    }

    /// A copy of this spec with a different weight.
    pub fn weighted(self, weight: f32) -> Result<Self, GridError> {
        validate_weight(weight)?;
        Ok(Self { weight, ..self })
    }

    pub fn start(&self) -> Option<u32> {
        self.start
    }

    pub fn is_start_defined(&self) -> bool {
        self.start.is_some()
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// The covered grid lines, once the start is known.
    pub fn interval(&self) -> Option<Interval> {
        self.start.map(|start| {
            let start = start as usize;
            Interval::new(start, start + self.size as usize)
        })
    }

    /// A spec may absorb extra space if it declares an alignment or a weight.
    pub fn is_flexible(&self) -> bool {
        self.alignment.is_defined() || self.weight != 0.0
    }
}

/// Layout information attached to each child of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutParams {
    /// Vertical characteristics.
    pub row_spec: Spec,
    /// Horizontal characteristics.
    pub column_spec: Spec,
    /// Explicit margins; undefined sides fall back to the margin policy.
    pub margins: Margins,
    /// Marks a dedicated empty spacer child.
    pub spacer: bool,
}

impl LayoutParams {
    /// Params for a `row_spec` / `column_spec` pair.
    ///
    /// Rejects alignments the axis cannot honor (baseline on a column).
    pub fn new(row_spec: Spec, column_spec: Spec) -> Result<Self, GridError> {
        for (spec, axis) in [(row_spec, Axis::Vertical), (column_spec, Axis::Horizontal)] {
            if !spec.alignment().supports(axis) {
                return Err(GridError::UnsupportedAlignment {
                    alignment: spec.alignment(),
                    axis,
                });
            }
        }

        Ok(Self {
            row_spec,
            column_spec,
            margins: Margins::default(),
            spacer: false,
        })
    }

    pub fn with_margins(self, margins: Margins) -> Self {
        Self { margins, ..self }
    }

    /// Params for a spacer occupying the given specs.
    pub fn spacer(row_spec: Spec, column_spec: Spec) -> Result<Self, GridError> {
        Ok(Self {
            spacer: true,
            ..Self::new(row_spec, column_spec)?
        })
    }

    /// The spec governing `axis`.
    pub fn spec(&self, axis: Axis) -> Spec {
        match axis {
            Axis::Horizontal => self.column_spec,
            Axis::Vertical => self.row_spec,
        }
    }
}
