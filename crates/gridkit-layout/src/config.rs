//! Grid configuration.

use serde::{Deserialize, Serialize};

use crate::spec::Axis;
use crate::{EdgeSizes, GridError};

/// Direction in which default cell indices are generated, and which axis is
/// solved first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Fill rows left to right, wrapping at the column count.
    #[default]
    Horizontal,
    /// Fill columns top to bottom, wrapping at the row count.
    Vertical,
}

impl Orientation {
    /// The axis whose indices the placer advances along.
    pub fn minor_axis(self) -> Axis {
        match self {
            Orientation::Horizontal => Axis::Horizontal,
            Orientation::Vertical => Axis::Vertical,
        }
    }

    /// The axis laid out first.
    pub fn first_axis(self) -> Axis {
        self.minor_axis()
    }
}

/// What the edges of children are aligned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Align raw child bounds; margins are shared per grid line.
    AlignBounds,
    /// Align child bounds extended by their own margins.
    #[default]
    AlignMargins,
}

/// Horizontal reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Grid-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub orientation: Orientation,
    /// Row count used for wrapping default placement; `None` = derived.
    pub row_count: Option<u32>,
    /// Column count used for wrapping default placement; `None` = derived.
    pub column_count: Option<u32>,
    pub use_default_margins: bool,
    pub alignment_mode: AlignmentMode,
    pub row_order_preserved: bool,
    pub column_order_preserved: bool,
    pub layout_direction: LayoutDirection,
    pub padding: EdgeSizes,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            row_count: None,
            column_count: None,
            use_default_margins: false,
            alignment_mode: AlignmentMode::AlignMargins,
            row_order_preserved: true,
            column_order_preserved: true,
            layout_direction: LayoutDirection::Ltr,
            padding: EdgeSizes::default(),
        }
    }
}

impl GridConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        serde_json::from_str(json).map_err(|e| GridError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, GridError> {
        serde_json::to_string_pretty(self).map_err(|e| GridError::Config(e.to_string()))
    }

    /// Defined count for `axis`.
    pub fn count(&self, axis: Axis) -> Option<u32> {
        match axis {
            Axis::Horizontal => self.column_count,
            Axis::Vertical => self.row_count,
        }
    }

    /// Whether grid lines along `axis` must stay in index order.
    pub fn order_preserved(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.column_order_preserved,
            Axis::Vertical => self.row_order_preserved,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.layout_direction == LayoutDirection::Rtl
    }
}
