//! The child capability consumed by the grid.
//!
//! The engine never owns content; it asks each child for its size under a
//! constraint and receives back minimum and preferred sizes plus an optional
//! baseline.

use crate::spec::Axis;

/// A size constraint handed to a child along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasureSpec {
    /// No limit.
    #[default]
    Unspecified,
    /// At most the given size.
    AtMost(f32),
    /// Exactly the given size.
    Exactly(f32),
}

impl MeasureSpec {
    /// The size limit, if any.
    pub fn limit(&self) -> Option<f32> {
        match *self {
            MeasureSpec::Unspecified => None,
            MeasureSpec::AtMost(size) | MeasureSpec::Exactly(size) => Some(size),
        }
    }

    /// The constraint left for content after removing `used` units
    /// (padding, margins). `Exactly` relaxes to `AtMost`.
    pub fn shrink_for_child(&self, used: f32) -> MeasureSpec {
        match *self {
            MeasureSpec::Unspecified => MeasureSpec::Unspecified,
            MeasureSpec::AtMost(size) | MeasureSpec::Exactly(size) => {
                MeasureSpec::AtMost((size - used).max(0.0))
            }
        }
    }

    /// Same mode with `used` units removed.
    pub fn deflate(&self, used: f32) -> MeasureSpec {
        match *self {
            MeasureSpec::Unspecified => MeasureSpec::Unspecified,
            MeasureSpec::AtMost(size) => MeasureSpec::AtMost((size - used).max(0.0)),
            MeasureSpec::Exactly(size) => MeasureSpec::Exactly((size - used).max(0.0)),
        }
    }
}

/// Visibility of a child as far as layout is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Laid out and shown.
    #[default]
    Visible,
    /// Laid out but not shown; still takes up space.
    Invisible,
    /// Treated as zero-sized, but still occupies its cells.
    Collapsed,
}

/// Result of measuring a child.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    pub min_width: f32,
    pub pref_width: f32,
    pub min_height: f32,
    pub pref_height: f32,
    /// Distance from the top edge to the baseline, if the child has one.
    pub baseline: Option<f32>,
}

impl Measurement {
    /// A rigid child whose minimum and preferred sizes agree.
    pub fn fixed(width: f32, height: f32) -> Self {
        Self {
            min_width: width,
            pref_width: width,
            min_height: height,
            pref_height: height,
            baseline: None,
        }
    }

    /// A child that prefers `pref` but can shrink to `min`.
    pub fn range(min_width: f32, pref_width: f32, min_height: f32, pref_height: f32) -> Self {
        Self {
            min_width,
            pref_width: pref_width.max(min_width),
            min_height,
            pref_height: pref_height.max(min_height),
            baseline: None,
        }
    }

    pub fn with_baseline(self, baseline: f32) -> Self {
        Self {
            baseline: Some(baseline),
            ..self
        }
    }

    pub fn min(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }

    pub fn pref(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.pref_width,
            Axis::Vertical => self.pref_height,
        }
    }
}

/// Capability a host content item provides to the grid.
pub trait Measurable {
    /// Measure under the given constraints.
    fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> Measurement;

    /// Current visibility.
    fn visibility(&self) -> Visibility {
        Visibility::Visible
    }
}

impl<T: Measurable + ?Sized> Measurable for Box<T> {
    fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> Measurement {
        (**self).measure(width, height)
    }

    fn visibility(&self) -> Visibility {
        (**self).visibility()
    }
}

impl<T: Measurable + ?Sized> Measurable for &T {
    fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> Measurement {
        (**self).measure(width, height)
    }

    fn visibility(&self) -> Visibility {
        (**self).visibility()
    }
}
