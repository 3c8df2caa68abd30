//! Scripted measurable child.

use std::cell::Cell;

use gridkit_layout::{MeasureSpec, Measurable, Measurement, Visibility};

/// A child with fixed sizes that records how it was last measured.
#[derive(Debug)]
pub struct TestChild {
    measurement: Measurement,
    visibility: Visibility,
    /// Height per unit of width, for children that wrap like text.
    wrap_area: Option<f32>,
    last_width: Cell<Option<MeasureSpec>>,
    measure_calls: Cell<usize>,
}

impl TestChild {
    pub fn fixed(width: f32, height: f32) -> Self {
        Self::from_measurement(Measurement::fixed(width, height))
    }

    pub fn range(min_width: f32, pref_width: f32, min_height: f32, pref_height: f32) -> Self {
        Self::from_measurement(Measurement::range(min_width, pref_width, min_height, pref_height))
    }

    pub fn from_measurement(measurement: Measurement) -> Self {
        Self {
            measurement,
            visibility: Visibility::Visible,
            wrap_area: None,
            last_width: Cell::new(None),
            measure_calls: Cell::new(0),
        }
    }

    /// A child whose height is `area / width` when given an exact width.
    pub fn wrapping(width: f32, area: f32) -> Self {
        Self {
            wrap_area: Some(area),
            ..Self::fixed(width, area / width)
        }
    }

    pub fn with_baseline(mut self, baseline: f32) -> Self {
        self.measurement = self.measurement.with_baseline(baseline);
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.visibility = Visibility::Collapsed;
        self
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn last_width(&self) -> Option<MeasureSpec> {
        self.last_width.get()
    }

    pub fn measure_calls(&self) -> usize {
        self.measure_calls.get()
    }
}

impl Measurable for TestChild {
    fn measure(&self, width: MeasureSpec, _height: MeasureSpec) -> Measurement {
        self.last_width.set(Some(width));
        self.measure_calls.set(self.measure_calls.get() + 1);

        match (self.wrap_area, width) {
            (Some(area), MeasureSpec::Exactly(w)) if w > 0.0 => Measurement {
                min_width: w,
                pref_width: w,
                min_height: area / w,
                pref_height: area / w,
                baseline: self.measurement.baseline,
            },
            _ => self.measurement,
        }
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }
}
