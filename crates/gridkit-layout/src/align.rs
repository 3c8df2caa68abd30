//! Alignment groups and in-cell placement.
//!
//! Children sharing a span and an alignment on one axis form an alignment
//! group. Each member is split around its alignment line (its leading edge,
//! center, far edge or baseline) and the group keeps the largest extent on
//! either side. That extent is the size requirement the group puts on its
//! cell, and it is what lines members up when the cell is laid out.
//!
//! A baseline member that reports no baseline has no alignment line. It
//! sits at the leading edge of the group and only widens the group to its
//! own size.

use std::collections::HashMap;

use crate::margins::AxisMargins;
use crate::spec::{Alignment, Interval};

/// Extent of an alignment group on either side of its alignment line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub before: f32,
    pub after: f32,
    /// Largest member without an alignment line.
    pub unaligned: f32,
}

impl Bounds {
    pub fn include(&mut self, before: f32, after: f32) {
        self.before = self.before.max(before);
        self.after = self.after.max(after);
    }

    pub fn include_unaligned(&mut self, size: f32) {
        self.unaligned = self.unaligned.max(size);
    }

    pub fn size(&self) -> f32 {
        (self.before + self.after).max(self.unaligned)
    }
}

/// One child as seen along a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedItem {
    pub interval: Interval,
    /// Resolved alignment; never `Undefined`.
    pub alignment: Alignment,
    /// Measured size without margins.
    pub size: f32,
    /// Baseline offset from the child's top edge, rows only.
    pub ascent: Option<f32>,
    pub margins: AxisMargins,
}

impl AlignedItem {
    /// Size including margins.
    pub fn box_size(&self) -> f32 {
        self.size + self.margins.total()
    }

    /// Distance from the margin box's leading edge to the alignment line,
    /// or `None` for a baseline item without a baseline.
    pub fn alignment_value(&self) -> Option<f32> {
        let ascent = self.ascent.map(|a| a + self.margins.leading);
        self.alignment.alignment_value(self.box_size(), ascent)
    }
}

/// Final position of a child inside its cell group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Offset of the child's own edge from the first line of its cell group.
    pub offset: f32,
    pub size: f32,
}

/// Group bounds for one axis.
#[derive(Debug, Clone, Default)]
pub struct AlignmentResolver {
    groups: HashMap<(Interval, Alignment), Bounds>,
}

impl AlignmentResolver {
    pub fn new(items: &[AlignedItem]) -> Self {
        let mut groups: HashMap<(Interval, Alignment), Bounds> = HashMap::new();
        for item in items {
            let bounds = groups.entry((item.interval, item.alignment)).or_default();
            match item.alignment_value() {
                Some(value) => bounds.include(value, item.box_size() - value),
                None => bounds.include_unaligned(item.box_size()),
            }
        }
        Self { groups }
    }

    pub fn bounds(&self, interval: Interval, alignment: Alignment) -> Option<Bounds> {
        self.groups.get(&(interval, alignment)).copied()
    }

    /// Minimum extent each spanned interval must have, sorted by interval.
    pub fn span_requirements(&self) -> Vec<(Interval, f32)> {
        let mut requirements: HashMap<Interval, f32> = HashMap::new();
        for ((interval, _), bounds) in &self.groups {
            let entry = requirements.entry(*interval).or_insert(0.0);
            *entry = entry.max(bounds.size());
        }
        let mut sorted: Vec<(Interval, f32)> = requirements.into_iter().collect();
        sorted.sort_by_key(|(interval, _)| *interval);
        sorted
    }

    /// Position `item` inside a cell group of extent `cell`.
    pub fn place(&self, item: &AlignedItem, cell: f32) -> Placement {
        let value = item.alignment_value();
        let bounds = self
            .bounds(item.interval, item.alignment)
            .unwrap_or_else(|| {
                let mut own = Bounds::default();
                match value {
                    Some(v) => own.include(v, item.box_size() - v),
                    None => own.include_unaligned(item.box_size()),
                }
                own
            });

        let gravity = item.alignment.gravity_offset(cell - bounds.size());
        let alignment_offset = value.map_or(0.0, |v| bounds.before - v);
        let size = item
            .alignment
            .size_in_cell(item.size, cell - item.margins.total());

        Placement {
            offset: gravity + alignment_offset + item.margins.leading,
            size,
        }
    }
}
