//! Flexibility classification of row/column groups.
//!
//! A group is the set of children sharing the same pair of boundary lines.
//! It is flexible only if every member is; its verdict is then pushed down to
//! the unit intervals between consecutive grid lines, which are what the
//! space distributor grows.

use std::collections::BTreeMap;

use tracing::trace;

use crate::spec::Interval;

/// One child's contribution along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexMember {
    pub interval: Interval,
    /// Declared a non-default alignment or a non-zero weight.
    pub flexible: bool,
    /// Zero for collapsed children.
    pub weight: f32,
}

/// Flexibility and weight of the interval between two consecutive lines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntervalFlex {
    pub flexible: bool,
    pub weight: f32,
}

#[derive(Debug, Clone, Copy)]
struct Group {
    flexible: bool,
    weight: f32,
}

/// Derives per-interval flexibility from group membership.
#[derive(Debug, Default)]
pub struct FlexibilityClassifier;

impl FlexibilityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify the `count` unit intervals of an axis.
    pub fn classify(&self, count: usize, members: &[FlexMember]) -> Vec<IntervalFlex> {
        let groups = group_members(members);

        let mut state: Vec<Option<bool>> = vec![None; count];
        let mut weights = vec![0.0f32; count];

        // Unit groups decide their own interval.
        for (interval, group) in groups.iter().filter(|(i, _)| i.size() == 1) {
            if interval.min < count {
                state[interval.min] = Some(group.flexible);
                weights[interval.min] = group.weight;
            }
        }

        // Inflexible spans pin everything they cover.
        for (interval, _) in groups
            .iter()
            .filter(|(i, g)| i.size() > 1 && !g.flexible)
        {
            for line in interval.min..interval.max.min(count) {
                state[line] = Some(false);
            }
        }

        // Flexible spans need at least one flexible interval to grow into.
        for (interval, group) in groups.iter().filter(|(i, g)| i.size() > 1 && g.flexible) {
            let covered = interval.min..interval.max.min(count);
            if !covered.clone().any(|line| state[line] == Some(true)) {
                for line in covered.clone() {
                    if state[line].is_none() {
                        state[line] = Some(true);
                    }
                }
            }

            let flexible_lines: Vec<usize> = covered.filter(|&l| state[l] == Some(true)).collect();
            if !flexible_lines.is_empty() {
                let share = group.weight / flexible_lines.len() as f32;
                for line in flexible_lines {
                    weights[line] = weights[line].max(share);
                }
            }
        }

        let result: Vec<IntervalFlex> = state
            .into_iter()
            .zip(weights)
            .map(|(flexible, weight)| {
                let flexible = flexible.unwrap_or(false);
                IntervalFlex {
                    flexible,
                    weight: if flexible { weight } else { 0.0 },
                }
            })
            .collect();

        trace!(
            "Flexible intervals: {:?}",
            result.iter().map(|f| f.flexible).collect::<Vec<_>>()
        );
        result
    }
}

/// Parallel members combine by AND; the group weight is the largest member
/// weight.
fn group_members(members: &[FlexMember]) -> BTreeMap<Interval, Group> {
    let mut groups: BTreeMap<Interval, Group> = BTreeMap::new();
    for member in members {
        groups
            .entry(member.interval)
            .and_modify(|g| {
                g.flexible &= member.flexible;
                g.weight = g.weight.max(member.weight);
            })
            .or_insert(Group {
                flexible: member.flexible,
                weight: member.weight,
            });
    }
    groups
}
