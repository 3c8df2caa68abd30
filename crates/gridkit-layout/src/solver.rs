//! Grid-line constraint solver.
//!
//! Every constraint has the form `x[to] - x[from] >= value`. Starting from
//! zero, coordinates are raised until every link holds, which yields the
//! least solution: the longest path from line 0 to each line.
//!
//! Links pointing forward (`from < to`) form a DAG over line indices, so a
//! single sweep in ascending source order settles them. Backward links (the
//! container bound `N -> 0` in practice) are relaxed after each sweep, and a
//! solution needs at most one sweep per backward link plus one. A sweep past
//! that bound that still moves a coordinate means a positive cycle: the
//! constraints conflict, one link is dropped and the solve restarts.
//!
//! Without order links the lines need not be increasing, so the extent of a
//! solution is measured from its lowest to its highest line.

use std::cmp::Ordering;

use tracing::{debug, trace};

const EPSILON: f32 = 1e-4;

/// Where a link came from. Earlier variants are dropped first on conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkKind {
    /// The container extent bound.
    Container,
    /// Keeps consecutive lines in index order.
    Order,
    /// A child's size requirement.
    Content,
}

/// `x[to] - x[from] >= value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    pub value: f32,
    pub kind: LinkKind,
}

impl Link {
    pub fn content(from: usize, to: usize, value: f32) -> Self {
        Self {
            from,
            to,
            value,
            kind: LinkKind::Content,
        }
    }

    pub fn order(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            value: 0.0,
            kind: LinkKind::Order,
        }
    }

    /// `x[line] - x[0] <= available`.
    pub fn container(line: usize, available: f32) -> Self {
        Self {
            from: line,
            to: 0,
            value: -available,
            kind: LinkKind::Container,
        }
    }

    fn is_forward(&self) -> bool {
        self.from < self.to
    }
}

/// Solved grid-line coordinates plus the links dropped to get there.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisSolution {
    pub locations: Vec<f32>,
    /// Links discarded to break conflicts, in the order they were dropped.
    pub dropped: Vec<Link>,
}

impl AxisSolution {
    /// Distance between the lowest and the highest grid line.
    pub fn extent(&self) -> f32 {
        extent(&self.locations)
    }

    pub fn is_consistent(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Solver for one axis.
#[derive(Debug, Clone, Default)]
pub struct AxisSolver {
    line_count: usize,
    links: Vec<Link>,
}

impl AxisSolver {
    /// A solver over lines `0..line_count`.
    pub fn new(line_count: usize) -> Self {
        Self {
            line_count,
            links: Vec::new(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Add a link. Links touching lines outside the axis are ignored.
    pub fn add_link(&mut self, link: Link) {
        if link.from >= self.line_count || link.to >= self.line_count {
            trace!("Ignoring out-of-range link {:?}", link);
            return;
        }
        self.links.push(link);
    }

    /// Order links between every pair of consecutive lines.
    pub fn preserve_order(&mut self) {
        for line in 1..self.line_count {
            self.add_link(Link::order(line - 1, line));
        }
    }

    pub fn solve(&self) -> AxisSolution {
        let mut active: Vec<Link> = self.links.clone();
        let mut dropped = Vec::new();

        loop {
            match relax(self.line_count, &active) {
                Ok(locations) => {
                    debug!(
                        lines = self.line_count,
                        links = active.len(),
                        dropped = dropped.len(),
                        "Axis solved"
                    );
                    return AxisSolution { locations, dropped };
                }
                Err(culprit) => {
                    let link = active.remove(culprit);
                    debug!("Dropping conflicting link {:?}", link);
                    dropped.push(link);
                }
            }
        }
    }
}

/// Spread of a set of line coordinates. Zero when empty.
pub fn extent(locations: &[f32]) -> f32 {
    let low = locations.iter().copied().reduce(f32::min);
    let high = locations.iter().copied().reduce(f32::max);
    match (low, high) {
        (Some(low), Some(high)) => high - low,
        _ => 0.0,
    }
}

/// Bucket of forward links by source line, plus the backward links.
struct LinkIndex {
    forward: Vec<Vec<usize>>,
    backward: Vec<usize>,
}

impl LinkIndex {
    fn new(line_count: usize, links: &[Link]) -> Self {
        let mut forward = vec![Vec::new(); line_count];
        let mut backward = Vec::new();
        for (index, link) in links.iter().enumerate() {
            if link.is_forward() {
                forward[link.from].push(index);
            } else {
                backward.push(index);
            }
        }
        Self { forward, backward }
    }
}

/// Returns the least solution, or the index of the link to drop.
fn relax(line_count: usize, links: &[Link]) -> Result<Vec<f32>, usize> {
    let index = LinkIndex::new(line_count, links);
    let mut locations = vec![0.0f32; line_count];
    let mut tight = vec![false; links.len()];
    let bound = index.backward.len() + 1;

    for sweep in 0..=bound {
        tight.iter_mut().for_each(|t| *t = false);
        let mut changed = false;

        let forward = index.forward.iter().flatten();
        for &i in forward.chain(index.backward.iter()) {
            let link = &links[i];
            let candidate = locations[link.from] + link.value;
            if candidate > locations[link.to] + EPSILON {
                locations[link.to] = candidate;
                tight[i] = true;
                changed = true;
            }
        }

        if !changed {
            trace!("Converged after {} sweeps", sweep + 1);
            return Ok(locations);
        }
    }

    // Still moving past the bound: a positive cycle.
    let culprit = tight
        .iter()
        .enumerate()
        .filter(|(_, t)| **t)
        .map(|(i, _)| i)
        .min_by(|&a, &b| match links[a].kind.cmp(&links[b].kind) {
            Ordering::Equal => a.cmp(&b),
            other => other,
        });
    Err(culprit.unwrap_or(0))
}
