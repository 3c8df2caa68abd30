//! Single-axis pipeline: alignment groups, constraint solving, and
//! distribution of leftover space.

use tracing::{trace, warn};

use crate::align::{AlignedItem, AlignmentResolver, Placement};
use crate::distribute::SpaceDistributor;
use crate::flexibility::{FlexMember, FlexibilityClassifier, IntervalFlex};
use crate::margins::AxisMargins;
use crate::solver::{AxisSolution, AxisSolver, Link};
use crate::spec::{Alignment, Axis, Interval};
use crate::LayoutDiagnostic;

/// A child's input to one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisChild {
    pub interval: Interval,
    /// Alignment as declared in the spec.
    pub alignment: Alignment,
    pub weight: f32,
    pub min: f32,
    pub pref: f32,
    pub ascent: Option<f32>,
    pub margins: AxisMargins,
    pub collapsed: bool,
}

impl AxisChild {
    fn aligned(&self, axis: Axis, size: f32) -> AlignedItem {
        let margins = if self.collapsed && !self.alignment.is_defined() {
            AxisMargins::default()
        } else {
            self.margins
        };
        AlignedItem {
            interval: self.interval,
            alignment: self.alignment.resolve(axis),
            size: if self.collapsed { 0.0 } else { size },
            ascent: if self.collapsed { None } else { self.ascent },
            margins,
        }
    }

    fn flex_member(&self) -> FlexMember {
        FlexMember {
            interval: self.interval,
            flexible: self.alignment.is_defined() || self.weight != 0.0,
            weight: if self.collapsed { 0.0 } else { self.weight },
        }
    }
}

/// Bisection steps when shrinking children between their two sizes.
const SHRINK_STEPS: usize = 20;

/// Which of a child's measured sizes an axis was solved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Preferred,
    /// Somewhere between preferred and minimum, as far down as needed.
    Minimum,
}

/// One solve of the axis at a fixed set of child sizes.
struct Attempt {
    items: Vec<AlignedItem>,
    resolver: AlignmentResolver,
    solution: AxisSolution,
}

/// Outcome of solving one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisResult {
    /// Grid-line coordinates after distribution, relative to the content box.
    pub lines: Vec<f32>,
    /// Extent required by the children before distribution.
    pub required: f32,
    pub tier: SizeTier,
    /// Parallel to the children handed to [`AxisPipeline::new`].
    pub placements: Vec<Placement>,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

/// Everything needed to solve one axis of the grid.
#[derive(Debug)]
pub struct AxisPipeline<'a> {
    axis: Axis,
    count: usize,
    children: &'a [AxisChild],
    order_preserved: bool,
}

impl<'a> AxisPipeline<'a> {
    pub fn new(axis: Axis, count: usize, children: &'a [AxisChild], order_preserved: bool) -> Self {
        Self {
            axis,
            count,
            children,
            order_preserved,
        }
    }

    pub fn flexibility(&self) -> Vec<IntervalFlex> {
        let members: Vec<FlexMember> = self.children.iter().map(AxisChild::flex_member).collect();
        FlexibilityClassifier::new().classify(self.count, &members)
    }

    /// Solve the axis.
    ///
    /// `bound` is the extent available to the children, if limited. When
    /// preferred sizes overflow it, every child shrinks toward its minimum
    /// by the same fraction, only as far as needed to fit. With `grow`,
    /// leftover space up to `bound` goes to the flexible intervals.
    pub fn run(&self, bound: Option<f32>, grow: bool) -> AxisResult {
        let mut diagnostics = Vec::new();

        let (tier, attempt) = match bound {
            None => (SizeTier::Preferred, self.attempt(0.0, None)),
            Some(available) => {
                let preferred = self.attempt(0.0, Some(available));
                if preferred.solution.is_consistent() {
                    (SizeTier::Preferred, preferred)
                } else {
                    trace!(axis = ?self.axis, "Preferred sizes overflow, shrinking");
                    let minimum = self.attempt(1.0, Some(available));
                    if minimum.solution.is_consistent() {
                        (SizeTier::Minimum, self.shrink_to_fit(minimum, available))
                    } else {
                        self.report_conflicts(&minimum.solution, available, &mut diagnostics);
                        (SizeTier::Minimum, minimum)
                    }
                }
            }
        };
        let Attempt {
            items,
            resolver,
            solution,
        } = attempt;

        let required = solution.extent();
        let lines = match bound {
            Some(available) if grow => {
                SpaceDistributor::new().distribute(
                    &solution.locations,
                    &self.flexibility(),
                    available,
                )
            }
            _ => solution.locations,
        };

        let placements = items
            .iter()
            .map(|item| {
                let cell = lines[item.interval.max.min(self.count)]
                    - lines[item.interval.min.min(self.count)];
                resolver.place(item, cell)
            })
            .collect();

        AxisResult {
            lines,
            required,
            tier,
            placements,
            diagnostics,
        }
    }

    /// Smallest shrink that fits `available`, given that full shrink fits.
    fn shrink_to_fit(&self, minimum: Attempt, available: f32) -> Attempt {
        let mut best = minimum;
        let (mut overflows, mut fits) = (0.0f32, 1.0f32);
        for _ in 0..SHRINK_STEPS {
            let shrink = (overflows + fits) / 2.0;
            let attempt = self.attempt(shrink, Some(available));
            if attempt.solution.is_consistent() {
                fits = shrink;
                best = attempt;
            } else {
                overflows = shrink;
            }
        }
        trace!(axis = ?self.axis, shrink = fits, "Shrunk children to fit");
        best
    }

    /// Solve with every child at `pref - shrink * (pref - min)`.
    fn attempt(&self, shrink: f32, bound: Option<f32>) -> Attempt {
        let items: Vec<AlignedItem> = self
            .children
            .iter()
            .map(|child| {
                let size = child.pref - shrink * (child.pref - child.min).max(0.0);
                child.aligned(self.axis, size)
            })
            .collect();
        let resolver = AlignmentResolver::new(&items);

        let mut solver = AxisSolver::new(self.count + 1);
        if self.order_preserved {
            solver.preserve_order();
        }
        for (interval, size) in resolver.span_requirements() {
            solver.add_link(Link::content(interval.min, interval.max, size));
        }
        if let Some(available) = bound {
            if self.order_preserved {
                solver.add_link(Link::container(self.count, available));
            } else {
                // Unordered lines may overshoot the last one.
                for line in 1..=self.count {
                    solver.add_link(Link::container(line, available));
                }
            }
        }

        let solution = solver.solve();
        Attempt {
            items,
            resolver,
            solution,
        }
    }

    fn report_conflicts(
        &self,
        solution: &AxisSolution,
        available: f32,
        diagnostics: &mut Vec<LayoutDiagnostic>,
    ) {
        for link in &solution.dropped {
            warn!(
                axis = ?self.axis,
                from = link.from,
                to = link.to,
                value = link.value,
                "Dropped inconsistent constraint {:?}",
                link.kind
            );
            diagnostics.push(LayoutDiagnostic::InconsistentConstraint {
                axis: self.axis,
                from: link.from,
                to: link.to,
                value: link.value,
                kind: link.kind,
            });
        }

        let required = solution.extent();
        warn!(
            axis = ?self.axis,
            required,
            available,
            "Children do not fit the container"
        );
        diagnostics.push(LayoutDiagnostic::OverconstrainedAxis {
            axis: self.axis,
            required,
            available,
        });
    }
}
