//! Weighted distribution of leftover space.

use tracing::trace;

use crate::flexibility::IntervalFlex;
use crate::solver::extent;

/// Grows flexible intervals until the axis fills the available extent.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpaceDistributor;

impl SpaceDistributor {
    pub fn new() -> Self {
        Self
    }

    /// Growth of every interval when `leftover` units are shared.
    ///
    /// Shares follow the weights of the flexible intervals, or are equal
    /// when those weights sum to zero. Inflexible intervals never grow.
    pub fn shares(&self, leftover: f32, flex: &[IntervalFlex]) -> Vec<f32> {
        let mut shares = vec![0.0f32; flex.len()];
        if leftover <= 0.0 {
            return shares;
        }

        let flexible = flex.iter().filter(|f| f.flexible).count();
        if flexible == 0 {
            return shares;
        }

        let total_weight: f32 = flex.iter().filter(|f| f.flexible).map(|f| f.weight).sum();
        for (share, f) in shares.iter_mut().zip(flex) {
            if !f.flexible {
                continue;
            }
            *share = if total_weight > 0.0 {
                leftover * f.weight / total_weight
            } else {
                leftover / flexible as f32
            };
        }
        shares
    }

    /// Shift solved grid lines so the axis spans `available`.
    ///
    /// Each line moves by the growth of the intervals before it. When the
    /// minimum extent already meets `available`, the lines are returned
    /// unchanged.
    pub fn distribute(&self, locations: &[f32], flex: &[IntervalFlex], available: f32) -> Vec<f32> {
        let minimum = extent(locations);
        let leftover = (available - minimum).max(0.0);
        let shares = self.shares(leftover, flex);

        trace!(leftover, minimum, available, "Distributing leftover space");

        let mut shifted = Vec::with_capacity(locations.len());
        let mut growth = 0.0f32;
        for (line, location) in locations.iter().enumerate() {
            if line > 0 {
                growth += shares.get(line - 1).copied().unwrap_or(0.0);
            }
            shifted.push(location + growth);
        }
        shifted
    }
}
