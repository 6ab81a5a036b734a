//! Range analysis: decides from the scan statistics alone whether a shift
//! can be applied.

use crate::error::{RangeOverflow, RebaseError, UnsupportedReason};
use crate::statistics::Statistics;
use logging::trace_range;
use std::fmt;

/// Which id space a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdKind {
    User,
    Group,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "uid",
            Self::Group => "gid",
        })
    }
}

/// Inclusive range of ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeSpec {
    min: u32,
    max: u32,
}

impl RangeSpec {
    /// Creates `[min, max]`. The bounds are reordered if given backwards.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    #[must_use]
    pub const fn contains(&self, id: u32) -> bool {
        self.min <= id && id <= self.max
    }

    /// Reports whether the two ranges share at least one id.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        !(other.min > self.max || other.max < self.min)
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// An approved shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftPlan {
    difference: i64,
    origin: RangeSpec,
    destination: RangeSpec,
}

impl ShiftPlan {
    /// Signed offset added to every uid, gid and ACL qualifier.
    #[must_use]
    pub const fn difference(&self) -> i64 {
        self.difference
    }

    /// Ids in use before the shift: `[uid_min, max(uid_max, gid_max)]`.
    #[must_use]
    pub const fn origin(&self) -> RangeSpec {
        self.origin
    }

    /// Ids in use after the shift.
    #[must_use]
    pub const fn destination(&self) -> RangeSpec {
        self.destination
    }

    #[cfg(test)]
    pub(crate) fn for_test(base: u32, origin_min: u32, origin_max: u32) -> Self {
        let difference = i64::from(base) - i64::from(origin_min);
        let destination_max = u32::try_from(i64::from(origin_max) + difference)
            .expect("destination fits");
        Self {
            difference,
            origin: RangeSpec::new(origin_min, origin_max),
            destination: RangeSpec::new(base, destination_max),
        }
    }

    /// Shifts one id, or returns `None` when the result leaves the 32-bit
    /// id space.
    #[must_use]
    pub fn shift(&self, id: u32) -> Option<u32> {
        i64::from(id)
            .checked_add(self.difference)
            .and_then(|shifted| u32::try_from(shifted).ok())
    }
}

/// Verdict of the range analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Analysis {
    /// The tree already starts at the requested base.
    AlreadyAtBase,
    /// Origin and destination share no id; the shift is always safe.
    Disjoint(ShiftPlan),
    /// The ranges overlap but no hard links exist; the shift needs an
    /// explicit go-ahead.
    Overlapping(ShiftPlan),
}

impl Analysis {
    #[must_use]
    pub const fn plan(&self) -> Option<&ShiftPlan> {
        match self {
            Self::AlreadyAtBase => None,
            Self::Disjoint(plan) | Self::Overlapping(plan) => Some(plan),
        }
    }

    #[must_use]
    pub const fn is_overlapping(&self) -> bool {
        matches!(self, Self::Overlapping(_))
    }
}

/// Analyses `stats` against `destination_base`.
///
/// Checks run in a fixed order and the first failing one wins: group ids
/// below user ids, then uid and gid overflow, then the no-op case, then the
/// overlap with hard links.
pub fn analyze(stats: &Statistics, destination_base: u32) -> Result<Analysis, RebaseError> {
    if stats.gid_min() < stats.uid_min() {
        return Err(UnsupportedReason::GidBelowUid {
            uid_min: stats.uid_min(),
            gid_min: stats.gid_min(),
        }
        .into());
    }

    let difference = i64::from(destination_base) - i64::from(stats.uid_min());
    trace_range!(
        "uid_min {} to base {}: difference {}",
        stats.uid_min(),
        destination_base,
        difference
    );

    for (kind, max) in [(IdKind::User, stats.uid_max()), (IdKind::Group, stats.gid_max())] {
        if i64::from(max) + difference > i64::from(u32::MAX) {
            return Err(RangeOverflow::new(kind, max, difference).into());
        }
    }

    if stats.uid_min() == destination_base {
        return Ok(Analysis::AlreadyAtBase);
    }

    let origin = RangeSpec::new(stats.uid_min(), stats.uid_max().max(stats.gid_max()));
    let destination_max = i64::from(origin.max()) + difference;
    // Both bounds were checked against u32::MAX above and difference keeps
    // uid_min at destination_base, which is non-negative.
    let destination_max = u32::try_from(destination_max).unwrap_or(u32::MAX);
    let destination = RangeSpec::new(destination_base, destination_max);
    let plan = ShiftPlan {
        difference,
        origin,
        destination,
    };

    if !origin.overlaps(&destination) {
        trace_range!("origin {} and destination {} are disjoint", origin, destination);
        return Ok(Analysis::Disjoint(plan));
    }

    if stats.has_hard_links() {
        return Err(UnsupportedReason::OverlapWithHardLinks {
            origin,
            destination,
        }
        .into());
    }

    trace_range!("origin {} overlaps destination {}", origin, destination);
    Ok(Analysis::Overlapping(plan))
}
