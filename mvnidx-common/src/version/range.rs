// mvnidx-common/src/version/range.rs
// Maven version ranges: `[1.0,2.0)`, `(,1.5],[2.0,)`, `[1.2]`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::maven::MavenVersion;
use crate::error::{IdxError, Result};

/// One interval of a range. `None` bounds are unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Restriction {
    lower: Option<MavenVersion>,
    lower_inclusive: bool,
    upper: Option<MavenVersion>,
    upper_inclusive: bool,
}

impl Restriction {
    pub fn new(
        lower: Option<MavenVersion>,
        lower_inclusive: bool,
        upper: Option<MavenVersion>,
        upper_inclusive: bool,
    ) -> Self {
        Self {
            lower,
            lower_inclusive,
            upper,
            upper_inclusive,
        }
    }

    pub fn lower(&self) -> Option<&MavenVersion> {
        self.lower.as_ref()
    }

    pub fn is_lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    pub fn upper(&self) -> Option<&MavenVersion> {
        self.upper.as_ref()
    }

    pub fn is_upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    pub fn contains(&self, version: &MavenVersion) -> bool {
        if let Some(lower) = &self.lower {
            match version.maven_cmp(lower) {
                Ordering::Less => return false,
                Ordering::Equal if !self.lower_inclusive => return false,
                _ => {}
            }
        }
        if let Some(upper) = &self.upper {
            match version.maven_cmp(upper) {
                Ordering::Greater => return false,
                Ordering::Equal if !self.upper_inclusive => return false,
                _ => {}
            }
        }
        true
    }

    fn is_pin(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(l), Some(u)) => {
                self.lower_inclusive && self.upper_inclusive && l.maven_cmp(u) == Ordering::Equal
            }
            _ => false,
        }
    }

    /// Intersection of two intervals, `None` if they do not overlap.
    fn intersect(&self, other: &Restriction) -> Option<Restriction> {
        let (lower, lower_inclusive) = match (&self.lower, &other.lower) {
            (None, None) => (None, self.lower_inclusive && other.lower_inclusive),
            (Some(_), None) => (self.lower.clone(), self.lower_inclusive),
            (None, Some(_)) => (other.lower.clone(), other.lower_inclusive),
            (Some(a), Some(b)) => match a.maven_cmp(b) {
                Ordering::Greater => (self.lower.clone(), self.lower_inclusive),
                Ordering::Less => (other.lower.clone(), other.lower_inclusive),
                Ordering::Equal => (
                    self.lower.clone(),
                    self.lower_inclusive && other.lower_inclusive,
                ),
            },
        };
        let (upper, upper_inclusive) = match (&self.upper, &other.upper) {
            (None, None) => (None, self.upper_inclusive && other.upper_inclusive),
            (Some(_), None) => (self.upper.clone(), self.upper_inclusive),
            (None, Some(_)) => (other.upper.clone(), other.upper_inclusive),
            (Some(a), Some(b)) => match a.maven_cmp(b) {
                Ordering::Less => (self.upper.clone(), self.upper_inclusive),
                Ordering::Greater => (other.upper.clone(), other.upper_inclusive),
                Ordering::Equal => (
                    self.upper.clone(),
                    self.upper_inclusive && other.upper_inclusive,
                ),
            },
        };
        if let (Some(l), Some(u)) = (&lower, &upper) {
            match l.maven_cmp(u) {
                Ordering::Greater => return None,
                Ordering::Equal if !(lower_inclusive && upper_inclusive) => return None,
                _ => {}
            }
        }
        Some(Restriction::new(lower, lower_inclusive, upper, upper_inclusive))
    }

    fn cmp_lower(&self, other: &Restriction) -> Ordering {
        match (&self.lower, &other.lower) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a
                .maven_cmp(b)
                .then_with(|| other.lower_inclusive.cmp(&self.lower_inclusive)),
        }
    }

    fn cmp_upper(&self, other: &Restriction) -> Ordering {
        match (&self.upper, &other.upper) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a
                .maven_cmp(b)
                .then_with(|| self.upper_inclusive.cmp(&other.upper_inclusive)),
        }
    }

    /// True if this interval ends where `next` starts, leaving no gap.
    fn meets(&self, next: &Restriction) -> bool {
        match (&self.upper, &next.lower) {
            (Some(upper), Some(lower)) => {
                upper.maven_cmp(lower) == Ordering::Equal
                    && (self.upper_inclusive || next.lower_inclusive)
            }
            _ => false,
        }
    }

    /// True if the intervals of `range` cover this one without gaps.
    fn is_covered_by(&self, range: &VersionRange) -> bool {
        let mut pieces: Vec<Restriction> = range
            .restrictions
            .iter()
            .filter_map(|r| self.intersect(r))
            .collect();
        pieces.sort_by(|a, b| a.cmp_lower(b));
        let (Some(first), Some(last)) = (pieces.first(), pieces.last()) else {
            return false;
        };
        first.cmp_lower(self) == Ordering::Equal
            && last.cmp_upper(self) == Ordering::Equal
            && pieces.windows(2).all(|pair| pair[0].meets(&pair[1]))
    }

    /// Admits some version at or above `0`.
    fn reaches_zero(&self) -> bool {
        match &self.upper {
            None => true,
            Some(upper) => match upper.maven_cmp(&MavenVersion::zero()) {
                Ordering::Greater => true,
                Ordering::Equal => self.upper_inclusive,
                Ordering::Less => false,
            },
        }
    }

    fn parse(spec: &str, whole: &str) -> Result<Restriction> {
        let invalid = |reason: &str| IdxError::InvalidRange(whole.to_string(), reason.to_string());
        let lower_inclusive = spec.starts_with('[');
        let upper_inclusive = spec.ends_with(']');
        let inner = spec[1..spec.len() - 1].trim();

        match inner.split_once(',') {
            None => {
                if !(lower_inclusive && upper_inclusive) {
                    return Err(invalid("single version must be surrounded by []"));
                }
                let version = MavenVersion::parse(inner)
                    .map_err(|e| invalid(&e.to_string()))?;
                Ok(Restriction::new(
                    Some(version.clone()),
                    true,
                    Some(version),
                    true,
                ))
            }
            Some((low, high)) => {
                if high.contains(',') {
                    return Err(invalid("interval with more than two bounds"));
                }
                let parse_bound = |s: &str| -> Result<Option<MavenVersion>> {
                    let s = s.trim();
                    if s.is_empty() {
                        Ok(None)
                    } else {
                        MavenVersion::parse(s)
                            .map(Some)
                            .map_err(|e| invalid(&e.to_string()))
                    }
                };
                let lower = parse_bound(low)?;
                let upper = parse_bound(high)?;
                if let (Some(l), Some(u)) = (&lower, &upper) {
                    match u.maven_cmp(l) {
                        Ordering::Less => return Err(invalid("range defies version ordering")),
                        Ordering::Equal if !(lower_inclusive && upper_inclusive) => {
                            return Err(invalid("range cannot have identical boundaries"))
                        }
                        _ => {}
                    }
                }
                Ok(Restriction::new(
                    lower,
                    lower_inclusive,
                    upper,
                    upper_inclusive,
                ))
            }
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pin() {
            if let Some(lower) = &self.lower {
                return write!(f, "[{lower}]");
            }
        }
        f.write_str(if self.lower_inclusive { "[" } else { "(" })?;
        if let Some(lower) = &self.lower {
            write!(f, "{lower}")?;
        }
        f.write_str(",")?;
        if let Some(upper) = &self.upper {
            write!(f, "{upper}")?;
        }
        f.write_str(if self.upper_inclusive { "]" } else { ")" })
    }
}

/// An ordered list of disjoint intervals. A version is in the range if
/// any interval contains it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    restrictions: Vec<Restriction>,
}

impl VersionRange {
    /// `[0,)`, every version.
    pub fn all() -> Self {
        Self {
            restrictions: vec![Restriction::new(
                Some(MavenVersion::zero()),
                true,
                None,
                false,
            )],
        }
    }

    /// `[,0)`, the explicit "nothing" range produced by complementing
    /// [`VersionRange::all`].
    pub fn none() -> Self {
        Self {
            restrictions: vec![Restriction::new(
                None,
                true,
                Some(MavenVersion::zero()),
                false,
            )],
        }
    }

    /// True for strings written in range syntax rather than as a plain
    /// version.
    pub fn is_range(spec: &str) -> bool {
        let spec = spec.trim();
        spec.starts_with('[') || spec.starts_with('(')
    }

    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason: &str| IdxError::InvalidRange(spec.to_string(), reason.to_string());
        let mut process = spec.trim();
        if process.is_empty() {
            return Err(invalid("empty range"));
        }
        if !Self::is_range(process) {
            return Err(invalid("not a range"));
        }

        let mut restrictions: Vec<Restriction> = Vec::new();
        while process.starts_with('[') || process.starts_with('(') {
            let end = match (process.find(']'), process.find(')')) {
                (Some(a), Some(b)) => a.min(b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => return Err(invalid("unbounded range")),
            };
            let restriction = Restriction::parse(&process[..=end], spec)?;
            if let Some(previous) = restrictions.last() {
                let overlaps = match (previous.upper(), restriction.lower()) {
                    (None, _) | (_, None) => true,
                    (Some(prev_upper), Some(lower)) => match lower.maven_cmp(prev_upper) {
                        Ordering::Less => true,
                        Ordering::Equal => {
                            previous.is_upper_inclusive() && restriction.is_lower_inclusive()
                        }
                        Ordering::Greater => false,
                    },
                };
                if overlaps {
                    return Err(invalid("ranges overlap"));
                }
            }
            restrictions.push(restriction);

            process = process[end + 1..].trim_start();
            if let Some(rest) = process.strip_prefix(',') {
                process = rest.trim_start();
                if !Self::is_range(process) {
                    return Err(invalid("expected another interval after ','"));
                }
            }
        }
        if !process.is_empty() {
            return Err(invalid("only fully-qualified sets allowed in multiple set scenario"));
        }
        Ok(Self { restrictions })
    }

    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    /// No interval admits a version at or above `0`. True for
    /// [`VersionRange::none`] and for disjoint [`VersionRange::restrict`]
    /// results.
    pub fn is_empty(&self) -> bool {
        !self.restrictions.iter().any(Restriction::reaches_zero)
    }

    pub fn includes(&self, version: &MavenVersion) -> bool {
        self.restrictions.iter().any(|r| r.contains(version))
    }

    /// True if every version of `other` is also in this range.
    pub fn includes_range(&self, other: &VersionRange) -> bool {
        other.restrictions.iter().all(|r| r.is_covered_by(self))
    }

    /// Intersection of both ranges.
    pub fn restrict(&self, other: &VersionRange) -> VersionRange {
        let mut restrictions: Vec<Restriction> = self
            .restrictions
            .iter()
            .flat_map(|a| other.restrictions.iter().filter_map(move |b| a.intersect(b)))
            .collect();
        restrictions.sort_by(|a, b| a.cmp_lower(b));
        VersionRange { restrictions }
    }

    /// The versions not in this range, as the ordered list of maximal gaps
    /// starting at `0`.
    pub fn complement(&self) -> VersionRange {
        let mut sorted = self.restrictions.clone();
        sorted.sort_by(|a, b| a.cmp_lower(b));

        let mut gaps = Vec::new();
        let mut last = Some(MavenVersion::zero());
        let mut last_upper_inclusive = false;
        for restriction in &sorted {
            let Some(last_version) = last.as_ref() else {
                break;
            };
            if let Some(lower) = restriction.lower() {
                let cmp = last_version.maven_cmp(lower);
                if cmp == Ordering::Less
                    || (cmp == Ordering::Equal
                        && !(last_upper_inclusive || restriction.is_lower_inclusive()))
                {
                    gaps.push(Restriction::new(
                        Some(last_version.clone()),
                        !last_upper_inclusive,
                        Some(lower.clone()),
                        !restriction.is_lower_inclusive(),
                    ));
                }
            }
            // An interval starting below the current position cannot move
            // it backwards.
            match (restriction.upper(), last.as_ref()) {
                (Some(upper), Some(current)) if upper.maven_cmp(current) == Ordering::Less => {}
                _ => {
                    last = restriction.upper().cloned();
                    last_upper_inclusive = restriction.is_upper_inclusive();
                }
            }
        }

        match last {
            None if gaps.is_empty() => VersionRange::none(),
            None => VersionRange { restrictions: gaps },
            Some(last_version) => {
                gaps.push(Restriction::new(
                    Some(last_version),
                    !last_upper_inclusive,
                    None,
                    false,
                ));
                VersionRange { restrictions: gaps }
            }
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, restriction) in self.restrictions.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{restriction}")?;
        }
        Ok(())
    }
}

impl FromStr for VersionRange {
    type Err = IdxError;

    fn from_str(s: &str) -> Result<Self> {
        VersionRange::parse(s)
    }
}

impl TryFrom<String> for VersionRange {
    type Error = IdxError;

    fn try_from(value: String) -> Result<Self> {
        VersionRange::parse(&value)
    }
}

impl From<VersionRange> for String {
    fn from(value: VersionRange) -> Self {
        value.to_string()
    }
}
