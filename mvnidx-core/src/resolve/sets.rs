// mvnidx-core/src/resolve/sets.rs
use std::collections::HashSet;

use mvnidx_common::model::Revision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionState {
    Pending,
    InFlight,
    Done,
}

/// Pending, in-flight and done revisions of one resolution run. A known
/// revision is in exactly one of the three sets and is never added again.
#[derive(Debug, Default)]
pub struct RevisionSets {
    pending: HashSet<Revision>,
    in_flight: HashSet<Revision>,
    done: HashSet<Revision>,
}

impl RevisionSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.in_flight.clear();
        self.done.clear();
    }

    pub fn state_of(&self, revision: &Revision) -> Option<RevisionState> {
        if self.pending.contains(revision) {
            Some(RevisionState::Pending)
        } else if self.in_flight.contains(revision) {
            Some(RevisionState::InFlight)
        } else if self.done.contains(revision) {
            Some(RevisionState::Done)
        } else {
            None
        }
    }

    pub fn is_known(&self, revision: &Revision) -> bool {
        self.state_of(revision).is_some()
    }

    /// Adds the revision to pending unless it is already known. Returns
    /// whether it was added.
    pub fn offer(&mut self, revision: Revision) -> bool {
        if self.is_known(&revision) {
            return false;
        }
        self.pending.insert(revision)
    }

    /// Offers every revision; returns how many were new.
    pub fn seed<I>(&mut self, revisions: I) -> usize
    where
        I: IntoIterator<Item = Revision>,
    {
        revisions
            .into_iter()
            .filter(|rev| self.offer(rev.clone()))
            .count()
    }

    /// Moves some pending revision to in-flight, provided fewer than
    /// `limit` are in flight. Which one is picked is unspecified.
    pub fn start_next(&mut self, limit: usize) -> Option<Revision> {
        if self.in_flight.len() >= limit {
            return None;
        }
        let next = self.pending.iter().next().cloned()?;
        self.pending.remove(&next);
        self.in_flight.insert(next.clone());
        Some(next)
    }

    /// Moves an in-flight revision to done. Returns false (and changes
    /// nothing) if the revision was not in flight.
    pub fn finish(&mut self, revision: &Revision) -> bool {
        if !self.in_flight.remove(revision) {
            return false;
        }
        self.done.insert(revision.clone());
        true
    }

    /// Nothing pending and nothing in flight: the closure is complete.
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn done_len(&self) -> usize {
        self.done.len()
    }

    pub fn clear_done(&mut self) {
        self.done.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rev(s: &str) -> Revision {
        s.parse().unwrap()
    }

    fn membership(sets: &RevisionSets, revision: &Revision) -> usize {
        [&sets.pending, &sets.in_flight, &sets.done]
            .iter()
            .filter(|set| set.contains(revision))
            .count()
    }

    #[test]
    fn known_revisions_are_not_re_added() {
        let mut sets = RevisionSets::new();
        assert!(sets.offer(rev("g:a:1")));
        assert!(!sets.offer(rev("g:a:1")));

        let started = sets.start_next(4).unwrap();
        assert!(!sets.offer(started.clone()));
        assert!(sets.finish(&started));
        assert!(!sets.offer(started.clone()));
        assert_eq!(sets.state_of(&started), Some(RevisionState::Done));
        assert_eq!(membership(&sets, &started), 1);
    }

    #[test]
    fn respects_the_in_flight_limit() {
        let mut sets = RevisionSets::new();
        assert_eq!(sets.seed(["g:a:1", "g:b:1", "g:c:1"].map(rev)), 3);
        assert!(sets.start_next(2).is_some());
        assert!(sets.start_next(2).is_some());
        assert!(sets.start_next(2).is_none());
        assert_eq!(sets.in_flight_len(), 2);
        assert_eq!(sets.pending_len(), 1);
    }

    #[test]
    fn settles_after_every_revision_finished() {
        let mut sets = RevisionSets::new();
        sets.seed(["g:a:1", "g:b:1"].map(rev));
        assert!(!sets.is_settled());
        while let Some(next) = sets.start_next(1) {
            assert_eq!(membership(&sets, &next), 1);
            assert!(sets.finish(&next));
            assert_eq!(membership(&sets, &next), 1);
        }
        assert!(sets.is_settled());
        assert_eq!(sets.done_len(), 2);
        sets.clear_done();
        assert_eq!(sets.done_len(), 0);
    }

    #[test]
    fn finishing_an_unknown_revision_is_ignored() {
        let mut sets = RevisionSets::new();
        sets.offer(rev("g:a:1"));
        assert!(!sets.finish(&rev("g:a:1")));
        assert_eq!(sets.state_of(&rev("g:a:1")), Some(RevisionState::Pending));
        assert!(!sets.finish(&rev("g:z:9")));
    }
}
