use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::VerdictCategory;

/// Per-sender count of confirmed violations. Counts only grow.
#[derive(Debug, Default)]
pub struct ViolationTracker {
    counts: Mutex<HashMap<i64, u32>>,
}

impl ViolationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments and returns the sender's count, starting at 1.
    pub fn record_violation(&self, sender_id: i64) -> u32 {
        let mut counts = self.counts.lock();
        let entry = counts.entry(sender_id).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    pub fn count(&self, sender_id: i64) -> u32 {
        self.counts.lock().get(&sender_id).copied().unwrap_or(0)
    }

    pub fn tracked_users(&self) -> usize {
        self.counts.lock().len()
    }

    pub fn snapshot(&self) -> HashMap<i64, u32> {
        self.counts.lock().clone()
    }

    /// Highest counts first; ties broken by the lower sender id.
    pub fn top_violators(&self, limit: usize) -> Vec<(i64, u32)> {
        let mut entries: Vec<(i64, u32)> = self
            .counts
            .lock()
            .iter()
            .map(|(id, count)| (*id, *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }
}

/// Process-wide moderation bookkeeping, owned by the host and shared with
/// every evaluation.
#[derive(Debug)]
pub struct ModerationState {
    started_at: DateTime<Utc>,
    violations: ViolationTracker,
    scams: AtomicU64,
    nsfw: AtomicU64,
    spam: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub scams: u64,
    pub nsfw: u64,
    pub spam: u64,
    pub tracked_users: usize,
    pub top_violators: Vec<(i64, u32)>,
}

impl ModerationState {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            violations: ViolationTracker::new(),
            scams: AtomicU64::new(0),
            nsfw: AtomicU64::new(0),
            spam: AtomicU64::new(0),
        }
    }

    pub fn violations(&self) -> &ViolationTracker {
        &self.violations
    }

    pub(crate) fn record_removal(&self, category: VerdictCategory) {
        let counter = match category {
            VerdictCategory::Scam => &self.scams,
            VerdictCategory::Nsfw => &self.nsfw,
            VerdictCategory::Spam => &self.spam,
            VerdictCategory::None => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self, top: usize) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            scams: self.scams.load(Ordering::Relaxed),
            nsfw: self.nsfw.load(Ordering::Relaxed),
            spam: self.spam.load(Ordering::Relaxed),
            tracked_users: self.violations.tracked_users(),
            top_violators: self.violations.top_violators(top),
        }
    }
}

impl Default for ModerationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sender_counts_zero() {
        let tracker = ViolationTracker::new();
        assert_eq!(tracker.count(42), 0);
        assert_eq!(tracker.tracked_users(), 0);
    }

    #[test]
    fn record_violation_increments_from_one() {
        let tracker = ViolationTracker::new();
        assert_eq!(tracker.record_violation(42), 1);
        assert_eq!(tracker.record_violation(42), 2);
        assert_eq!(tracker.record_violation(7), 1);
        assert_eq!(tracker.count(42), 2);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let tracker = ViolationTracker::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..250 {
                        tracker.record_violation(1);
                        tracker.record_violation(2);
                    }
                });
            }
        });
        assert_eq!(tracker.count(1), 2000);
        assert_eq!(tracker.count(2), 2000);
    }

    #[test]
    fn snapshot_copies_full_map() {
        let tracker = ViolationTracker::new();
        tracker.record_violation(4);
        tracker.record_violation(4);
        tracker.record_violation(9);
        let snapshot = tracker.snapshot();
        tracker.record_violation(9);
        assert_eq!(snapshot, HashMap::from([(4, 2), (9, 1)]));
    }

    #[test]
    fn top_violators_sorted_by_count_then_id() {
        let tracker = ViolationTracker::new();
        for (id, times) in [(5, 1), (3, 4), (9, 4), (1, 2)] {
            for _ in 0..times {
                tracker.record_violation(id);
            }
        }
        assert_eq!(tracker.top_violators(3), vec![(3, 4), (9, 4), (1, 2)]);
    }

    #[test]
    fn stats_count_removals_by_category() {
        let state = ModerationState::new();
        state.record_removal(VerdictCategory::Scam);
        state.record_removal(VerdictCategory::Scam);
        state.record_removal(VerdictCategory::Spam);
        state.record_removal(VerdictCategory::None);
        let stats = state.stats(5);
        assert_eq!((stats.scams, stats.nsfw, stats.spam), (2, 0, 1));
    }
}
