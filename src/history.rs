//! history.rs: append-only log of completed checks.
//!
//! Persistence proper is an external concern; [`CheckStore`] is the seam and
//! [`InMemoryCheckStore`] the bounded in-process implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyze::AnalysisResult;

/// How many users `statistics()` ranks.
pub const TOP_USERS: usize = 5;

/// One persisted check. Never mutated after `append`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    pub id: u64,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub result: bool,
    pub confidence_percentage: u8,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheck {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub result: bool,
    pub confidence_percentage: u8,
}

impl NewCheck {
    pub fn from_result(user_id: impl Into<String>, r: &AnalysisResult) -> Self {
        Self {
            user_id: user_id.into(),
            title: r.title.clone(),
            description: r.description.clone(),
            result: r.result,
            confidence_percentage: r.confidence_percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCheckCount {
    pub user_id: String,
    pub check_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStats {
    /// Distinct users with at least one check.
    pub user_count: usize,
    pub check_count: usize,
    /// Mean of (FAKE ? confidence : 0) over all checks, two decimals.
    pub avg_fake_percentage: String,
    pub top_users: Vec<UserCheckCount>,
}

pub trait CheckStore: Send + Sync {
    fn append(&self, check: NewCheck) -> CheckRecord;
    /// Newest first.
    fn for_user(&self, user_id: &str) -> Vec<CheckRecord>;
    /// Newest first.
    fn all(&self) -> Vec<CheckRecord>;
    fn statistics(&self) -> CheckStats;
}

#[derive(Debug)]
pub struct InMemoryCheckStore {
    inner: Mutex<Inner>,
    cap: usize,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    rows: Vec<CheckRecord>,
}

impl InMemoryCheckStore {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, 100_000);
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                rows: Vec::with_capacity(cap.min(10_000)),
            }),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history mutex poisoned").rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCheckStore {
    fn default() -> Self {
        Self::with_capacity(10_000)
    }
}

impl CheckStore for InMemoryCheckStore {
    fn append(&self, check: NewCheck) -> CheckRecord {
        let mut g = self.inner.lock().expect("history mutex poisoned");
        let record = CheckRecord {
            id: g.next_id,
            user_id: check.user_id,
            title: check.title,
            description: check.description,
            result: check.result,
            confidence_percentage: check.confidence_percentage,
            checked_at: Utc::now(),
        };
        g.next_id += 1;
        g.rows.push(record.clone());
        if g.rows.len() > self.cap {
            let excess = g.rows.len() - self.cap;
            g.rows.drain(0..excess);
        }
        record
    }

    fn for_user(&self, user_id: &str) -> Vec<CheckRecord> {
        let g = self.inner.lock().expect("history mutex poisoned");
        g.rows
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<CheckRecord> {
        let g = self.inner.lock().expect("history mutex poisoned");
        g.rows.iter().rev().cloned().collect()
    }

    fn statistics(&self) -> CheckStats {
        let g = self.inner.lock().expect("history mutex poisoned");
        let check_count = g.rows.len();

        let fake_sum: u64 = g
            .rows
            .iter()
            .filter(|r| !r.result)
            .map(|r| u64::from(r.confidence_percentage))
            .sum();
        let avg = if check_count == 0 {
            0.0
        } else {
            fake_sum as f64 / check_count as f64
        };

        let mut per_user: HashMap<&str, usize> = HashMap::new();
        for r in &g.rows {
            *per_user.entry(r.user_id.as_str()).or_default() += 1;
        }
        let mut top: Vec<(&str, usize)> = per_user.iter().map(|(u, n)| (*u, *n)).collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        CheckStats {
            user_count: per_user.len(),
            check_count,
            avg_fake_percentage: format!("{avg:.2}"),
            top_users: top
                .into_iter()
                .take(TOP_USERS)
                .map(|(u, n)| UserCheckCount {
                    user_id: u.to_string(),
                    check_count: n,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(user: &str, result: bool, conf: u8) -> NewCheck {
        NewCheck {
            user_id: user.into(),
            title: format!("t-{user}"),
            description: "d".into(),
            result,
            confidence_percentage: conf,
        }
    }

    #[test]
    fn ids_increase_and_reads_are_newest_first() {
        let store = InMemoryCheckStore::default();
        let a = store.append(check("u1", true, 60));
        let b = store.append(check("u2", false, 70));
        let c = store.append(check("u1", false, 80));
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let mine: Vec<u64> = store.for_user("u1").iter().map(|r| r.id).collect();
        assert_eq!(mine, vec![3, 1]);
        let all: Vec<u64> = store.all().iter().map(|r| r.id).collect();
        assert_eq!(all, vec![3, 2, 1]);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let store = InMemoryCheckStore::with_capacity(2);
        store.append(check("a", true, 50));
        store.append(check("b", true, 50));
        store.append(check("c", true, 50));
        let ids: Vec<u64> = store.all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn statistics_average_counts_real_as_zero() {
        let store = InMemoryCheckStore::default();
        store.append(check("u1", false, 90));
        store.append(check("u1", true, 80));
        store.append(check("u2", false, 61));
        let s = store.statistics();
        assert_eq!(s.user_count, 2);
        assert_eq!(s.check_count, 3);
        // (90 + 0 + 61) / 3
        assert_eq!(s.avg_fake_percentage, "50.33");
        assert_eq!(s.top_users[0].user_id, "u1");
        assert_eq!(s.top_users[0].check_count, 2);
    }

    #[test]
    fn statistics_on_empty_store() {
        let s = InMemoryCheckStore::default().statistics();
        assert_eq!(s.check_count, 0);
        assert_eq!(s.avg_fake_percentage, "0.00");
        assert!(s.top_users.is_empty());
    }

    #[test]
    fn top_users_are_capped_and_tie_broken_by_id() {
        let store = InMemoryCheckStore::default();
        for u in ["f", "e", "d", "c", "b", "a"] {
            store.append(check(u, true, 50));
        }
        let s = store.statistics();
        let ids: Vec<&str> = s.top_users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }
}
