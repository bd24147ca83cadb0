//! Per-worker resource naming.
//!
//! Parallel workers share one application backend, so every map a scenario
//! creates or opens is suffixed with the worker's identity.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Identity of one parallel execution unit (`gw0`, `gw1`, ...).
///
/// The empty id means "not running in parallel".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        WorkerId(id.into())
    }

    /// Id for the worker at `index` in a pool.
    pub fn indexed(index: usize) -> Self {
        WorkerId(format!("gw{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the concrete name of a shared resource.
pub trait MapNaming: Send + Sync {
    fn map_name(&self, worker: &WorkerId, logical: &str) -> String;
}

/// Appends the worker id to the logical name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixNaming;

impl MapNaming for SuffixNaming {
    fn map_name(&self, worker: &WorkerId, logical: &str) -> String {
        format!("{logical}{worker}")
    }
}

/// Hands out worker ids to concurrently running scenarios.
///
/// A scenario holds its [`WorkerLease`] until it finishes, so two scenarios
/// running at the same time never share an id. Released ids are reused
/// lowest first. A pool of one worker always hands out its sequential id.
#[derive(Debug)]
pub struct WorkerPool {
    sequential: Option<WorkerId>,
    slots: Mutex<Slots>,
}

#[derive(Debug)]
struct Slots {
    free: BTreeSet<usize>,
    issued: usize,
}

impl WorkerPool {
    pub fn new(workers: usize, sequential: WorkerId) -> Arc<Self> {
        let parallel = workers > 1;
        Arc::new(Self {
            sequential: (!parallel).then_some(sequential),
            slots: Mutex::new(Slots {
                free: if parallel { (0..workers).collect() } else { BTreeSet::new() },
                issued: if parallel { workers } else { 0 },
            }),
        })
    }

    pub fn acquire(self: &Arc<Self>) -> WorkerLease {
        if let Some(id) = &self.sequential {
            return WorkerLease {
                id: id.clone(),
                slot: None,
                pool: Arc::clone(self),
            };
        }

        let mut slots = self.slots.lock();
        let slot = match slots.free.pop_first() {
            Some(slot) => slot,
            None => {
                slots.issued += 1;
                slots.issued - 1
            }
        };
        WorkerLease {
            id: WorkerId::indexed(slot),
            slot: Some(slot),
            pool: Arc::clone(self),
        }
    }
}

/// A worker id checked out of a [`WorkerPool`]; returned on drop.
#[derive(Debug)]
pub struct WorkerLease {
    id: WorkerId,
    slot: Option<usize>,
    pool: Arc<WorkerPool>,
}

impl WorkerLease {
    pub fn id(&self) -> &WorkerId {
        &self.id
    }
}

impl Drop for WorkerLease {
    fn drop(&mut self) {
        if let Some(slot) = self.slot {
            self.pool.slots.lock().free.insert(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_naming() {
        assert_eq!(
            SuffixNaming.map_name(&WorkerId::new("gw3"), "SUT Plant Search"),
            "SUT Plant Searchgw3"
        );
        assert_eq!(SuffixNaming.map_name(&WorkerId::default(), "Solo"), "Solo");
    }

    #[test]
    fn distinct_workers_get_distinct_maps() {
        let a = SuffixNaming.map_name(&WorkerId::indexed(0), "Search");
        let b = SuffixNaming.map_name(&WorkerId::indexed(1), "Search");
        assert_ne!(a, b);
    }

    #[test]
    fn pool_never_shares_a_live_id() {
        let pool = WorkerPool::new(2, WorkerId::default());
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(a.id().as_str(), "gw0");
        assert_eq!(b.id().as_str(), "gw1");

        drop(a);
        let c = pool.acquire();
        assert_eq!(c.id().as_str(), "gw0");
    }

    #[test]
    fn exhausted_pool_grows() {
        let pool = WorkerPool::new(2, WorkerId::default());
        let _a = pool.acquire();
        let _b = pool.acquire();
        assert_eq!(pool.acquire().id().as_str(), "gw2");
    }

    #[test]
    fn single_worker_uses_sequential_id() {
        let pool = WorkerPool::new(1, WorkerId::new("ci"));
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(a.id().as_str(), "ci");
        assert_eq!(b.id().as_str(), "ci");
    }
}
