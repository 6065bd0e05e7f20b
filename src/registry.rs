//! Test registry: the ordered arena of all registered test cases.
//!
//! The arena replaces the classic intrusive next-pointer chain with stable
//! indices and an explicit next link per entry, preserving O(1) registration
//! and registration-order iteration. The arena structure is guarded by a
//! read/write lock; per-case run state is atomic, so the lock is only taken
//! for the duration of a slot access and is never held across user hooks.
//!
//! A process-wide registry is available through [`registry`]. It is
//! const-initialized, so it is usable from any point of program startup.
//! Independent `TestRegistry` instances can be built for isolated runs.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use spin::RwLock;

use crate::case::{LifeCycle, Status, TestCase};
use crate::descriptor::TestDescriptor;
use crate::verbosity::Verbosity;

/// Stable arena index identifying one registered test.
pub type TestId = usize;

/// The process-wide registry.
static REGISTRY: TestRegistry = TestRegistry::new();

/// Access the process-wide registry.
pub fn registry() -> &'static TestRegistry {
    &REGISTRY
}

/// Ordered collection of every registered test.
pub struct TestRegistry {
    cases: RwLock<Vec<TestCase>>,
    /// Longest registered name, for output column alignment.
    max_name_len: AtomicUsize,
}

impl TestRegistry {
    pub const fn new() -> Self {
        Self {
            cases: RwLock::new(Vec::new()),
            max_name_len: AtomicUsize::new(0),
        }
    }

    /// Register a test at the tail of the walk order.
    ///
    /// Entries are kept in registration order, with no deduplication by
    /// name; the returned id is the entry's permanent arena slot.
    pub fn register(&self, desc: &'static TestDescriptor) -> TestId {
        let mut cases = self.cases.write();
        let id = cases.len();
        if let Some(tail) = cases.last_mut() {
            tail.set_next(id);
        }
        cases.push(TestCase::new(desc));
        self.max_name_len.fetch_max(desc.name.len(), Ordering::Relaxed);
        trace!("registered test {} (id={})", desc.name, id);
        id
    }

    /// Register a whole suite in declaration order.
    pub fn register_suite(&self, suite: &[&'static TestDescriptor]) {
        for desc in suite {
            self.register(desc);
        }
    }

    pub fn len(&self) -> usize {
        self.cases.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.read().is_empty()
    }

    /// First entry of the registry walk.
    pub fn first(&self) -> Option<TestId> {
        if self.cases.read().is_empty() { None } else { Some(0) }
    }

    /// Successor of `id` in registration order.
    pub fn next_of(&self, id: TestId) -> Option<TestId> {
        self.with_case(id, |case| case.next())
    }

    /// Resolve a declared name to its registry handle.
    ///
    /// This is the startup-time registration table behind the meta-assertion
    /// macros. Duplicate names resolve to the first registered instance.
    pub fn lookup(&self, name: &str) -> Option<TestId> {
        self.cases
            .read()
            .iter()
            .position(|case| case.name() == name)
    }

    pub fn name(&self, id: TestId) -> &'static str {
        self.with_case(id, |case| case.name())
    }

    /// Module path the test was declared in.
    pub fn module(&self, id: TestId) -> &'static str {
        self.with_case(id, |case| case.descriptor().module)
    }

    pub fn descriptor(&self, id: TestId) -> &'static TestDescriptor {
        self.with_case(id, |case| case.descriptor())
    }

    pub fn status(&self, id: TestId) -> Status {
        self.with_case(id, |case| case.status())
    }

    pub fn life_cycle(&self, id: TestId) -> LifeCycle {
        self.with_case(id, |case| case.life_cycle())
    }

    pub fn verbosity(&self, id: TestId) -> Verbosity {
        self.with_case(id, |case| case.verbosity())
    }

    /// Length of the longest registered name. Consumed by the reporting
    /// side to align the name column.
    pub fn max_name_len(&self) -> usize {
        self.max_name_len.load(Ordering::Relaxed)
    }

    /// Exclude a test from the run. Only a `New` test can be excluded;
    /// the runner will report it as skipped without running its hooks.
    pub fn exclude(&self, id: TestId) {
        self.with_case(id, |case| {
            if case.life_cycle() == LifeCycle::New {
                case.set_life_cycle(LifeCycle::Excluded);
            } else {
                warn!("test {}: exclude ignored, not in New state", case.name());
            }
        });
    }

    /// Put an excluded test back into the run, fully re-enabled.
    pub fn include(&self, id: TestId) {
        self.with_case(id, |case| {
            if case.life_cycle() == LifeCycle::Excluded {
                case.set_life_cycle(LifeCycle::New);
            } else {
                warn!("test {}: include ignored, not excluded", case.name());
            }
        });
    }

    /// Driver-side skip of a test that has not asserted yet.
    pub fn skip(&self, id: TestId) {
        self.with_case(id, |case| case.set_status(Status::Skipped));
    }

    /// Driver-side expiry of a test that has not asserted yet. The core
    /// carries no timers; when a deadline has passed is the driver's call.
    pub fn expire(&self, id: TestId) {
        self.with_case(id, |case| case.set_status(Status::Expired));
    }

    /// Move a test through one of the driver-owned lifecycle transitions
    /// (`Asserted` is only reachable through a status decision).
    pub fn set_life_cycle(&self, id: TestId, state: LifeCycle) {
        self.with_case(id, |case| case.set_life_cycle(state));
    }

    /// OR the given flags into one test's verbosity mask.
    pub fn enable_verbosity(&self, id: TestId, verbosity: Verbosity) {
        self.with_case(id, |case| case.enable_verbosity(verbosity));
    }

    /// Clear the given flags from one test's verbosity mask.
    pub fn disable_verbosity(&self, id: TestId, verbosity: Verbosity) {
        self.with_case(id, |case| case.disable_verbosity(verbosity));
    }

    /// OR the given flags into every registered test's mask. The runner
    /// uses this to propagate its default verbosity at the start of a run.
    pub fn enable_verbosity_all(&self, verbosity: Verbosity) {
        for case in self.cases.read().iter() {
            case.enable_verbosity(verbosity);
        }
    }

    /// Run `f` against the case in slot `id`, holding the arena read lock
    /// only for the duration of the call. A foreign id is a caller bug and
    /// panics, as any out-of-bounds index would.
    pub(crate) fn with_case<R>(&self, id: TestId, f: impl FnOnce(&TestCase) -> R) -> R {
        let cases = self.cases.read();
        f(&cases[id])
    }
}

impl Default for TestRegistry {
    fn default() -> Self {
        Self::new()
    }
}
