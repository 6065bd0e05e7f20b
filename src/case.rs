//! Test case state: the execution lifecycle and the assertion status.
//!
//! Every test carries two orthogonal state machines. The lifecycle tells the
//! driver what to do next (set up, step, tear down, nothing); the status is
//! the decided outcome of the test's assertions. The two are coupled in one
//! direction only: the moment the status leaves `Unknown`, the lifecycle is
//! promoted to `Asserted`, and `set_status` is the only path that does it.
//!
//! The state transition diagram:
//!
//! ```text
//!        include()/exclude()
//!      .---------------------> Excluded -----------.
//!      v                                           v
//!    New                                        Finished
//!      \  setup()        set_status()  teardown()  ^
//!       --------> Setup -------> Asserted ---------'
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use crate::descriptor::TestDescriptor;
use crate::registry::TestId;
use crate::verbosity::Verbosity;

/// Execution-phase state of a test, driven by the runner.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeCycle {
    /// Registered, not yet set up.
    New = 0,
    /// Excluded from the run. Setup and teardown are bypassed and the test
    /// goes straight to `Finished`, reported as skipped. `include` puts it
    /// back into `New`.
    Excluded = 1,
    /// Set up and ready to step. A once-test stays here for a single pass;
    /// a looping test stays until its body asserts (or the driver expires it).
    Setup = 2,
    /// The status has been decided. Teardown should run next.
    Asserted = 3,
    /// Logically resolved. Subsequent registry walks pass the entry over;
    /// it is never physically removed.
    Finished = 4,
}

impl From<u8> for LifeCycle {
    fn from(val: u8) -> Self {
        match val {
            1 => LifeCycle::Excluded,
            2 => LifeCycle::Setup,
            3 => LifeCycle::Asserted,
            4 => LifeCycle::Finished,
            _ => LifeCycle::New,
        }
    }
}

/// Decided outcome of a test's assertions.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No assertion has been made yet.
    Unknown = 0,
    /// The test passed.
    Passed = 1,
    /// The test failed.
    Failed = 2,
    /// The test was skipped, by its own body or through exclusion.
    Skipped = 3,
    /// The driver declared the test expired (timed out).
    Expired = 4,
}

impl From<u8> for Status {
    fn from(val: u8) -> Self {
        match val {
            1 => Status::Passed,
            2 => Status::Failed,
            3 => Status::Skipped,
            4 => Status::Expired,
            _ => Status::Unknown,
        }
    }
}

/// One registered test: immutable identity plus mutable run state.
///
/// Instances live in the registry arena for the life of the process and are
/// never copied; identity (arena slot, name, next link) must stay unique.
/// All run state is atomic, so transitions take `&self` and the arena lock
/// is never needed after registration.
pub struct TestCase {
    desc: &'static TestDescriptor,
    life_cycle: AtomicU8,
    status: AtomicU8,
    verbosity: AtomicU8,
    /// Next entry in registration order. Written once, at registration,
    /// under the arena write lock.
    next: Option<TestId>,
}

impl TestCase {
    pub(crate) fn new(desc: &'static TestDescriptor) -> Self {
        Self {
            desc,
            life_cycle: AtomicU8::new(LifeCycle::New as u8),
            status: AtomicU8::new(Status::Unknown as u8),
            verbosity: AtomicU8::new(Verbosity::NONE.bits()),
            next: None,
        }
    }

    /// The static descriptor this case was registered from.
    pub fn descriptor(&self) -> &'static TestDescriptor {
        self.desc
    }

    /// Declared name of the test.
    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    pub fn life_cycle(&self) -> LifeCycle {
        self.life_cycle.load(Ordering::Relaxed).into()
    }

    pub fn status(&self) -> Status {
        self.status.load(Ordering::Relaxed).into()
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_bits_truncate(self.verbosity.load(Ordering::Relaxed))
    }

    pub(crate) fn next(&self) -> Option<TestId> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: TestId) {
        self.next = Some(next);
    }

    /// Set the decided outcome of the test.
    ///
    /// This is the only path by which the status leaves `Unknown`, and it
    /// promotes the lifecycle to `Asserted` in the same call, keeping the
    /// two machines in sync. Tests never un-assert themselves: storing
    /// `Unknown` is not a supported transition and is ignored.
    pub(crate) fn set_status(&self, status: Status) {
        if status == Status::Unknown {
            warn!("test {}: ignoring attempt to reset status to Unknown", self.name());
            return;
        }
        self.life_cycle
            .store(LifeCycle::Asserted as u8, Ordering::Relaxed);
        self.status.store(status as u8, Ordering::Relaxed);
    }

    /// Set the status to `Passed` or `Failed` depending on `ok`.
    pub(crate) fn set_pass_or_fail(&self, ok: bool) {
        self.set_status(if ok { Status::Passed } else { Status::Failed });
    }

    /// Move the lifecycle through one of the driver-owned transitions.
    /// `Asserted` is reachable only through `set_status`.
    pub(crate) fn set_life_cycle(&self, state: LifeCycle) {
        if state == LifeCycle::Asserted {
            warn!(
                "test {}: Asserted is only reachable through set_status, ignoring",
                self.name()
            );
            return;
        }
        self.life_cycle.store(state as u8, Ordering::Relaxed);
    }

    /// True once the status has been decided. Note this is about assertion,
    /// not about the lifecycle reaching `Finished`.
    pub fn is_done(&self) -> bool {
        self.status() != Status::Unknown
    }

    pub fn is_not_done(&self) -> bool {
        !self.is_done()
    }

    pub fn is_passed(&self) -> bool {
        self.status() == Status::Passed
    }

    pub fn is_not_passed(&self) -> bool {
        !self.is_passed()
    }

    pub fn is_failed(&self) -> bool {
        self.status() == Status::Failed
    }

    pub fn is_not_failed(&self) -> bool {
        !self.is_failed()
    }

    pub fn is_skipped(&self) -> bool {
        self.status() == Status::Skipped
    }

    pub fn is_not_skipped(&self) -> bool {
        !self.is_skipped()
    }

    pub fn is_expired(&self) -> bool {
        self.status() == Status::Expired
    }

    pub fn is_not_expired(&self) -> bool {
        !self.is_expired()
    }

    /// OR the given flags into the verbosity mask.
    pub fn enable_verbosity(&self, verbosity: Verbosity) {
        self.verbosity.fetch_or(verbosity.bits(), Ordering::Relaxed);
    }

    /// Clear the given flags from the verbosity mask.
    pub fn disable_verbosity(&self, verbosity: Verbosity) {
        self.verbosity
            .fetch_and(!verbosity.bits(), Ordering::Relaxed);
    }

    /// True if any of the given flags is enabled.
    pub fn is_verbosity(&self, verbosity: Verbosity) -> bool {
        self.verbosity().intersects(verbosity)
    }
}
