//! Execution context handed to a test's hooks.
//!
//! The context is the only place the self-report operations (`pass`,
//! `fail`, `skip`, `expire`) live. The driver constructs one per hook
//! invocation and hands it to that test's own body, so only the owning
//! test can decide its own outcome; everyone else goes through the
//! read-only registry surface or the meta-assertion layer.

use crate::case::{LifeCycle, Status};
use crate::registry::{TestId, TestRegistry};
use crate::verbosity::Verbosity;

pub struct TestContext<'a> {
    id: TestId,
    registry: &'a TestRegistry,
}

impl<'a> TestContext<'a> {
    pub(crate) fn new(registry: &'a TestRegistry, id: TestId) -> Self {
        Self { id, registry }
    }

    /// Handle of the test this context belongs to.
    pub fn id(&self) -> TestId {
        self.id
    }

    /// Declared name of the test this context belongs to.
    pub fn name(&self) -> &'static str {
        self.registry.name(self.id)
    }

    pub(crate) fn registry(&self) -> &'a TestRegistry {
        self.registry
    }

    pub fn status(&self) -> Status {
        self.registry.status(self.id)
    }

    pub fn life_cycle(&self) -> LifeCycle {
        self.registry.life_cycle(self.id)
    }

    /// Mark this test as passed. Commonly used to terminate a looping test.
    pub fn pass(&self) {
        self.set_status(Status::Passed);
    }

    /// Mark this test as failed.
    pub fn fail(&self) {
        self.set_status(Status::Failed);
    }

    /// Mark this test as skipped.
    pub fn skip(&self) {
        self.set_status(Status::Skipped);
    }

    /// Mark this test as expired (timed out).
    pub fn expire(&self) {
        self.set_status(Status::Expired);
    }

    /// Mark this test passed or failed depending on `ok`.
    pub fn set_pass_or_fail(&self, ok: bool) {
        self.registry
            .with_case(self.id, |case| case.set_pass_or_fail(ok));
    }

    fn set_status(&self, status: Status) {
        self.registry
            .with_case(self.id, |case| case.set_status(status));
    }

    pub fn verbosity(&self) -> Verbosity {
        self.registry.verbosity(self.id)
    }

    pub fn enable_verbosity(&self, verbosity: Verbosity) {
        self.registry.enable_verbosity(self.id, verbosity);
    }

    pub fn disable_verbosity(&self, verbosity: Verbosity) {
        self.registry.disable_verbosity(self.id, verbosity);
    }

    /// True if any of the given verbosity flags is enabled for this test.
    pub fn is_verbosity(&self, verbosity: Verbosity) -> bool {
        self.registry
            .with_case(self.id, |case| case.is_verbosity(verbosity))
    }
}
