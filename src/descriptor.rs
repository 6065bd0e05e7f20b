//! Static test descriptors.
//!
//! A descriptor is the immutable, compile-time half of a test: its name,
//! the module it was declared in, its kind, and its hooks. Descriptors are
//! `static` (usually emitted by `#[def_test]`) and the registry builds its
//! arena from references to them, so no test is ever allocated dynamically.

use crate::context::TestContext;

/// A test hook: setup, step, or teardown. The early-return convention of
/// the `assert_test_*!` macros relies on hooks returning `()`.
pub type TestFn = fn(&TestContext);

/// How the runner treats the step hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    /// The step runs once; if the body decided nothing, the test is passed.
    Once,
    /// The step is re-invoked every pass until the body (or the driver's
    /// pass limit) decides a status.
    Looping,
}

/// Immutable identity and hooks of one declared test.
pub struct TestDescriptor {
    pub name: &'static str,
    pub module: &'static str,
    pub kind: TestKind,
    pub setup: Option<TestFn>,
    pub step: TestFn,
    pub teardown: Option<TestFn>,
}

impl TestDescriptor {
    /// A once-test with no setup or teardown.
    pub const fn new(name: &'static str, module: &'static str, step: TestFn) -> Self {
        Self {
            name,
            module,
            kind: TestKind::Once,
            setup: None,
            step,
            teardown: None,
        }
    }

    /// A looping test with no setup or teardown.
    pub const fn looping(name: &'static str, module: &'static str, step: TestFn) -> Self {
        Self {
            name,
            module,
            kind: TestKind::Looping,
            setup: None,
            step,
            teardown: None,
        }
    }

    /// Attach a one-time setup hook, run on the `New -> Setup` transition.
    pub const fn with_setup(mut self, setup: TestFn) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Attach a teardown hook, run on the `Asserted -> Finished` transition.
    pub const fn with_teardown(mut self, teardown: TestFn) -> Self {
        self.teardown = Some(teardown);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nop(_cx: &TestContext) {}

    #[test]
    fn builders_compose_in_const_context() {
        static DESC: TestDescriptor = TestDescriptor::looping("loops", "here", nop)
            .with_setup(nop)
            .with_teardown(nop);
        assert_eq!(DESC.kind, TestKind::Looping);
        assert!(DESC.setup.is_some() && DESC.teardown.is_some());
        assert_eq!(DESC.name, "loops");
    }

    #[test]
    fn new_defaults_to_once_without_hooks() {
        static DESC: TestDescriptor = TestDescriptor::new("once", "here", nop);
        assert_eq!(DESC.kind, TestKind::Once);
        assert!(DESC.setup.is_none() && DESC.teardown.is_none());
    }
}
