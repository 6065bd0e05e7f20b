//! Pass-based test driver.
//!
//! The runner repeatedly walks the registry and advances every unfinished
//! test by one lifecycle stage per pass: set up, step, tear down, resolve.
//! A once-test is decided after a single step (auto-passed if its body
//! decided nothing); a looping test is re-stepped every pass until its body
//! asserts. Cooperation is the whole model: the runner never preempts a
//! body, bodies always return to the runner.
//!
//! The core carries no timers; the optional pass limit is the runner-side
//! policy for looping tests that never assert, expiring them after a fixed
//! number of passes.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::case::{LifeCycle, Status};
use crate::context::TestContext;
use crate::descriptor::TestKind;
use crate::registry::{TestId, TestRegistry, registry};
use crate::verbosity::Verbosity;

/// Latched true whenever a run finishes with failed or expired tests.
pub static TEST_FAILED_FLAG: AtomicBool = AtomicBool::new(false);

/// True if any completed run had failed or expired tests.
pub fn tests_failed() -> bool {
    TEST_FAILED_FLAG.load(Ordering::Relaxed)
}

/// Outcome counters of one run.
#[derive(Debug, Clone, Copy)]
pub struct TestStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub expired: usize,
}

impl TestStats {
    pub const fn new() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            expired: 0,
        }
    }

    fn add_result(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Skipped => self.skipped += 1,
            Status::Expired => self.expired += 1,
            Status::Unknown => {}
        }
    }

    /// True if nothing failed or expired.
    pub fn all_ok(&self) -> bool {
        self.failed == 0 && self.expired == 0
    }
}

impl Default for TestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives every test in a registry to `Finished`.
pub struct TestRunner<'a> {
    registry: &'a TestRegistry,
    stats: TestStats,
    verbosity: Verbosity,
    pass_limit: Option<usize>,
}

impl<'a> TestRunner<'a> {
    pub fn new(registry: &'a TestRegistry) -> Self {
        Self {
            registry,
            stats: TestStats::new(),
            verbosity: Verbosity::DEFAULT,
            pass_limit: None,
        }
    }

    /// A runner over the process-wide registry.
    pub fn global() -> TestRunner<'static> {
        TestRunner::new(registry())
    }

    /// Default verbosity mask OR-ed into every test at the start of a run.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Expire tests still stepping after `limit` passes over the registry.
    pub fn with_pass_limit(mut self, limit: usize) -> Self {
        self.pass_limit = Some(limit);
        self
    }

    pub fn stats(&self) -> TestStats {
        self.stats
    }

    /// Run every registered test to completion and return the counters.
    ///
    /// Without a pass limit, a looping test that never asserts keeps the
    /// run alive indefinitely; bounding that is deliberately this driver's
    /// policy, not the core's.
    pub fn run(&mut self) -> TestStats {
        self.stats = TestStats::new();

        let reg = self.registry;
        if reg.is_empty() {
            warn!("no tests registered");
            return self.stats;
        }
        if !self.has_unfinished() {
            // Every entry was already driven to Finished by an earlier run.
            warn!("no runnable tests");
            return self.stats;
        }

        reg.enable_verbosity_all(self.verbosity);
        info!("running {} test(s)...", reg.len());

        let mut passes = 0;
        loop {
            let mut unfinished = 0;
            let mut cursor = reg.first();
            while let Some(id) = cursor {
                self.advance(id);
                if reg.life_cycle(id) != LifeCycle::Finished {
                    unfinished += 1;
                }
                cursor = reg.next_of(id);
            }
            if unfinished == 0 {
                break;
            }
            passes += 1;
            if let Some(limit) = self.pass_limit {
                if passes >= limit {
                    self.expire_stalled();
                }
            }
        }

        self.log_summary();
        if !self.stats.all_ok() {
            TEST_FAILED_FLAG.store(true, Ordering::Relaxed);
        }
        self.stats
    }

    /// Advance one test by one lifecycle stage.
    fn advance(&mut self, id: TestId) {
        let reg = self.registry;
        let desc = reg.descriptor(id);
        match reg.life_cycle(id) {
            LifeCycle::New => {
                if let Some(setup) = desc.setup {
                    setup(&TestContext::new(reg, id));
                }
                // Setup may already have asserted (skip is common there).
                if reg.life_cycle(id) == LifeCycle::New {
                    reg.set_life_cycle(id, LifeCycle::Setup);
                }
            }
            LifeCycle::Excluded => {
                // Reported as skipped; setup and teardown are bypassed.
                reg.skip(id);
                reg.set_life_cycle(id, LifeCycle::Finished);
                self.resolve(id);
            }
            LifeCycle::Setup => {
                (desc.step)(&TestContext::new(reg, id));
                if desc.kind == TestKind::Once && reg.status(id) == Status::Unknown {
                    // A once-test that decided nothing has passed.
                    reg.with_case(id, |case| case.set_status(Status::Passed));
                }
            }
            LifeCycle::Asserted => {
                if let Some(teardown) = desc.teardown {
                    teardown(&TestContext::new(reg, id));
                }
                reg.set_life_cycle(id, LifeCycle::Finished);
                self.resolve(id);
            }
            LifeCycle::Finished => {}
        }
    }

    /// True if any entry has not reached `Finished`.
    fn has_unfinished(&self) -> bool {
        let mut cursor = self.registry.first();
        while let Some(id) = cursor {
            if self.registry.life_cycle(id) != LifeCycle::Finished {
                return true;
            }
            cursor = self.registry.next_of(id);
        }
        false
    }

    /// Expire everything still in the stepping stage.
    fn expire_stalled(&self) {
        let reg = self.registry;
        let mut cursor = reg.first();
        while let Some(id) = cursor {
            if reg.life_cycle(id) == LifeCycle::Setup {
                warn!("test {}: pass limit reached, expiring", reg.name(id));
                reg.expire(id);
            }
            cursor = reg.next_of(id);
        }
    }

    /// Record the decided outcome and emit the resolution line the test's
    /// verbosity mask asks for, name column padded to the longest name.
    fn resolve(&mut self, id: TestId) {
        let reg = self.registry;
        let status = reg.status(id);
        self.stats.add_result(status);

        let name = reg.name(id);
        let width = reg.max_name_len();
        let verbosity = reg.verbosity(id);
        match status {
            Status::Passed if verbosity.contains(Verbosity::TEST_PASSED) => {
                info!("test {:<width$} passed", name);
            }
            Status::Failed if verbosity.contains(Verbosity::TEST_FAILED) => {
                error!("test {:<width$} failed", name);
            }
            Status::Skipped if verbosity.contains(Verbosity::TEST_SKIPPED) => {
                warn!("test {:<width$} skipped", name);
            }
            Status::Expired if verbosity.contains(Verbosity::TEST_EXPIRED) => {
                error!("test {:<width$} expired", name);
            }
            _ => {}
        }
    }

    fn log_summary(&self) {
        let s = &self.stats;
        info!(
            "test summary: {} passed, {} failed, {} skipped, {} expired, out of {} test(s)",
            s.passed, s.failed, s.skipped, s.expired, s.total
        );
        if s.all_ok() {
            info!(">>> test run PASSED");
        } else {
            error!(">>> test run FAILED");
        }
    }
}

/// Run everything in the process-wide registry.
pub fn run_registered() -> TestStats {
    TEST_FAILED_FLAG.store(false, Ordering::Relaxed);
    TestRunner::global().run()
}

/// Run everything in the process-wide registry; true if nothing failed.
pub fn run_registered_ok() -> bool {
    run_registered().all_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TestDescriptor;
    use core::sync::atomic::AtomicUsize;

    fn nop(_cx: &TestContext) {}

    #[test]
    fn once_test_auto_passes() {
        static EMPTY: TestDescriptor = TestDescriptor::new("empty", "runner", nop);
        let reg = TestRegistry::new();
        let id = reg.register(&EMPTY);

        let stats = TestRunner::new(&reg).run();
        assert_eq!(reg.status(id), Status::Passed);
        assert_eq!(reg.life_cycle(id), LifeCycle::Finished);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.total, 1);
        assert!(stats.all_ok());
    }

    #[test]
    fn failing_body_is_recorded() {
        fn step(cx: &TestContext) {
            cx.fail();
        }
        static FAILS: TestDescriptor = TestDescriptor::new("fails", "runner", step);
        let reg = TestRegistry::new();
        let id = reg.register(&FAILS);

        let stats = TestRunner::new(&reg).run();
        assert_eq!(reg.status(id), Status::Failed);
        assert_eq!(stats.failed, 1);
        assert!(tests_failed());
    }

    #[test]
    fn looping_test_steps_until_it_passes() {
        static STEPS: AtomicUsize = AtomicUsize::new(0);
        fn step(cx: &TestContext) {
            if STEPS.fetch_add(1, Ordering::Relaxed) + 1 == 3 {
                cx.pass();
            }
        }
        static LOOPS: TestDescriptor = TestDescriptor::looping("loops", "runner", step);
        let reg = TestRegistry::new();
        let id = reg.register(&LOOPS);

        let stats = TestRunner::new(&reg).run();
        assert_eq!(STEPS.load(Ordering::Relaxed), 3);
        assert_eq!(reg.status(id), Status::Passed);
        assert_eq!(stats.passed, 1);
    }

    #[test]
    fn pass_limit_expires_stalled_loopers() {
        fn step(_cx: &TestContext) {
            // Never asserts.
        }
        static STALLS: TestDescriptor = TestDescriptor::looping("stalls", "runner", step);
        let reg = TestRegistry::new();
        let id = reg.register(&STALLS);

        let stats = TestRunner::new(&reg).with_pass_limit(5).run();
        assert_eq!(reg.status(id), Status::Expired);
        assert_eq!(reg.life_cycle(id), LifeCycle::Finished);
        assert_eq!(stats.expired, 1);
        assert!(!stats.all_ok());
    }

    #[test]
    fn excluded_test_skips_hooks_entirely() {
        static SETUPS: AtomicUsize = AtomicUsize::new(0);
        static TEARDOWNS: AtomicUsize = AtomicUsize::new(0);
        fn setup(_cx: &TestContext) {
            SETUPS.fetch_add(1, Ordering::Relaxed);
        }
        fn teardown(_cx: &TestContext) {
            TEARDOWNS.fetch_add(1, Ordering::Relaxed);
        }
        static EXCLUDED: TestDescriptor = TestDescriptor::new("excluded", "runner", nop)
            .with_setup(setup)
            .with_teardown(teardown);

        let reg = TestRegistry::new();
        let id = reg.register(&EXCLUDED);
        reg.exclude(id);

        let stats = TestRunner::new(&reg).run();
        assert_eq!(reg.status(id), Status::Skipped);
        assert_eq!(reg.life_cycle(id), LifeCycle::Finished);
        assert_eq!(SETUPS.load(Ordering::Relaxed), 0);
        assert_eq!(TEARDOWNS.load(Ordering::Relaxed), 0);
        assert_eq!(stats.skipped, 1);
        assert!(stats.all_ok());
    }

    #[test]
    fn hooks_run_in_lifecycle_order() {
        // Records the stage sequence as digits: 1 setup, 2 step, 3 teardown.
        static TRACE: AtomicUsize = AtomicUsize::new(0);
        fn push(stage: usize) {
            let prev = TRACE.load(Ordering::Relaxed);
            TRACE.store(prev * 10 + stage, Ordering::Relaxed);
        }
        fn setup(_cx: &TestContext) {
            push(1);
        }
        fn step(cx: &TestContext) {
            push(2);
            cx.pass();
        }
        fn teardown(_cx: &TestContext) {
            push(3);
        }
        static ORDERED: TestDescriptor = TestDescriptor::new("ordered", "runner", step)
            .with_setup(setup)
            .with_teardown(teardown);

        let reg = TestRegistry::new();
        reg.register(&ORDERED);
        TestRunner::new(&reg).run();
        assert_eq!(TRACE.load(Ordering::Relaxed), 123);
    }

    #[test]
    fn skip_in_setup_bypasses_step() {
        static STEPPED: AtomicUsize = AtomicUsize::new(0);
        fn setup(cx: &TestContext) {
            cx.skip();
        }
        fn step(_cx: &TestContext) {
            STEPPED.fetch_add(1, Ordering::Relaxed);
        }
        static SKIPS: TestDescriptor =
            TestDescriptor::new("skips", "runner", step).with_setup(setup);

        let reg = TestRegistry::new();
        let id = reg.register(&SKIPS);
        let stats = TestRunner::new(&reg).run();
        assert_eq!(reg.status(id), Status::Skipped);
        assert_eq!(STEPPED.load(Ordering::Relaxed), 0);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn rerun_of_finished_registry_is_a_no_op() {
        crate::testlog::install();

        static DONE: TestDescriptor = TestDescriptor::new("done_once", "runner", nop);
        let reg = TestRegistry::new();
        let id = reg.register(&DONE);

        let first = TestRunner::new(&reg).run();
        assert_eq!(first.passed, 1);

        // Everything is Finished, so no pass runs and no summary is logged.
        let second = TestRunner::new(&reg).run();
        assert_eq!(second.total, 0);
        assert_eq!(reg.status(id), Status::Passed);
        assert!(crate::testlog::contains("no runnable tests"));
    }

    #[test]
    fn stats_account_for_every_outcome() {
        fn fail_step(cx: &TestContext) {
            cx.fail();
        }
        fn skip_step(cx: &TestContext) {
            cx.skip();
        }
        static P: TestDescriptor = TestDescriptor::new("p", "runner", nop);
        static F: TestDescriptor = TestDescriptor::new("f", "runner", fail_step);
        static S: TestDescriptor = TestDescriptor::new("s", "runner", skip_step);
        static E: TestDescriptor = TestDescriptor::looping("e", "runner", nop);

        let reg = TestRegistry::new();
        for desc in [&P, &F, &S, &E] {
            reg.register(desc);
        }
        let stats = TestRunner::new(&reg).with_pass_limit(3).run();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.expired, 1);
    }
}
