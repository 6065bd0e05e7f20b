//! steptest - cooperative unit-test core for no_std targets.
//!
//! Tests are static descriptors registered into a process-wide ordered
//! registry. A pass-based runner drives each test through its lifecycle
//! (setup, step, teardown), and the meta-assertion layer lets one test
//! assert on another test's outcome by name:
//!
//! ```rust
//! use steptest::{def_test, test_suite, TestContext, TestRunner, TestRegistry};
//! use steptest::assert_test_passed;
//!
//! #[def_test]
//! fn leader(cx: &TestContext) {
//!     cx.pass();
//! }
//!
//! #[def_test]
//! fn follower(cx: &TestContext) {
//!     // Fails this test and returns early unless `leader` has passed.
//!     assert_test_passed!(cx, leader);
//! }
//!
//! test_suite!(SUITE; leader, follower);
//!
//! let registry = TestRegistry::new();
//! registry.register_suite(SUITE);
//! let stats = TestRunner::new(&registry).run();
//! assert!(stats.all_ok());
//! ```

#![no_std]

#[macro_use]
extern crate log;
extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod case;
pub mod context;
pub mod descriptor;
pub mod meta;
pub mod registry;
pub mod runner;
pub mod verbosity;

#[cfg(test)]
mod testlog;

// Re-export the test declaration macros from the steptest-macros crate
pub use steptest_macros::{def_test, test_suite};

// Re-export commonly used types
pub use case::{LifeCycle, Status, TestCase};
pub use context::TestContext;
pub use descriptor::{TestDescriptor, TestFn, TestKind};
pub use registry::{TestId, TestRegistry, registry};
pub use runner::{TestRunner, TestStats, run_registered, run_registered_ok, tests_failed};
pub use verbosity::Verbosity;
