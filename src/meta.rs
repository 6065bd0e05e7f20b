//! Meta assertions: asserting one test's condition on another test's status.
//!
//! All ten user-facing spellings (done/not-done, passed/not-passed,
//! failed/not-failed, skipped/not-skipped, expired/not-expired) funnel
//! through one evaluation routine parameterized by [`MetaPredicate`]; only
//! the boolean expression and the diagnostic message differ per spelling.
//!
//! Two forms exist per predicate:
//!
//! - `check_test_*!` evaluates and returns the boolean; no side effects,
//!   the caller keeps running either way.
//! - `assert_test_*!` fails the *calling* test and returns from the
//!   enclosing step body when the condition does not hold. The macros are
//!   therefore usable only directly inside a test hook.

use crate::case::Status;
use crate::context::TestContext;
use crate::verbosity::Verbosity;

/// Identifier of one of the ten cross-test predicates, carrying its
/// expected-condition message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaPredicate {
    Done,
    NotDone,
    Passed,
    NotPassed,
    Failed,
    NotFailed,
    Skipped,
    NotSkipped,
    Expired,
    NotExpired,
}

impl MetaPredicate {
    /// Evaluate the predicate against a target test's status.
    pub fn eval(self, status: Status) -> bool {
        match self {
            MetaPredicate::Done => status != Status::Unknown,
            MetaPredicate::NotDone => status == Status::Unknown,
            MetaPredicate::Passed => status == Status::Passed,
            MetaPredicate::NotPassed => status != Status::Passed,
            MetaPredicate::Failed => status == Status::Failed,
            MetaPredicate::NotFailed => status != Status::Failed,
            MetaPredicate::Skipped => status == Status::Skipped,
            MetaPredicate::NotSkipped => status != Status::Skipped,
            MetaPredicate::Expired => status == Status::Expired,
            MetaPredicate::NotExpired => status != Status::Expired,
        }
    }

    /// Human-readable expected condition, for diagnostics.
    pub fn message(self) -> &'static str {
        match self {
            MetaPredicate::Done => "is done",
            MetaPredicate::NotDone => "is not done",
            MetaPredicate::Passed => "is passed",
            MetaPredicate::NotPassed => "is not passed",
            MetaPredicate::Failed => "is failed",
            MetaPredicate::NotFailed => "is not failed",
            MetaPredicate::Skipped => "is skipped",
            MetaPredicate::NotSkipped => "is not skipped",
            MetaPredicate::Expired => "is expired",
            MetaPredicate::NotExpired => "is not expired",
        }
    }
}

/// Checking form: evaluate `predicate` against the test named `target`.
///
/// Pure read, no side effects; an unknown target is reported once at warn
/// level and evaluates to false.
pub fn check_test_status(cx: &TestContext, target: &str, predicate: MetaPredicate) -> bool {
    match cx.registry().lookup(target) {
        Some(id) => predicate.eval(cx.registry().status(id)),
        None => {
            warn!("test {}: checked unknown test {}", cx.name(), target);
            false
        }
    }
}

/// Asserting form: evaluate `predicate` against `target` and decide the
/// calling test's fate on failure.
///
/// Diagnostics follow the caller's verbosity mask: the success message is
/// gated on `ASSERTION_PASSED`, the failure message on `ASSERTION_FAILED`
/// (part of `Verbosity::DEFAULT`, so failures are reported under the
/// runner's default mask). On failure (including an unknown target) the
/// diagnostic names the calling site, the target, and the expected
/// condition, and the *calling* test is marked `Failed` regardless of the
/// mask. The return value feeds the surface macros' guard clause; `false`
/// means the step body must return immediately.
pub fn assert_test_status(
    cx: &TestContext,
    target: &str,
    predicate: MetaPredicate,
    file: &'static str,
    line: u32,
) -> bool {
    let ok = match cx.registry().lookup(target) {
        Some(id) => predicate.eval(cx.registry().status(id)),
        None => {
            if cx.is_verbosity(Verbosity::ASSERTION_FAILED) {
                error!(
                    "{}:{}: meta assertion on unknown test {} in test {}",
                    file, line, target, cx.name()
                );
            }
            cx.fail();
            return false;
        }
    };

    if ok {
        if cx.is_verbosity(Verbosity::ASSERTION_PASSED) {
            debug!(
                "{}:{}: meta assertion passed: test {} {}",
                file, line, target, predicate.message()
            );
        }
    } else {
        if cx.is_verbosity(Verbosity::ASSERTION_FAILED) {
            error!(
                "{}:{}: meta assertion failed in test {}: expected test {} {}",
                file, line, cx.name(), target, predicate.message()
            );
        }
        cx.fail();
    }
    ok
}

/// Normalize a test reference to its declared-name string: bare identifiers
/// are stringified, string literals pass through.
#[doc(hidden)]
#[macro_export]
macro_rules! __test_name {
    ($name:ident) => {
        stringify!($name)
    };
    ($name:literal) => {
        $name
    };
}

/// Return true if the named test is done.
#[macro_export]
macro_rules! check_test_done {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Done,
        )
    };
}

/// Return true if the named test is not done.
#[macro_export]
macro_rules! check_test_not_done {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotDone,
        )
    };
}

/// Return true if the named test has passed.
#[macro_export]
macro_rules! check_test_passed {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Passed,
        )
    };
}

/// Return true if the named test has not passed.
#[macro_export]
macro_rules! check_test_not_passed {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotPassed,
        )
    };
}

/// Return true if the named test has failed.
#[macro_export]
macro_rules! check_test_failed {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Failed,
        )
    };
}

/// Return true if the named test has not failed.
#[macro_export]
macro_rules! check_test_not_failed {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotFailed,
        )
    };
}

/// Return true if the named test was skipped.
#[macro_export]
macro_rules! check_test_skipped {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Skipped,
        )
    };
}

/// Return true if the named test was not skipped.
#[macro_export]
macro_rules! check_test_not_skipped {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotSkipped,
        )
    };
}

/// Return true if the named test has expired.
#[macro_export]
macro_rules! check_test_expired {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Expired,
        )
    };
}

/// Return true if the named test has not expired.
#[macro_export]
macro_rules! check_test_not_expired {
    ($cx:expr, $name:tt) => {
        $crate::meta::check_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotExpired,
        )
    };
}

/// Assert the named test is done; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_done {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Done,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test is not done; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_not_done {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotDone,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test has passed; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_passed {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Passed,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test has not passed; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_not_passed {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotPassed,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test has failed; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_failed {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Failed,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test has not failed; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_not_failed {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotFailed,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test was skipped; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_skipped {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Skipped,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test was not skipped; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_not_skipped {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotSkipped,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test has expired; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_expired {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::Expired,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}

/// Assert the named test has not expired; fail the caller and return otherwise.
#[macro_export]
macro_rules! assert_test_not_expired {
    ($cx:expr, $name:tt) => {
        if !$crate::meta::assert_test_status(
            $cx,
            $crate::__test_name!($name),
            $crate::meta::MetaPredicate::NotExpired,
            file!(),
            line!(),
        ) {
            return;
        }
    };
}
