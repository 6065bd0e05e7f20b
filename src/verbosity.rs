//! Per-test diagnostic verbosity flags.
//!
//! The mask is a pure reporting concern: it never influences lifecycle or
//! status transitions, only how much the resolve/meta-assertion paths log.

use bitflags::bitflags;

bitflags! {
    /// Bit flags selecting which diagnostic records a test emits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Verbosity: u8 {
        /// Log the resolution line of a passed test.
        const TEST_PASSED = 0b0000_0001;
        /// Log the resolution line of a failed test.
        const TEST_FAILED = 0b0000_0010;
        /// Log the resolution line of a skipped test.
        const TEST_SKIPPED = 0b0000_0100;
        /// Log the resolution line of an expired test.
        const TEST_EXPIRED = 0b0000_1000;
        /// Log meta assertions that pass.
        const ASSERTION_PASSED = 0b0001_0000;
        /// Log meta assertions that fail.
        const ASSERTION_FAILED = 0b0010_0000;
    }
}

impl Verbosity {
    /// No diagnostics at all. Freshly registered tests start here; the
    /// runner ORs its own default mask in at the start of a run.
    pub const NONE: Verbosity = Verbosity::empty();

    /// All per-test resolution lines.
    pub const TEST_ALL: Verbosity = Verbosity::TEST_PASSED
        .union(Verbosity::TEST_FAILED)
        .union(Verbosity::TEST_SKIPPED)
        .union(Verbosity::TEST_EXPIRED);

    /// Resolution lines plus failing meta assertions.
    pub const DEFAULT: Verbosity = Verbosity::TEST_ALL.union(Verbosity::ASSERTION_FAILED);
}
