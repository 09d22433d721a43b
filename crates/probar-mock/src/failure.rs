//! Failure reporting for usage errors
//!
//! Misusing the configuration API (for example asking a composite for a
//! call order) is reported at the point of misuse. The default reporter
//! panics like a failed assertion; tests that want to inspect the failure
//! use a [`RecordingReporter`].

use crate::result::MockError;
use std::cell::RefCell;

/// Receives usage errors raised while configuring expectations
pub trait FailureReporter {
    /// Report a failure
    fn report(&self, failure: &MockError);
}

/// Fails the running test by panicking with the failure message
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

/// Shared instance used when no reporter is supplied
pub static PANIC_REPORTER: PanicReporter = PanicReporter;

impl FailureReporter for PanicReporter {
    fn report(&self, failure: &MockError) {
        tracing::error!(%failure, "mock failure");
        panic!("{failure}");
    }
}

/// Collects failures instead of failing the test
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: RefCell<Vec<String>>,
}

impl RecordingReporter {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of every recorded failure, oldest first
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.failures.borrow().clone()
    }

    /// Number of recorded failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.borrow().len()
    }

    /// Whether anything was recorded
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.borrow().is_empty()
    }

    /// Whether any recorded failure message contains `text`
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.failures.borrow().iter().any(|f| f.contains(text))
    }

    /// Forget all recorded failures
    pub fn clear(&self) {
        self.failures.borrow_mut().clear();
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, failure: &MockError) {
        tracing::error!(%failure, "mock failure recorded");
        self.failures.borrow_mut().push(failure.to_string());
    }
}
