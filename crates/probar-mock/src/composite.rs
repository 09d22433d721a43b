//! Fan-out expectation
//!
//! A [`CompositeCall`] borrows several expectations and applies every
//! configuration call to each of them in the order they were added. It owns
//! none of them. Queries read the first member.
//!
//! Call order cannot be shared between several expectations, so
//! `with_call_order` is rejected through the composite's failure reporter.

use crate::expected_call::{CheckedExpectedCall, ExpectedCall};
use crate::failure::{FailureReporter, PANIC_REPORTER};
use crate::named_value::{MockValue, NamedValue};
use crate::result::MockError;
use std::fmt;

/// Configuration fan-out over borrowed expectations
pub struct CompositeCall<'a> {
    members: Vec<&'a mut CheckedExpectedCall>,
    reporter: &'a dyn FailureReporter,
}

impl fmt::Debug for CompositeCall<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeCall")
            .field("members", &self.members.len())
            .finish()
    }
}

impl Default for CompositeCall<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeCall<'a> {
    /// Create an empty composite that panics on usage errors
    #[must_use]
    pub fn new() -> Self {
        Self::with_reporter(&PANIC_REPORTER)
    }

    /// Create an empty composite reporting usage errors to `reporter`
    #[must_use]
    pub fn with_reporter(reporter: &'a dyn FailureReporter) -> Self {
        Self {
            members: Vec::new(),
            reporter,
        }
    }

    /// Add an expectation; later configuration applies to it too
    pub fn add(&mut self, call: &'a mut CheckedExpectedCall) -> &mut Self {
        self.members.push(call);
        self
    }

    /// Release every member
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn apply(&mut self, mut configure: impl FnMut(&mut CheckedExpectedCall)) -> &mut Self {
        for member in &mut self.members {
            configure(&mut **member);
        }
        self
    }
}

impl ExpectedCall for CompositeCall<'_> {
    fn with_name(&mut self, name: &str) -> &mut Self {
        self.apply(|call| {
            call.with_name(name);
        })
    }

    fn with_call_order(&mut self, order: u32) -> &mut Self {
        tracing::debug!(order, "call order rejected on composite");
        self.reporter
            .report(&MockError::unsupported("withCallOrder", "CompositeCalls"));
        self
    }

    fn on_object_address(&mut self, address: usize) -> &mut Self {
        self.apply(|call| {
            call.on_object_address(address);
        })
    }

    fn with_named_parameter(&mut self, parameter: NamedValue) -> &mut Self {
        self.apply(|call| {
            call.with_named_parameter(parameter.clone());
        })
    }

    fn with_output_parameter_returning(&mut self, name: &str, data: &[u8]) -> &mut Self {
        self.apply(|call| {
            call.with_output_parameter_returning(name, data);
        })
    }

    fn ignore_other_parameters(&mut self) -> &mut Self {
        self.apply(|call| {
            call.ignore_other_parameters();
        })
    }

    fn and_return_mock_value(&mut self, value: MockValue) -> &mut Self {
        self.apply(|call| {
            call.and_return_mock_value(value.clone());
        })
    }

    fn return_value(&self) -> Option<&NamedValue> {
        self.members.first().and_then(|call| call.return_value())
    }

    fn call_to_string(&self) -> String {
        self.members
            .first()
            .map(|call| call.call_to_string())
            .unwrap_or_default()
    }

    fn is_fulfilled(&self) -> bool {
        self.members.iter().all(|call| call.is_fulfilled())
    }

    fn is_out_of_order(&self) -> bool {
        self.members.iter().any(|call| call.is_out_of_order())
    }
}
