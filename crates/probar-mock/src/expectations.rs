//! Expectation list: the registry of expected calls for one mock scope.
//!
//! Tests register expectations, the code under test produces
//! [`ActualCall`]s, and the list matches each actual call to the first
//! eligible expectation. Mismatches come back as [`MockError`] values with
//! the rendered expectation lists; the list itself never fails a test.
//!
//! ```rust,ignore
//! let mut mock = ExpectationList::new(MockConfig::default());
//! mock.expect_one_call("open").with_parameter("path", "/tmp/x").and_return_value(3);
//!
//! let matched = mock.match_call(&ActualCall::new("open").with_parameter("path", "/tmp/x"))?;
//! assert_eq!(matched.unwrap().return_value().unwrap().int_value(), 3);
//!
//! mock.check_expectations()?;
//! ```

use crate::actual_call::ActualCall;
use crate::comparator::ComparatorRegistry;
use crate::composite::CompositeCall;
use crate::config::MockConfig;
use crate::diagnostics::{self, CALL_LIST_INDENT};
use crate::expected_call::{CheckedExpectedCall, ExpectedCall};
use crate::result::{MockError, MockResult};

/// Expected calls of one mock scope, plus the history of actual calls
#[derive(Debug, Default)]
pub struct ExpectationList {
    config: MockConfig,
    calls: Vec<CheckedExpectedCall>,
    comparators: Option<ComparatorRegistry>,
    call_counter: u32,
    history: Vec<String>,
}

impl ExpectationList {
    /// Create an empty list
    #[must_use]
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Compare object parameters of every expectation through `registry`
    pub fn use_comparators(&mut self, registry: ComparatorRegistry) -> &mut Self {
        for call in &mut self.calls {
            if call.comparators().is_none() {
                call.use_comparators(registry.clone());
            }
        }
        self.comparators = Some(registry);
        self
    }

    fn new_call(&self, name: &str) -> CheckedExpectedCall {
        let mut call = CheckedExpectedCall::named(name);
        if let Some(registry) = &self.comparators {
            call.use_comparators(registry.clone());
        }
        call
    }

    /// Expect one call to `name`; configure it through the returned reference
    pub fn expect_one_call(&mut self, name: &str) -> &mut CheckedExpectedCall {
        let call = self.new_call(name);
        self.add(call)
    }

    /// Expect `count` calls to `name`, configured together
    pub fn expect_n_calls(&mut self, count: usize, name: &str) -> CompositeCall<'_> {
        let start = self.calls.len();
        for _ in 0..count {
            let call = self.new_call(name);
            self.calls.push(call);
        }
        let mut composite = CompositeCall::new();
        for call in &mut self.calls[start..] {
            composite.add(call);
        }
        composite
    }

    /// Register an already configured expectation
    pub fn add(&mut self, mut call: CheckedExpectedCall) -> &mut CheckedExpectedCall {
        if let (None, Some(registry)) = (call.comparators(), &self.comparators) {
            call.use_comparators(registry.clone());
        }
        let index = self.calls.len();
        self.calls.push(call);
        &mut self.calls[index]
    }

    /// Registered expectations in registration order
    #[must_use]
    pub fn calls(&self) -> &[CheckedExpectedCall] {
        &self.calls
    }

    /// Number of registered expectations
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether nothing is expected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Number of actual calls seen so far
    #[must_use]
    pub fn call_counter(&self) -> u32 {
        self.call_counter
    }

    /// Whether any expectation is not yet fulfilled
    #[must_use]
    pub fn has_unfulfilled_expectations(&self) -> bool {
        self.calls.iter().any(|call| !call.is_fulfilled())
    }

    /// Whether any expectation happened at a different position than declared
    #[must_use]
    pub fn has_calls_out_of_order(&self) -> bool {
        self.calls.iter().any(|call| call.is_out_of_order())
    }

    /// Number of expectations for `name`
    #[must_use]
    pub fn amount_of_expectations_for(&self, name: &str) -> usize {
        self.calls
            .iter()
            .filter(|call| call.name() == Some(name))
            .count()
    }

    /// Number of unfulfilled expectations for `name`
    #[must_use]
    pub fn amount_of_unfulfilled_expectations_for(&self, name: &str) -> usize {
        self.calls
            .iter()
            .filter(|call| call.name() == Some(name) && !call.is_fulfilled())
            .count()
    }

    /// Match `actual` against the expectations and mark the chosen one called
    ///
    /// Returns `Ok(None)` for calls to unknown functions when the config
    /// ignores other calls.
    pub fn match_call(&mut self, actual: &ActualCall) -> MockResult<Option<&CheckedExpectedCall>> {
        self.call_counter += 1;
        let order = self.call_counter;
        let rendered = actual.describe_with(self.comparators.as_ref());
        tracing::debug!(call = %rendered, order, "matching actual call");

        let Some(index) = self.select_expectation(actual)? else {
            tracing::debug!(call = actual.name(), "call ignored");
            self.history.push(rendered);
            return Ok(None);
        };

        let call = &mut self.calls[index];
        call.call_was_made(order);
        for parameter in actual.parameters() {
            call.input_parameter_was_passed(parameter.name());
        }
        for output in actual.output_parameters() {
            call.output_parameter_was_passed(output);
        }
        tracing::debug!(index, expectation = %call.call_to_string(), "expectation matched");
        self.history.push(rendered);
        Ok(Some(&self.calls[index]))
    }

    fn select_expectation(&self, actual: &ActualCall) -> MockResult<Option<usize>> {
        let name = actual.name();
        if self.amount_of_expectations_for(name) == 0 {
            if self.config.ignore_other_calls {
                return Ok(None);
            }
            return Err(self.unexpected_call(name));
        }

        let mut candidates: Vec<usize> = self
            .calls
            .iter()
            .enumerate()
            .filter(|(_, call)| call.name() == Some(name) && !call.was_called())
            .map(|(index, _)| index)
            .collect();
        if candidates.is_empty() {
            return Err(self.unexpected_call(name));
        }

        // Calls without an object are not filtered by object.
        if let Some(object) = actual.object() {
            candidates.retain(|&index| self.calls[index].relates_to(Some(object)));
            if candidates.is_empty() {
                return Err(MockError::UnexpectedObject {
                    name: name.to_string(),
                    object: diagnostics::format_address(object),
                    expected: self.unfulfilled_calls_for(name),
                    actual: self.fulfilled_calls_for(name),
                });
            }
        }

        for parameter in actual.parameters() {
            candidates.retain(|&index| {
                let call = &self.calls[index];
                call.has_input_parameter(parameter)
                    || (call.ignores_other_parameters()
                        && !call.has_input_parameter_with_name(parameter.name()))
            });
            tracing::trace!(parameter = parameter.name(), remaining = candidates.len(), "filtered by input");
            if candidates.is_empty() {
                return Err(MockError::UnexpectedInputParameter {
                    name: name.to_string(),
                    parameter: parameter.describe_with(self.comparators.as_ref()),
                    expected: self.unfulfilled_calls_for(name),
                    actual: self.fulfilled_calls_for(name),
                });
            }
        }

        for output in actual.output_parameters() {
            candidates.retain(|&index| {
                let call = &self.calls[index];
                call.has_output_parameter_with_name(output) || call.ignores_other_parameters()
            });
            tracing::trace!(parameter = output.as_str(), remaining = candidates.len(), "filtered by output");
            if candidates.is_empty() {
                return Err(MockError::UnexpectedOutputParameter {
                    name: name.to_string(),
                    parameter: output.clone(),
                    expected: self.unfulfilled_calls_for(name),
                    actual: self.fulfilled_calls_for(name),
                });
            }
        }

        candidates.retain(|&index| {
            self.calls[index].input_parameters().iter().all(|declared| {
                actual
                    .parameters()
                    .iter()
                    .any(|passed| passed.name() == declared.name())
            })
        });
        if candidates.is_empty() {
            return Err(MockError::ExpectedParameterDidntHappen {
                name: name.to_string(),
                expected: self.unfulfilled_calls_for(name),
                actual: self.fulfilled_calls_for(name),
            });
        }

        Ok(candidates.first().copied())
    }

    fn unexpected_call(&self, name: &str) -> MockError {
        MockError::UnexpectedCall {
            name: name.to_string(),
            expected: self.unfulfilled_calls_to_string(CALL_LIST_INDENT),
            actual: self.actual_calls_to_string(CALL_LIST_INDENT),
        }
    }

    /// Verify that every expectation was fulfilled (and, under strict
    /// ordering, that nothing happened out of order)
    pub fn check_expectations(&self) -> MockResult<()> {
        if self.has_unfulfilled_expectations() {
            return Err(MockError::ExpectedCallsDidntHappen {
                expected: self.unfulfilled_calls_to_string(CALL_LIST_INDENT),
                actual: self.actual_calls_to_string(CALL_LIST_INDENT),
            });
        }
        if self.config.strict_ordering && self.has_calls_out_of_order() {
            let mut ordered: Vec<&CheckedExpectedCall> = self
                .calls
                .iter()
                .filter(|call| call.expected_call_order().is_some())
                .collect();
            ordered.sort_by_key(|call| call.expected_call_order());
            return Err(MockError::CallOrderViolated {
                expected: diagnostics::format_call_list(
                    ordered.iter().map(|call| call.call_to_string()),
                    CALL_LIST_INDENT,
                ),
                actual: self.actual_calls_to_string(CALL_LIST_INDENT),
            });
        }
        Ok(())
    }

    /// Unfulfilled expectations, one per line
    #[must_use]
    pub fn unfulfilled_calls_to_string(&self, indent: &str) -> String {
        diagnostics::format_call_list(
            self.calls
                .iter()
                .filter(|call| !call.is_fulfilled())
                .map(|call| call.call_to_string()),
            indent,
        )
    }

    /// Expectations that were called and fulfilled, one per line
    #[must_use]
    pub fn fulfilled_calls_to_string(&self, indent: &str) -> String {
        diagnostics::format_call_list(
            self.calls
                .iter()
                .filter(|call| call.was_called() && call.is_fulfilled())
                .map(|call| call.call_to_string()),
            indent,
        )
    }

    /// Actual calls in the order they happened, one per line
    #[must_use]
    pub fn actual_calls_to_string(&self, indent: &str) -> String {
        diagnostics::format_call_list(&self.history, indent)
    }

    fn unfulfilled_calls_for(&self, name: &str) -> String {
        diagnostics::format_call_list(
            self.calls
                .iter()
                .filter(|call| call.name() == Some(name) && !call.is_fulfilled())
                .map(|call| call.call_to_string()),
            CALL_LIST_INDENT,
        )
    }

    fn fulfilled_calls_for(&self, name: &str) -> String {
        diagnostics::format_call_list(
            self.calls
                .iter()
                .filter(|call| call.name() == Some(name) && call.was_called())
                .map(|call| call.call_to_string()),
            CALL_LIST_INDENT,
        )
    }

    /// Drop every expectation and forget the call history
    pub fn clear(&mut self) {
        self.calls.clear();
        self.history.clear();
        self.call_counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::TypedComparator;
    use std::rc::Rc;

    #[test]
    fn test_empty_list_is_satisfied() {
        let list = ExpectationList::default();
        assert!(list.is_empty());
        assert!(!list.has_unfulfilled_expectations());
        assert!(list.check_expectations().is_ok());
        assert_eq!(list.unfulfilled_calls_to_string("\t"), "\t<none>");
    }

    #[test]
    fn test_match_simple_call() {
        let mut list = ExpectationList::default();
        list.expect_one_call("open")
            .with_parameter("path", "/tmp/x")
            .and_return_value(3);
        assert!(list.has_unfulfilled_expectations());

        let matched = list
            .match_call(&ActualCall::new("open").with_parameter("path", "/tmp/x"))
            .unwrap()
            .unwrap();
        assert_eq!(matched.return_value().unwrap().int_value(), 3);
        assert_eq!(matched.actual_call_order(), Some(1));
        assert!(matched.is_fulfilled());
        assert!(list.check_expectations().is_ok());
        assert_eq!(list.call_counter(), 1);
    }

    #[test]
    fn test_unexpected_call() {
        let mut list = ExpectationList::default();
        list.expect_one_call("close");
        let err = list.match_call(&ActualCall::new("open")).unwrap_err();
        assert!(matches!(err, MockError::UnexpectedCall { ref name, .. } if name == "open"));
        let text = err.to_string();
        assert!(text.contains("\t\tclose -> no parameters"));
        assert!(text.contains("\t\t<none>"));
    }

    #[test]
    fn test_ignore_other_calls() {
        let mut list = ExpectationList::new(MockConfig::new().with_ignore_other_calls(true));
        assert!(list.match_call(&ActualCall::new("anything")).unwrap().is_none());
        assert_eq!(list.actual_calls_to_string(""), "anything -> no parameters");
    }

    #[test]
    fn test_called_too_often() {
        let mut list = ExpectationList::default();
        list.expect_one_call("tick");
        assert!(list.match_call(&ActualCall::new("tick")).is_ok());
        let err = list.match_call(&ActualCall::new("tick")).unwrap_err();
        assert!(matches!(err, MockError::UnexpectedCall { .. }));
        assert!(err.to_string().contains("tick -> no parameters"));
    }

    #[test]
    fn test_unexpected_parameter_value() {
        let mut list = ExpectationList::default();
        list.expect_one_call("seek").with_parameter("offset", 10);
        let err = list
            .match_call(&ActualCall::new("seek").with_parameter("offset", 11))
            .unwrap_err();
        match err {
            MockError::UnexpectedInputParameter {
                ref parameter,
                ref expected,
                ..
            } => {
                assert_eq!(parameter, "int offset: <11>");
                assert!(expected.contains("seek -> int offset: <10>"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_parameter() {
        let mut list = ExpectationList::default();
        list.expect_one_call("seek")
            .with_parameter("offset", 10)
            .with_parameter("whence", 0);
        let err = list
            .match_call(&ActualCall::new("seek").with_parameter("offset", 10))
            .unwrap_err();
        assert!(matches!(err, MockError::ExpectedParameterDidntHappen { .. }));
    }

    #[test]
    fn test_ignored_parameters_match() {
        let mut list = ExpectationList::default();
        list.expect_one_call("log").ignore_other_parameters();
        let matched = list
            .match_call(&ActualCall::new("log").with_parameter("level", 3))
            .unwrap()
            .unwrap();
        assert!(matched.is_fulfilled());
    }

    #[test]
    fn test_ignoring_does_not_accept_wrong_declared_value() {
        let mut list = ExpectationList::default();
        list.expect_one_call("log")
            .with_parameter("level", 1)
            .ignore_other_parameters();
        assert!(list
            .match_call(&ActualCall::new("log").with_parameter("level", 2))
            .is_err());
    }

    #[test]
    fn test_object_binding() {
        let first = 1_u8;
        let second = 2_u8;
        let mut list = ExpectationList::default();
        list.expect_one_call("draw").on_object(&first);

        let err = list
            .match_call(&ActualCall::new("draw").on_object(&second))
            .unwrap_err();
        assert!(matches!(err, MockError::UnexpectedObject { .. }));
        assert!(list
            .match_call(&ActualCall::new("draw").on_object(&first))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_call_without_object_matches_bound_expectation() {
        let target = 0_u32;
        let mut list = ExpectationList::default();
        list.expect_one_call("draw").on_object(&target);
        assert!(list.match_call(&ActualCall::new("draw")).unwrap().is_some());

        list.expect_one_call("clear");
        let err = list
            .match_call(&ActualCall::new("clear").on_object(&target))
            .unwrap_err();
        assert!(err.to_string().contains(&format!(
            "Actual object for call has address: <{}>",
            diagnostics::format_address(diagnostics::address_of(&target))
        )));
    }

    #[test]
    fn test_first_eligible_expectation_wins() {
        let mut list = ExpectationList::default();
        list.expect_one_call("read").with_parameter("fd", 1).and_return_value(10);
        list.expect_one_call("read").with_parameter("fd", 2).and_return_value(20);
        list.expect_one_call("read").with_parameter("fd", 1).and_return_value(30);

        let value = |list: &mut ExpectationList, fd: i32| {
            list.match_call(&ActualCall::new("read").with_parameter("fd", fd))
                .unwrap()
                .unwrap()
                .return_value()
                .unwrap()
                .int_value()
        };
        assert_eq!(value(&mut list, 2), 20);
        assert_eq!(value(&mut list, 1), 10);
        assert_eq!(value(&mut list, 1), 30);
        assert_eq!(list.amount_of_expectations_for("read"), 3);
        assert_eq!(list.amount_of_unfulfilled_expectations_for("read"), 0);
    }

    #[test]
    fn test_output_parameters() {
        let mut list = ExpectationList::default();
        list.expect_one_call("read")
            .with_output_parameter_returning("buf", b"data");

        let matched = list
            .match_call(&ActualCall::new("read").with_output_parameter("buf"))
            .unwrap()
            .unwrap();
        let mut buffer = [0_u8; 8];
        assert_eq!(matched.copy_output_parameter("buf", &mut buffer).unwrap(), 4);
        assert_eq!(&buffer[..4], b"data");
        assert!(matched.output_parameter_passed("buf"));
    }

    #[test]
    fn test_unexpected_output_parameter() {
        let mut list = ExpectationList::default();
        list.expect_one_call("read");
        let err = list
            .match_call(&ActualCall::new("read").with_output_parameter("buf"))
            .unwrap_err();
        assert!(matches!(err, MockError::UnexpectedOutputParameter { ref parameter, .. } if parameter == "buf"));
    }

    #[test]
    fn test_unfulfilled_verification() {
        let mut list = ExpectationList::default();
        list.expect_one_call("open");
        list.expect_one_call("close");
        list.match_call(&ActualCall::new("open")).unwrap();

        let err = list.check_expectations().unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Mock Failure: Expected call did not happen."));
        assert!(text.contains("\t\tclose -> no parameters"));
        assert!(text.contains("\t\topen -> no parameters"));
        assert_eq!(list.fulfilled_calls_to_string(""), "open -> no parameters");
    }

    #[test]
    fn test_out_of_order_is_lenient_by_default() {
        let mut list = ExpectationList::default();
        list.expect_one_call("first").with_call_order(1);
        list.expect_one_call("second").with_call_order(2);
        list.match_call(&ActualCall::new("second")).unwrap();
        list.match_call(&ActualCall::new("first")).unwrap();

        assert!(list.has_calls_out_of_order());
        assert!(!list.has_unfulfilled_expectations());
        assert!(list.check_expectations().is_ok());
    }

    #[test]
    fn test_strict_ordering() {
        let mut list = ExpectationList::new(MockConfig::new().with_strict_ordering(true));
        list.expect_one_call("first").with_call_order(1);
        list.expect_one_call("second").with_call_order(2);
        list.match_call(&ActualCall::new("second")).unwrap();
        list.match_call(&ActualCall::new("first")).unwrap();

        let err = list.check_expectations().unwrap_err();
        assert!(matches!(err, MockError::CallOrderViolated { .. }));
        let text = err.to_string();
        let first = text.find("first -> expected call order: <1>").unwrap();
        let second = text.find("second -> expected call order: <2>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_expect_n_calls() {
        let mut list = ExpectationList::default();
        list.expect_n_calls(2, "ping").with_parameter("seq", 1_u32);
        assert_eq!(list.len(), 2);
        assert_eq!(list.amount_of_unfulfilled_expectations_for("ping"), 2);

        for _ in 0..2 {
            list.match_call(&ActualCall::new("ping").with_parameter("seq", 1_u32))
                .unwrap();
        }
        assert!(list.check_expectations().is_ok());
    }

    #[test]
    fn test_list_comparators_apply_to_calls() {
        #[derive(PartialEq)]
        struct Id(u8);
        impl std::fmt::Display for Id {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        let registry = ComparatorRegistry::new();
        registry.install_comparator("Id", Rc::new(TypedComparator::<Id>::new()));

        let mut list = ExpectationList::default();
        list.expect_one_call("before").with_parameter_of_type("Id", "id", Rc::new(Id(1)));
        list.use_comparators(registry);
        list.expect_one_call("after").with_parameter_of_type("Id", "id", Rc::new(Id(2)));

        assert!(list
            .match_call(&ActualCall::new("before").with_parameter_of_type("Id", "id", Rc::new(Id(1))))
            .is_ok());
        assert!(list
            .match_call(&ActualCall::new("after").with_parameter_of_type("Id", "id", Rc::new(Id(2))))
            .is_ok());
        assert!(list.check_expectations().is_ok());
        assert_eq!(
            list.actual_calls_to_string(""),
            "before -> Id id: <#1>\nafter -> Id id: <#2>"
        );
    }

    #[test]
    fn test_clear() {
        let mut list = ExpectationList::default();
        list.expect_one_call("a");
        list.match_call(&ActualCall::new("a")).unwrap();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.call_counter(), 0);
        assert_eq!(list.actual_calls_to_string(""), "<none>");
    }
}
