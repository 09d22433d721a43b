//! Expected calls
//!
//! An expected call describes one invocation a test anticipates: the
//! function name, an optional target object, input parameters, output
//! parameters to hand back, an optional return value and an optional call
//! order. Configuration is builder style through the [`ExpectedCall`] trait,
//! which the checked, composite and ignored expectations all implement.
//!
//! ```rust,ignore
//! let mut call = CheckedExpectedCall::new();
//! call.with_name("write")
//!     .with_parameter("fd", 3)
//!     .with_parameter("buf", "hello")
//!     .and_return_value(5);
//!
//! call.call_was_made(1);
//! call.input_parameter_was_passed("fd");
//! call.input_parameter_was_passed("buf");
//! assert!(call.is_fulfilled());
//! ```
//!
//! State: `Configured -> (call_was_made) -> Invoked`. Fulfillment and call
//! order are independent flags; a call can be fulfilled and out of order at
//! the same time.

use crate::comparator::ComparatorRegistry;
use crate::diagnostics::{self, CallDescription};
use crate::named_value::{self, MockValue, NamedValue};
use crate::result::{MockError, MockResult};
use std::any::Any;
use std::collections::HashSet;
use std::rc::Rc;

/// Name given to configured return values
pub const RETURN_VALUE_NAME: &str = "returnValue";

/// Builder and query surface shared by every kind of expectation
pub trait ExpectedCall {
    /// Set the function name
    fn with_name(&mut self, name: &str) -> &mut Self;

    /// Require the call to be the `order`-th call made (1-based)
    fn with_call_order(&mut self, order: u32) -> &mut Self;

    /// Bind the call to the object at `address`
    fn on_object_address(&mut self, address: usize) -> &mut Self;

    /// Bind the call to `object` (identity, not value)
    fn on_object<T: ?Sized>(&mut self, object: &T) -> &mut Self {
        self.on_object_address(diagnostics::address_of(object))
    }

    /// Declare an input parameter
    fn with_named_parameter(&mut self, parameter: NamedValue) -> &mut Self;

    /// Declare an input parameter of a built-in kind
    fn with_parameter<V: Into<MockValue>>(&mut self, name: &str, value: V) -> &mut Self {
        self.with_named_parameter(NamedValue::new(name, value))
    }

    /// Declare an opaque object parameter tagged with `type_name`
    fn with_parameter_of_type(
        &mut self,
        type_name: &str,
        name: &str,
        object: Rc<dyn Any>,
    ) -> &mut Self {
        self.with_named_parameter(NamedValue::object(name, type_name, object))
    }

    /// Declare a memory buffer parameter compared by content
    fn with_memory_buffer_parameter(&mut self, name: &str, bytes: &[u8]) -> &mut Self {
        self.with_named_parameter(NamedValue::new(name, MockValue::memory_buffer(bytes)))
    }

    /// Declare an output parameter; `data` is copied out when the call happens
    fn with_output_parameter_returning(&mut self, name: &str, data: &[u8]) -> &mut Self;

    /// Accept parameters that were not declared
    fn ignore_other_parameters(&mut self) -> &mut Self;

    /// Set the value the call returns
    fn and_return_mock_value(&mut self, value: MockValue) -> &mut Self;

    /// Set the value the call returns
    fn and_return_value<V: Into<MockValue>>(&mut self, value: V) -> &mut Self {
        self.and_return_mock_value(value.into())
    }

    /// Configured return value
    fn return_value(&self) -> Option<&NamedValue>;

    /// One-line description used in failure messages
    fn call_to_string(&self) -> String;

    /// Whether the expectation has been met
    fn is_fulfilled(&self) -> bool;

    /// Whether the call happened at a different position than declared
    fn is_out_of_order(&self) -> bool;
}

/// An output parameter and the bytes handed back through it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputParameter {
    name: String,
    data: Vec<u8>,
}

impl OutputParameter {
    /// Create an output parameter returning a copy of `data`
    #[must_use]
    pub fn new(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
        }
    }

    /// Parameter name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes written back
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Declared size in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// An expectation that tracks whether and how it was called
#[derive(Debug, Clone, Default)]
pub struct CheckedExpectedCall {
    name: Option<String>,
    object: Option<usize>,
    input_parameters: Vec<NamedValue>,
    output_parameters: Vec<OutputParameter>,
    satisfied_inputs: HashSet<String>,
    satisfied_outputs: HashSet<String>,
    unexpected_parameters: Vec<String>,
    return_value: Option<NamedValue>,
    expected_order: Option<u32>,
    actual_order: Option<u32>,
    ignore_other_parameters: bool,
    call_count: u32,
    comparators: Option<ComparatorRegistry>,
}

impl CheckedExpectedCall {
    /// Create an unnamed expectation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an expectation for `name`
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Compare and render object parameters with `registry` instead of the
    /// current one
    pub fn use_comparators(&mut self, registry: ComparatorRegistry) -> &mut Self {
        self.comparators = Some(registry);
        self
    }

    /// Explicit registry, if one was set
    #[must_use]
    pub fn comparators(&self) -> Option<&ComparatorRegistry> {
        self.comparators.as_ref()
    }

    /// Function name
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Address of the bound object
    #[must_use]
    pub fn object(&self) -> Option<usize> {
        self.object
    }

    /// Whether the call is bound to exactly `object` (or both are unbound)
    #[must_use]
    pub fn relates_to(&self, object: Option<usize>) -> bool {
        self.object == object
    }

    /// Declared input parameters in declaration order
    #[must_use]
    pub fn input_parameters(&self) -> &[NamedValue] {
        &self.input_parameters
    }

    /// Declared output parameters in declaration order
    #[must_use]
    pub fn output_parameters(&self) -> &[OutputParameter] {
        &self.output_parameters
    }

    /// Input parameter called `name`; the last declared wins
    #[must_use]
    pub fn input_parameter(&self, name: &str) -> Option<&NamedValue> {
        self.input_parameters.iter().rev().find(|p| p.name() == name)
    }

    /// Output parameter called `name`; the last declared wins
    #[must_use]
    pub fn output_parameter(&self, name: &str) -> Option<&OutputParameter> {
        self.output_parameters.iter().rev().find(|p| p.name() == name)
    }

    /// Type tag of the input parameter called `name`
    #[must_use]
    pub fn input_parameter_type(&self, name: &str) -> Option<&str> {
        self.input_parameter(name).map(NamedValue::type_name)
    }

    /// Rendered value of the input parameter called `name`
    #[must_use]
    pub fn input_parameter_value_string(&self, name: &str) -> Option<String> {
        self.input_parameter(name)
            .map(|p| p.value_to_string_with(self.comparators.as_ref()))
    }

    /// Whether an input parameter called `name` is declared
    #[must_use]
    pub fn has_input_parameter_with_name(&self, name: &str) -> bool {
        self.input_parameter(name).is_some()
    }

    /// Whether an output parameter called `name` is declared
    #[must_use]
    pub fn has_output_parameter_with_name(&self, name: &str) -> bool {
        self.output_parameter(name).is_some()
    }

    /// Whether a declared input parameter has the same name and an equal value
    #[must_use]
    pub fn has_input_parameter(&self, parameter: &NamedValue) -> bool {
        self.input_parameter(parameter.name()).is_some_and(|declared| {
            declared
                .compare(parameter, self.comparators.as_ref())
                .is_equal()
        })
    }

    /// Whether a declared output parameter has the same name and the same
    /// bytes over its declared size
    #[must_use]
    pub fn has_output_parameter(&self, parameter: &NamedValue) -> bool {
        let Some(declared) = self.output_parameter(parameter.name()) else {
            return false;
        };
        parameter.as_bytes().is_some_and(|bytes| {
            bytes.len() >= declared.size() && bytes[..declared.size()] == *declared.data()
        })
    }

    /// Record that the call happened as the `order`-th call
    pub fn call_was_made(&mut self, order: u32) {
        tracing::debug!(call = self.name.as_deref().unwrap_or(""), order, "expected call was made");
        self.call_count = 1;
        self.actual_order = Some(order);
    }

    /// Record that the caller passed the input parameter called `name`
    ///
    /// Undeclared names are remembered and make the call unfulfilled, unless
    /// other parameters are ignored.
    pub fn input_parameter_was_passed(&mut self, name: &str) {
        if self.has_input_parameter_with_name(name) {
            tracing::trace!(parameter = name, "input parameter passed");
            self.satisfied_inputs.insert(name.to_string());
        } else if !self.ignore_other_parameters {
            tracing::debug!(parameter = name, "undeclared input parameter passed");
            self.unexpected_parameters.push(name.to_string());
        }
    }

    /// Record that the caller asked for the output parameter called `name`
    pub fn output_parameter_was_passed(&mut self, name: &str) {
        if self.has_output_parameter_with_name(name) {
            tracing::trace!(parameter = name, "output parameter passed");
            self.satisfied_outputs.insert(name.to_string());
        } else if !self.ignore_other_parameters {
            tracing::debug!(parameter = name, "undeclared output parameter passed");
            self.unexpected_parameters.push(name.to_string());
        }
    }

    /// Whether every declared input was passed and nothing unexpected was
    #[must_use]
    pub fn parameters_fulfilled(&self) -> bool {
        let declared_passed = self
            .input_parameters
            .iter()
            .all(|p| self.satisfied_inputs.contains(p.name()));
        declared_passed && (self.ignore_other_parameters || self.unexpected_parameters.is_empty())
    }

    /// Names passed to the call that it did not declare
    #[must_use]
    pub fn unexpected_parameters(&self) -> &[String] {
        &self.unexpected_parameters
    }

    /// Whether the output parameter called `name` was asked for
    #[must_use]
    pub fn output_parameter_passed(&self, name: &str) -> bool {
        self.satisfied_outputs.contains(name)
    }

    /// Number of times the call happened (0 or 1)
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.call_count
    }

    /// Whether the call happened
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count > 0
    }

    /// Declared call order
    #[must_use]
    pub fn expected_call_order(&self) -> Option<u32> {
        self.expected_order
    }

    /// Position at which the call actually happened
    #[must_use]
    pub fn actual_call_order(&self) -> Option<u32> {
        self.actual_order
    }

    /// Whether undeclared parameters are accepted
    #[must_use]
    pub fn ignores_other_parameters(&self) -> bool {
        self.ignore_other_parameters
    }

    /// Copy the output parameter called `name` into `destination`
    ///
    /// Returns the number of bytes written.
    pub fn copy_output_parameter(&self, name: &str, destination: &mut [u8]) -> MockResult<usize> {
        let output = self
            .output_parameter(name)
            .ok_or_else(|| MockError::UnknownOutputParameter {
                name: name.to_string(),
            })?;
        if destination.len() < output.size() {
            return Err(MockError::OutputBufferTooSmall {
                name: name.to_string(),
                required: output.size(),
                available: destination.len(),
            });
        }
        destination[..output.size()].copy_from_slice(output.data());
        Ok(output.size())
    }

    /// Forget that the call happened, keeping its configuration
    pub fn reset_expectation(&mut self) {
        self.call_count = 0;
        self.actual_order = None;
        self.satisfied_inputs.clear();
        self.satisfied_outputs.clear();
        self.unexpected_parameters.clear();
    }

    fn note_configuration(&self, operation: &str) {
        if self.was_called() {
            tracing::warn!(
                call = self.name.as_deref().unwrap_or(""),
                operation,
                "expectation configured after it was called"
            );
        }
    }
}

impl ExpectedCall for CheckedExpectedCall {
    fn with_name(&mut self, name: &str) -> &mut Self {
        self.note_configuration("with_name");
        self.name = Some(name.to_string());
        self
    }

    fn with_call_order(&mut self, order: u32) -> &mut Self {
        self.note_configuration("with_call_order");
        self.expected_order = Some(order);
        self
    }

    fn on_object_address(&mut self, address: usize) -> &mut Self {
        self.note_configuration("on_object");
        self.object = Some(address);
        self
    }

    fn with_named_parameter(&mut self, parameter: NamedValue) -> &mut Self {
        self.note_configuration("with_parameter");
        self.input_parameters.push(parameter);
        self
    }

    fn with_output_parameter_returning(&mut self, name: &str, data: &[u8]) -> &mut Self {
        self.note_configuration("with_output_parameter_returning");
        self.output_parameters.push(OutputParameter::new(name, data));
        self
    }

    fn ignore_other_parameters(&mut self) -> &mut Self {
        self.note_configuration("ignore_other_parameters");
        self.ignore_other_parameters = true;
        self
    }

    fn and_return_mock_value(&mut self, value: MockValue) -> &mut Self {
        self.note_configuration("and_return_value");
        self.return_value = Some(NamedValue::new(RETURN_VALUE_NAME, value));
        self
    }

    fn return_value(&self) -> Option<&NamedValue> {
        self.return_value.as_ref()
    }

    fn call_to_string(&self) -> String {
        let mut parameters: Vec<String> = self
            .input_parameters
            .iter()
            .map(|p| p.describe_with(self.comparators.as_ref()))
            .collect();
        parameters.extend(self.output_parameters.iter().map(|p| {
            diagnostics::format_parameter(
                named_value::CONST_POINTER,
                p.name(),
                diagnostics::OUTPUT_MARKER,
            )
        }));

        CallDescription {
            object: self.object,
            name: self.name.as_deref().unwrap_or(""),
            expected_order: self.expected_order,
            parameters,
            ignore_other_parameters: self.ignore_other_parameters,
        }
        .render()
    }

    fn is_fulfilled(&self) -> bool {
        if self.name.is_none() {
            return true;
        }
        self.was_called() && self.parameters_fulfilled()
    }

    fn is_out_of_order(&self) -> bool {
        match (self.expected_order, self.actual_order) {
            (Some(expected), Some(actual)) if self.was_called() => expected != actual,
            _ => false,
        }
    }
}
