//! Record of one real invocation, matched against expectations.

use crate::comparator::ComparatorRegistry;
use crate::diagnostics::{self, CallDescription};
use crate::named_value::{self, MockValue, NamedValue};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A call as it actually happened
///
/// # Example
///
/// ```rust,ignore
/// let call = ActualCall::new("write")
///     .on_object(&file)
///     .with_parameter("len", 5_u64)
///     .with_output_parameter("written");
/// let matched = expectations.match_call(&call)?;
/// ```
#[derive(Debug, Clone)]
pub struct ActualCall {
    name: String,
    object: Option<usize>,
    parameters: Vec<NamedValue>,
    output_parameters: Vec<String>,
}

impl ActualCall {
    /// A call to `name` with no parameters
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            object: None,
            parameters: Vec::new(),
            output_parameters: Vec::new(),
        }
    }

    /// The call was made on `object`
    #[must_use]
    pub fn on_object<T: ?Sized>(self, object: &T) -> Self {
        self.on_object_address(diagnostics::address_of(object))
    }

    /// The call was made on the object at `address`
    #[must_use]
    pub fn on_object_address(mut self, address: usize) -> Self {
        self.object = Some(address);
        self
    }

    /// The call passed `parameter`
    #[must_use]
    pub fn with_named_parameter(mut self, parameter: NamedValue) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// The call passed `value` as `name`
    #[must_use]
    pub fn with_parameter(self, name: &str, value: impl Into<MockValue>) -> Self {
        self.with_named_parameter(NamedValue::new(name, value))
    }

    /// The call passed an opaque object as `name`
    #[must_use]
    pub fn with_parameter_of_type(self, type_name: &str, name: &str, object: Rc<dyn Any>) -> Self {
        self.with_named_parameter(NamedValue::object(name, type_name, object))
    }

    /// The call passed a memory buffer as `name`
    #[must_use]
    pub fn with_memory_buffer_parameter(self, name: &str, bytes: &[u8]) -> Self {
        self.with_named_parameter(NamedValue::new(name, MockValue::memory_buffer(bytes)))
    }

    /// The call wants the output parameter `name` filled in
    #[must_use]
    pub fn with_output_parameter(mut self, name: &str) -> Self {
        self.output_parameters.push(name.to_string());
        self
    }

    /// Function name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address of the object the call was made on
    #[must_use]
    pub fn object(&self) -> Option<usize> {
        self.object
    }

    /// Passed input parameters in call order
    #[must_use]
    pub fn parameters(&self) -> &[NamedValue] {
        &self.parameters
    }

    /// Requested output parameter names
    #[must_use]
    pub fn output_parameters(&self) -> &[String] {
        &self.output_parameters
    }

    /// Render like an expectation, objects through `comparators`
    #[must_use]
    pub fn describe_with(&self, comparators: Option<&ComparatorRegistry>) -> String {
        let mut parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|p| p.describe_with(comparators))
            .collect();
        parameters.extend(self.output_parameters.iter().map(|name| {
            diagnostics::format_parameter(
                named_value::CONST_POINTER,
                name,
                diagnostics::OUTPUT_MARKER,
            )
        }));
        CallDescription {
            object: self.object,
            name: &self.name,
            expected_order: None,
            parameters,
            ignore_other_parameters: false,
        }
        .render()
    }
}

impl fmt::Display for ActualCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe_with(None))
    }
}
