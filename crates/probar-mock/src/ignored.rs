//! Sink expectation for calls a test does not verify

use crate::expected_call::ExpectedCall;
use crate::named_value::{MockValue, NamedValue};

/// Text an ignored call contributes to diagnostics
pub const IGNORED_CALL_DESCRIPTION: &str = "<ignored call>";

/// Accepts any configuration, keeps none of it, and is always fulfilled
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoredCall;

impl IgnoredCall {
    /// Create an ignored call
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ExpectedCall for IgnoredCall {
    fn with_name(&mut self, _name: &str) -> &mut Self {
        self
    }

    fn with_call_order(&mut self, _order: u32) -> &mut Self {
        self
    }

    fn on_object_address(&mut self, _address: usize) -> &mut Self {
        self
    }

    fn with_named_parameter(&mut self, _parameter: NamedValue) -> &mut Self {
        self
    }

    fn with_output_parameter_returning(&mut self, _name: &str, _data: &[u8]) -> &mut Self {
        self
    }

    fn ignore_other_parameters(&mut self) -> &mut Self {
        self
    }

    fn and_return_mock_value(&mut self, _value: MockValue) -> &mut Self {
        self
    }

    fn return_value(&self) -> Option<&NamedValue> {
        None
    }

    fn call_to_string(&self) -> String {
        IGNORED_CALL_DESCRIPTION.to_string()
    }

    fn is_fulfilled(&self) -> bool {
        true
    }

    fn is_out_of_order(&self) -> bool {
        false
    }
}
