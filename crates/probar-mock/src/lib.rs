//! Probar Mock: expected-call expectations for test doubles
//!
//! A test declares the calls it expects a collaborator to receive, the code
//! under test reports the calls it actually makes, and the expectation list
//! matches the two and renders precise failure messages when they disagree.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PROBAR MOCK Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Expected   │    │ Expectation│    │ Actual     │            │
//! │   │ Call       │───►│ List       │◄───│ Call       │            │
//! │   │ (builder)  │    │ (matching) │    │ (record)   │            │
//! │   └────────────┘    └─────┬──────┘    └────────────┘            │
//! │                           │                                     │
//! │         ┌─────────────────┼──────────────────┐                  │
//! │         ▼                 ▼                  ▼                  │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ NamedValue │    │ Comparator │    │ MockError  │            │
//! │   │ (typed)    │    │ Registry   │    │ (messages) │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use probar_mock::prelude::*;
//!
//! let mut mock = ExpectationList::new(MockConfig::default());
//! mock.expect_one_call("write")
//!     .with_parameter("fd", 3)
//!     .and_return_value(5_i64);
//!
//! let actual = ActualCall::new("write").with_parameter("fd", 3);
//! let written = mock.match_call(&actual)?.map(|call| call.return_value());
//!
//! mock.check_expectations()?;
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod actual_call;
mod comparator;
mod composite;
mod config;
/// Rendering helpers shared by expectations and failure messages
pub mod diagnostics;
mod expectations;
mod expected_call;
mod failure;
mod ignored;
/// Typed parameter values and their type tags
pub mod named_value;
mod result;

pub use actual_call::ActualCall;
pub use comparator::{Comparator, ComparatorRegistry, CurrentRegistryGuard, TypedComparator};
pub use composite::CompositeCall;
pub use config::MockConfig;
pub use expectations::ExpectationList;
pub use expected_call::{CheckedExpectedCall, ExpectedCall, OutputParameter, RETURN_VALUE_NAME};
pub use failure::{FailureReporter, PanicReporter, RecordingReporter, PANIC_REPORTER};
pub use ignored::{IgnoredCall, IGNORED_CALL_DESCRIPTION};
pub use named_value::{Comparison, MockValue, NamedValue, ObjectValue};
pub use result::{MockError, MockResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::actual_call::*;
    pub use super::comparator::*;
    pub use super::composite::*;
    pub use super::config::*;
    pub use super::expectations::*;
    pub use super::expected_call::*;
    pub use super::failure::*;
    pub use super::ignored::*;
    pub use super::named_value::{Comparison, MockValue, NamedValue, ObjectValue};
    pub use super::result::*;
}
