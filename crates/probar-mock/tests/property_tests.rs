//! Property-based tests for probar-mock.
//!
//! Uses proptest to check matching invariants for arbitrary values.

#![allow(clippy::unwrap_used)]

use probar_mock::prelude::*;
use proptest::prelude::*;

proptest! {
    /// An int parameter matches exactly when the values are equal.
    #[test]
    fn prop_int_parameter_matches_iff_equal(expected in any::<i32>(), actual in any::<i32>()) {
        let mut list = ExpectationList::default();
        list.expect_one_call("f").with_parameter("p", expected);
        let result = list.match_call(&ActualCall::new("f").with_parameter("p", actual));
        prop_assert_eq!(result.is_ok(), expected == actual);
    }

    /// Doubles within the tolerance match.
    #[test]
    fn prop_double_within_tolerance_matches(value in -1.0e6_f64..1.0e6, delta in -0.004_f64..0.004) {
        let mut list = ExpectationList::default();
        list.expect_one_call("f").with_parameter("p", value);
        let result = list.match_call(&ActualCall::new("f").with_parameter("p", value + delta));
        prop_assert!(result.is_ok());
    }

    /// Different value kinds never match, even with equal numbers.
    #[test]
    fn prop_kinds_do_not_mix(value in 0_u32..1000) {
        let mut list = ExpectationList::default();
        list.expect_one_call("f").with_parameter("p", value);
        let result = list.match_call(&ActualCall::new("f").with_parameter("p", u64::from(value)));
        prop_assert!(result.is_err());
    }

    /// N expected calls accept exactly N actual calls.
    #[test]
    fn prop_n_calls_accept_exactly_n(count in 1_usize..8) {
        let mut list = ExpectationList::default();
        list.expect_n_calls(count, "poll");
        for _ in 0..count {
            prop_assert!(list.match_call(&ActualCall::new("poll")).is_ok());
        }
        prop_assert!(list.check_expectations().is_ok());
        prop_assert!(list.match_call(&ActualCall::new("poll")).is_err());
    }

    /// Calls made in declaration order are never out of order.
    #[test]
    fn prop_in_order_calls_are_in_order(count in 1_u32..10) {
        let mut list = ExpectationList::new(MockConfig::new().with_strict_ordering(true));
        for order in 1..=count {
            list.expect_one_call(&format!("step{order}")).with_call_order(order);
        }
        for order in 1..=count {
            list.match_call(&ActualCall::new(&format!("step{order}"))).unwrap();
        }
        prop_assert!(!list.has_calls_out_of_order());
        prop_assert!(list.check_expectations().is_ok());
    }

    /// Reversing two or more ordered calls is always detected.
    #[test]
    fn prop_reversed_calls_are_out_of_order(count in 2_u32..10) {
        let mut list = ExpectationList::new(MockConfig::new().with_strict_ordering(true));
        for order in 1..=count {
            list.expect_one_call(&format!("step{order}")).with_call_order(order);
        }
        for order in (1..=count).rev() {
            list.match_call(&ActualCall::new(&format!("step{order}"))).unwrap();
        }
        prop_assert!(list.has_calls_out_of_order());
        prop_assert!(!list.has_unfulfilled_expectations());
        let is_order_violation = matches!(
            list.check_expectations(),
            Err(MockError::CallOrderViolated { .. })
        );
        prop_assert!(is_order_violation);
    }

    /// Output bytes are copied back unchanged.
    #[test]
    fn prop_output_parameter_copies_bytes(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut list = ExpectationList::default();
        list.expect_one_call("read").with_output_parameter_returning("buf", &data);
        let matched = list
            .match_call(&ActualCall::new("read").with_output_parameter("buf"))
            .unwrap()
            .unwrap();
        let mut buffer = vec![0_u8; data.len()];
        prop_assert_eq!(matched.copy_output_parameter("buf", &mut buffer).unwrap(), data.len());
        prop_assert_eq!(buffer, data);
    }
}
