//! Assertion helpers for headless refresh scenarios.

use refreshable_core::RefreshSnapshot;
use refreshable_layout::RefreshLayout;

use crate::headless_scenario::{LayoutExpectation, StateExpectation};

/// Allowed difference between expected and observed geometry.
pub const TOLERANCE: f32 = 1e-4;

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn mismatch(field: &str, expected: impl std::fmt::Display, actual: impl std::fmt::Display) -> Self {
        AssertionResult::Failed {
            code: format!("{field}_mismatch"),
            message: format!("{field}: expected {expected}, got {actual}"),
        }
    }
}

pub fn evaluate_assert_state(expect: &StateExpectation, snapshot: &RefreshSnapshot) -> AssertionResult {
    let floats = [
        ("percentage", expect.percentage, snapshot.percentage),
        ("indicator_offset", expect.indicator_offset, snapshot.indicator_offset),
        ("alignment_offset", expect.alignment_offset, snapshot.alignment_offset),
        ("indicator_opacity", expect.indicator_opacity, snapshot.indicator_opacity),
    ];
    for (field, expected, actual) in floats {
        if let Some(expected) = expected {
            if !approx_eq(expected, actual) {
                return AssertionResult::mismatch(field, expected, actual);
            }
        }
    }

    let flags = [
        ("refreshing", expect.refreshing, snapshot.refreshing),
        ("frozen", expect.frozen, snapshot.frozen),
    ];
    for (field, expected, actual) in flags {
        if let Some(expected) = expected {
            if expected != actual {
                return AssertionResult::mismatch(field, expected, actual);
            }
        }
    }

    AssertionResult::Passed
}

pub fn evaluate_assert_layout(expect: &LayoutExpectation, layout: &RefreshLayout) -> AssertionResult {
    if let Some(expected) = expect.content_offset_y {
        if !approx_eq(expected, layout.content_offset_y) {
            return AssertionResult::mismatch("content_offset_y", expected, layout.content_offset_y);
        }
    }

    let flags = [
        ("scroll_enabled", expect.scroll_enabled, layout.scroll_enabled),
        ("indicator_visible", expect.indicator_visible, layout.indicator.is_visible()),
        ("indicator_animating", expect.indicator_animating, layout.indicator.animating),
    ];
    for (field, expected, actual) in flags {
        if let Some(expected) = expected {
            if expected != actual {
                return AssertionResult::mismatch(field, expected, actual);
            }
        }
    }

    AssertionResult::Passed
}

pub fn evaluate_assert_count<T>(field: &str, expected: T, actual: T) -> AssertionResult
where
    T: PartialEq + std::fmt::Display,
{
    if expected == actual {
        AssertionResult::Passed
    } else {
        AssertionResult::mismatch(field, expected, actual)
    }
}

fn approx_eq(expected: f32, actual: f32) -> bool {
    (expected - actual).abs() <= TOLERANCE
}
