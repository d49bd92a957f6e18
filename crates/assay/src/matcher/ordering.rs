//! Equality and ordering matchers built on [`Compare`].

use std::cmp::Ordering;

use super::compare::{Compare, Describe};
use super::Matcher;

/// Matches values equal to `expected`.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualTo<E> {
    expected: E,
}

impl<T, E> Matcher<T> for EqualTo<E>
where
    T: Compare<E> + ?Sized,
    E: Describe,
{
    fn matches(&self, actual: &T) -> bool {
        actual.equals(&self.expected)
    }

    fn describe(&self) -> String {
        format!("equal to {}", self.expected.describe_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Bound {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Bound::Greater => ordering == Ordering::Greater,
            Bound::GreaterOrEqual => ordering != Ordering::Less,
            Bound::Less => ordering == Ordering::Less,
            Bound::LessOrEqual => ordering != Ordering::Greater,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Bound::Greater => "greater than",
            Bound::GreaterOrEqual => "greater than or equal to",
            Bound::Less => "less than",
            Bound::LessOrEqual => "less than or equal to",
        }
    }
}

/// Matches values on one side of a bound. Incomparable values never match.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingMatcher<E> {
    bound: Bound,
    expected: E,
}

impl<T, E> Matcher<T> for OrderingMatcher<E>
where
    T: Compare<E> + ?Sized,
    E: Describe,
{
    fn matches(&self, actual: &T) -> bool {
        actual
            .compare(&self.expected)
            .is_some_and(|ordering| self.bound.accepts(ordering))
    }

    fn describe(&self) -> String {
        format!("{} {}", self.bound.phrase(), self.expected.describe_value())
    }
}

pub fn equal_to<E>(expected: E) -> EqualTo<E> {
    EqualTo { expected }
}

pub fn greater_than<E>(expected: E) -> OrderingMatcher<E> {
    OrderingMatcher {
        bound: Bound::Greater,
        expected,
    }
}

pub fn greater_than_or_equal_to<E>(expected: E) -> OrderingMatcher<E> {
    OrderingMatcher {
        bound: Bound::GreaterOrEqual,
        expected,
    }
}

pub fn less_than<E>(expected: E) -> OrderingMatcher<E> {
    OrderingMatcher {
        bound: Bound::Less,
        expected,
    }
}

pub fn less_than_or_equal_to<E>(expected: E) -> OrderingMatcher<E> {
    OrderingMatcher {
        bound: Bound::LessOrEqual,
        expected,
    }
}
