//! Logical combinators: NOT, AND, OR, plus `anything` and closure predicates.

use std::fmt;

use super::Matcher;

/// Negates the inner matcher.
#[derive(Debug, Clone)]
pub struct Not<M>(M);

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for Not<M> {
    fn matches(&self, actual: &T) -> bool {
        !self.0.matches(actual)
    }

    fn describe(&self) -> String {
        format!("not {}", self.0.describe())
    }
}

/// Matches if both inner matchers match.
#[derive(Debug, Clone)]
pub struct AllOf<A, B>(A, B);

impl<T: ?Sized, A: Matcher<T>, B: Matcher<T>> Matcher<T> for AllOf<A, B> {
    fn matches(&self, actual: &T) -> bool {
        self.0.matches(actual) && self.1.matches(actual)
    }

    fn describe(&self) -> String {
        format!("({} and {})", self.0.describe(), self.1.describe())
    }
}

/// Matches if either inner matcher matches.
#[derive(Debug, Clone)]
pub struct AnyOf<A, B>(A, B);

impl<T: ?Sized, A: Matcher<T>, B: Matcher<T>> Matcher<T> for AnyOf<A, B> {
    fn matches(&self, actual: &T) -> bool {
        self.0.matches(actual) || self.1.matches(actual)
    }

    fn describe(&self) -> String {
        format!("({} or {})", self.0.describe(), self.1.describe())
    }
}

/// Matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anything;

impl<T: ?Sized> Matcher<T> for Anything {
    fn matches(&self, _actual: &T) -> bool {
        true
    }

    fn describe(&self) -> String {
        "ANYTHING".to_string()
    }
}

/// A matcher defined by a closure and a description.
#[derive(Clone)]
pub struct Predicate<F> {
    description: String,
    test: F,
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized, F: Fn(&T) -> bool> Matcher<T> for Predicate<F> {
    fn matches(&self, actual: &T) -> bool {
        (self.test)(actual)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

pub fn not<M>(matcher: M) -> Not<M> {
    Not(matcher)
}

pub fn all_of<A, B>(first: A, second: B) -> AllOf<A, B> {
    AllOf(first, second)
}

pub fn any_of<A, B>(first: A, second: B) -> AnyOf<A, B> {
    AnyOf(first, second)
}

pub fn anything() -> Anything {
    Anything
}

pub fn predicate<F>(description: impl Into<String>, test: F) -> Predicate<F> {
    Predicate {
        description: description.into(),
        test,
    }
}
