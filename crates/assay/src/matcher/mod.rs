//! Matchers for response verification.
//!
//! A [`Matcher`] tests an actual value and describes itself for failure messages.
//! Verification methods accept an [`Expected`], which is either a literal value
//! compared for equality or a boxed matcher:
//!
//! ```ignore
//! response.status_code(200)?;
//! response.status_code(greater_than_or_equal_to(200))?;
//! response.body_path("$.Places[0].Name", equal_to("Sun City"))?;
//! ```
//!
//! Submodules:
//! - `compare` - operand traits (`Compare`, `Describe`, `Text`)
//! - `ordering` - `equal_to` and the bound matchers
//! - `string_matcher` - text matchers with optional case folding
//! - `logical` - `not`, `all_of`, `any_of`, `anything`, `predicate`
//! - `collection` - matchers over lists of selected values

mod collection;
mod compare;
mod logical;
mod ordering;
mod string_matcher;

use std::fmt;

pub use collection::{
    empty, every_item, has_item, has_items, has_length, Empty, EveryItem, HasItem, HasItems,
    HasLength,
};
pub use compare::{Compare, Describe, Numeric, Text};
pub use logical::{all_of, any_of, anything, not, predicate, AllOf, AnyOf, Anything, Not, Predicate};
pub use ordering::{
    equal_to, greater_than, greater_than_or_equal_to, less_than, less_than_or_equal_to, EqualTo,
    OrderingMatcher,
};
pub use string_matcher::{
    contains_string, ends_with, equal_to_ignoring_case, matches_regex, starts_with, StringMatcher,
};

/// A value test with a human-readable description.
pub trait Matcher<T: ?Sized> {
    fn matches(&self, actual: &T) -> bool;

    /// Description used in failure messages, e.g. `a string containing "Sin"`.
    fn describe(&self) -> String;
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for Box<M> {
    fn matches(&self, actual: &T) -> bool {
        (**self).matches(actual)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Expected side of a verification: a literal for equality, or a matcher.
pub enum Expected<T> {
    Value(T),
    Matcher(Box<dyn Matcher<T>>),
}

impl<T: PartialEq> Expected<T> {
    pub fn is_satisfied_by(&self, actual: &T) -> bool {
        match self {
            Expected::Value(expected) => expected == actual,
            Expected::Matcher(matcher) => matcher.matches(actual),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Expected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Expected::Matcher(matcher) => f.debug_tuple("Matcher").field(&matcher.describe()).finish(),
        }
    }
}

impl<T> From<Box<dyn Matcher<T>>> for Expected<T> {
    fn from(matcher: Box<dyn Matcher<T>>) -> Self {
        Expected::Matcher(matcher)
    }
}

// Listed per type: a blanket impl over `M: Matcher<T>` overlaps `From<T> for T`.
macro_rules! matcher_into_expected {
    ($($matcher:ident $(<$($param:ident),+>)?),+ $(,)?) => {
        $(
            impl<T $($(, $param)+)?> From<$matcher $(<$($param),+>)?> for Expected<T>
            where
                $matcher $(<$($param),+>)?: Matcher<T> + 'static,
            {
                fn from(matcher: $matcher $(<$($param),+>)?) -> Self {
                    Expected::Matcher(Box::new(matcher))
                }
            }
        )+
    };
}

matcher_into_expected!(
    EqualTo<E>,
    OrderingMatcher<E>,
    StringMatcher,
    Not<M>,
    AllOf<A, B>,
    AnyOf<A, B>,
    Anything,
    Predicate<F>,
);

impl From<u16> for Expected<u16> {
    fn from(value: u16) -> Self {
        Expected::Value(value)
    }
}

impl From<reqwest::StatusCode> for Expected<u16> {
    fn from(value: reqwest::StatusCode) -> Self {
        Expected::Value(value.as_u16())
    }
}

impl From<&str> for Expected<String> {
    fn from(value: &str) -> Self {
        Expected::Value(value.to_string())
    }
}

impl From<String> for Expected<String> {
    fn from(value: String) -> Self {
        Expected::Value(value)
    }
}

impl From<&String> for Expected<String> {
    fn from(value: &String) -> Self {
        Expected::Value(value.clone())
    }
}
