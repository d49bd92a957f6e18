//! Operand traits shared by the value matchers.
//!
//! - `Compare` - equality and ordering between an actual value and an expected operand
//! - `Numeric` - Rust numbers (and JSON numbers through `Compare`) compared by value
//! - `Describe` - how an expected operand is printed inside a matcher description
//! - `Text` - string view of an actual value for the string matchers
//!
//! JSON values selected from a body compare directly against native Rust operands,
//! so `equal_to("Sun City")` and `greater_than(300)` work on `serde_json::Value`.
//! JSON strings holding a number (XML and HTML text) compare numerically against
//! numeric operands.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::time::Duration;

use serde_json::{Number, Value};

/// Equality and ordering of `Self` against an expected operand.
pub trait Compare<Rhs: ?Sized> {
    /// `None` when the two values are not comparable.
    fn compare(&self, expected: &Rhs) -> Option<Ordering>;

    fn equals(&self, expected: &Rhs) -> bool {
        self.compare(expected) == Some(Ordering::Equal)
    }
}

/// A number that can take part in cross-type numeric comparison.
pub trait Numeric {
    fn as_i128(&self) -> Option<i128>;
    fn as_f64(&self) -> Option<f64>;
}

macro_rules! impl_numeric_int {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn as_i128(&self) -> Option<i128> {
                    Some(*self as i128)
                }

                fn as_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn as_i128(&self) -> Option<i128> {
                    None
                }

                fn as_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

impl_numeric_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_numeric_float!(f32, f64);

fn compare_numbers(
    (left_int, left_float): (Option<i128>, Option<f64>),
    (right_int, right_float): (Option<i128>, Option<f64>),
) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (left_int, right_int) {
        return Some(l.cmp(&r));
    }
    left_float?.partial_cmp(&right_float?)
}

fn numeric_parts<N: Numeric + ?Sized>(n: &N) -> (Option<i128>, Option<f64>) {
    (n.as_i128(), n.as_f64())
}

fn json_number_parts(n: &Number) -> (Option<i128>, Option<f64>) {
    let int = n
        .as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from));
    (int, n.as_f64())
}

/// Numeric view of a JSON value: numbers, and strings that parse as numbers.
fn json_numeric_parts(value: &Value) -> Option<(Option<i128>, Option<f64>)> {
    match value {
        Value::Number(n) => Some(json_number_parts(n)),
        Value::String(s) => {
            let s = s.trim();
            let int = s.parse::<i128>().ok();
            let float = s.parse::<f64>().ok();
            if int.is_none() && float.is_none() {
                None
            } else {
                Some((int, float))
            }
        }
        _ => None,
    }
}

impl<A: Numeric, B: Numeric> Compare<B> for A {
    fn compare(&self, expected: &B) -> Option<Ordering> {
        compare_numbers(numeric_parts(self), numeric_parts(expected))
    }
}

impl<N: Numeric> Compare<N> for Value {
    fn compare(&self, expected: &N) -> Option<Ordering> {
        compare_numbers(json_numeric_parts(self)?, numeric_parts(expected))
    }
}

impl<'a> Compare<&'a str> for Value {
    fn compare(&self, expected: &&'a str) -> Option<Ordering> {
        match self {
            Value::String(s) => Some(s.as_str().cmp(expected)),
            _ => None,
        }
    }
}

impl Compare<String> for Value {
    fn compare(&self, expected: &String) -> Option<Ordering> {
        self.compare(&expected.as_str())
    }
}

impl Compare<bool> for Value {
    fn compare(&self, expected: &bool) -> Option<Ordering> {
        match self {
            Value::Bool(b) => Some(b.cmp(expected)),
            _ => None,
        }
    }
}

impl Compare<Value> for Value {
    fn compare(&self, expected: &Value) -> Option<Ordering> {
        match (self, expected) {
            (Value::Number(_), Value::Number(_)) => {
                compare_numbers(json_numeric_parts(self)?, json_numeric_parts(expected)?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (a, b) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl<'a> Compare<&'a str> for str {
    fn compare(&self, expected: &&'a str) -> Option<Ordering> {
        Some(self.cmp(*expected))
    }
}

impl Compare<String> for str {
    fn compare(&self, expected: &String) -> Option<Ordering> {
        Some(self.cmp(expected.as_str()))
    }
}

impl<'a> Compare<&'a str> for String {
    fn compare(&self, expected: &&'a str) -> Option<Ordering> {
        Some(self.as_str().cmp(expected))
    }
}

impl Compare<String> for String {
    fn compare(&self, expected: &String) -> Option<Ordering> {
        Some(self.cmp(expected))
    }
}

impl Compare<bool> for bool {
    fn compare(&self, expected: &bool) -> Option<Ordering> {
        Some(self.cmp(expected))
    }
}

impl Compare<Duration> for Duration {
    fn compare(&self, expected: &Duration) -> Option<Ordering> {
        Some(self.cmp(expected))
    }
}

/// Rendering of an expected operand inside a matcher description.
pub trait Describe {
    fn describe_value(&self) -> String;
}

macro_rules! impl_describe_display {
    ($($t:ty),*) => {
        $(
            impl Describe for $t {
                fn describe_value(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_describe_display!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64, bool);

impl Describe for str {
    fn describe_value(&self) -> String {
        format!("\"{self}\"")
    }
}

impl Describe for String {
    fn describe_value(&self) -> String {
        self.as_str().describe_value()
    }
}

impl Describe for Value {
    fn describe_value(&self) -> String {
        self.to_string()
    }
}

impl Describe for Duration {
    fn describe_value(&self) -> String {
        format!("{self:?}")
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe_value(&self) -> String {
        (**self).describe_value()
    }
}

/// String view of an actual value.
pub trait Text {
    /// `None` when the value has no sensible text form (null, arrays, objects).
    fn text(&self) -> Option<Cow<'_, str>>;
}

impl Text for str {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl Text for String {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl Text for Value {
    fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl<T: Text + ?Sized> Text for &T {
    fn text(&self) -> Option<Cow<'_, str>> {
        (**self).text()
    }
}
