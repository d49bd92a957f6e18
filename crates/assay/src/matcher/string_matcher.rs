//! Text matchers: substring, prefix, suffix, case-insensitive equality and regex.
//!
//! All of them apply to anything with a [`Text`] view, so the same matcher works
//! on a header value (`String`) and on a value selected from a body (`Value`).

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::compare::Text;
use super::Matcher;

/// Expected text with its lowercase form computed once.
#[derive(Debug, Clone, PartialEq)]
struct CachedValue {
    value: String,
    lower: String,
}

impl CachedValue {
    fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let lower = value.to_lowercase();
        Self { value, lower }
    }

    fn test(&self, op: TextOp, actual: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            op.apply(actual, &self.value)
        } else {
            op.apply(&actual.to_lowercase(), &self.lower)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextOp {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

impl TextOp {
    fn apply(self, actual: &str, expected: &str) -> bool {
        match self {
            TextOp::Equals => actual == expected,
            TextOp::Contains => actual.contains(expected),
            TextOp::StartsWith => actual.starts_with(expected),
            TextOp::EndsWith => actual.ends_with(expected),
        }
    }
}

#[derive(Debug, Clone)]
enum StringMatchCore {
    Op(TextOp, CachedValue),
    Regex(Arc<Regex>),
}

/// A matcher over the text form of a value.
#[derive(Debug, Clone)]
pub struct StringMatcher {
    core: StringMatchCore,
    case_sensitive: bool,
}

impl StringMatcher {
    fn op(op: TextOp, expected: impl Into<String>) -> Self {
        Self {
            core: StringMatchCore::Op(op, CachedValue::new(expected)),
            case_sensitive: true,
        }
    }

    /// Compare without regard to case. Has no effect on regex matchers; use `(?i)`.
    pub fn ignoring_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

impl<T: Text + ?Sized> Matcher<T> for StringMatcher {
    fn matches(&self, actual: &T) -> bool {
        let Some(text) = actual.text() else {
            return false;
        };
        match &self.core {
            StringMatchCore::Op(op, cached) => cached.test(*op, &text, self.case_sensitive),
            StringMatchCore::Regex(regex) => regex.is_match(&text),
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.core {
            StringMatchCore::Op(op, cached) => {
                let verb = match op {
                    TextOp::Equals => "equal to",
                    TextOp::Contains => "a string containing",
                    TextOp::StartsWith => "a string starting with",
                    TextOp::EndsWith => "a string ending with",
                };
                write!(f, "{verb} \"{}\"", cached.value)?;
                if !self.case_sensitive {
                    f.write_str(" ignoring case")?;
                }
                Ok(())
            }
            StringMatchCore::Regex(regex) => write!(f, "a string matching /{}/", regex.as_str()),
        }
    }
}

pub fn contains_string(expected: impl Into<String>) -> StringMatcher {
    StringMatcher::op(TextOp::Contains, expected)
}

pub fn starts_with(expected: impl Into<String>) -> StringMatcher {
    StringMatcher::op(TextOp::StartsWith, expected)
}

pub fn ends_with(expected: impl Into<String>) -> StringMatcher {
    StringMatcher::op(TextOp::EndsWith, expected)
}

pub fn equal_to_ignoring_case(expected: impl Into<String>) -> StringMatcher {
    StringMatcher::op(TextOp::Equals, expected).ignoring_case()
}

/// Match the text against a regular expression (unanchored, like `Regex::is_match`).
pub fn matches_regex(pattern: &str) -> Result<StringMatcher, regex::Error> {
    Ok(StringMatcher {
        core: StringMatchCore::Regex(Arc::new(Regex::new(pattern)?)),
        case_sensitive: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contains() {
        let matcher = contains_string("City");
        assert!(matcher.matches("Sun City"));
        assert!(matcher.matches(&json!("Sin City")));
        assert!(!matcher.matches("Sun CITY"));
        assert!(contains_string("City").ignoring_case().matches("Sun CITY"));
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert!(starts_with("application/").matches("application/json"));
        assert!(!starts_with("text/").matches("application/json"));
        assert!(ends_with("+json").matches(&"application/problem+json".to_string()));
        assert!(ends_with("JSON").ignoring_case().matches("application/json"));
    }

    #[test]
    fn test_equal_to_ignoring_case() {
        let matcher = equal_to_ignoring_case("Sun City");
        assert!(matcher.matches("sun city"));
        assert!(!matcher.matches("sun city "));
    }

    #[test]
    fn test_regex() {
        let matcher = matches_regex(r"^\d{3}-\d{4}$").unwrap();
        assert!(matcher.matches("555-1234"));
        assert!(!matcher.matches("5551234"));
        assert!(matches_regex("(").is_err());
    }

    #[test]
    fn test_numbers_match_by_text() {
        assert!(starts_with("100").matches(&json!(100000)));
    }

    #[test]
    fn test_values_without_text_never_match() {
        assert!(!contains_string("a").matches(&json!(null)));
        assert!(!contains_string("a").matches(&json!(["a"])));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            Matcher::<str>::describe(&contains_string("Sin")),
            "a string containing \"Sin\""
        );
        assert_eq!(
            Matcher::<str>::describe(&equal_to_ignoring_case("ok")),
            "equal to \"ok\" ignoring case"
        );
        assert_eq!(
            matches_regex("a+").unwrap().to_string(),
            "a string matching /a+/"
        );
    }
}
