//! Matchers over lists of selected values.

use super::Matcher;

#[derive(Debug, Clone)]
pub struct HasItem<M>(M);

impl<V, M: Matcher<V>> Matcher<[V]> for HasItem<M> {
    fn matches(&self, actual: &[V]) -> bool {
        actual.iter().any(|item| self.0.matches(item))
    }

    fn describe(&self) -> String {
        format!("a collection containing {}", self.0.describe())
    }
}

#[derive(Debug, Clone)]
pub struct HasItems<M>(Vec<M>);

impl<V, M: Matcher<V>> Matcher<[V]> for HasItems<M> {
    fn matches(&self, actual: &[V]) -> bool {
        self.0
            .iter()
            .all(|matcher| actual.iter().any(|item| matcher.matches(item)))
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.0.iter().map(|m| m.describe()).collect();
        format!("a collection containing {}", parts.join(" and "))
    }
}

#[derive(Debug, Clone)]
pub struct EveryItem<M>(M);

impl<V, M: Matcher<V>> Matcher<[V]> for EveryItem<M> {
    fn matches(&self, actual: &[V]) -> bool {
        actual.iter().all(|item| self.0.matches(item))
    }

    fn describe(&self) -> String {
        format!("every item is {}", self.0.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasLength(usize);

impl<V> Matcher<[V]> for HasLength {
    fn matches(&self, actual: &[V]) -> bool {
        actual.len() == self.0
    }

    fn describe(&self) -> String {
        format!("a collection with size {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl<V> Matcher<[V]> for Empty {
    fn matches(&self, actual: &[V]) -> bool {
        actual.is_empty()
    }

    fn describe(&self) -> String {
        "an empty collection".to_string()
    }
}

/// At least one element matches.
pub fn has_item<M>(matcher: M) -> HasItem<M> {
    HasItem(matcher)
}

/// Each matcher is satisfied by at least one element.
pub fn has_items<M>(matchers: impl IntoIterator<Item = M>) -> HasItems<M> {
    HasItems(matchers.into_iter().collect())
}

/// Every element matches. Holds vacuously for an empty list.
pub fn every_item<M>(matcher: M) -> EveryItem<M> {
    EveryItem(matcher)
}

pub fn has_length(len: usize) -> HasLength {
    HasLength(len)
}

pub fn empty() -> Empty {
    Empty
}
