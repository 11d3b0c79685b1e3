use std::collections::HashMap;

use super::Value;
use crate::expression::Bindings;

/// Input bindings for a table evaluation, mapping dot-separated variable
/// paths to [`Value`]s.
///
/// Supports nested paths like `"user.profile.age"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    data: HashMap<String, ContextValue>,
}

#[derive(Debug, Clone, PartialEq)]
enum ContextValue {
    Leaf(Value),
    Nested(HashMap<String, ContextValue>),
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a dot-separated path. Creates intermediate nested maps as needed.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Insert a value at a dot-separated path. A leaf standing where a
    /// nested segment is needed is replaced by a map.
    pub fn insert(&mut self, path: &str, value: Value) {
        let (parents, leaf) = split_path(path);
        let mut map = &mut self.data;
        for segment in parents {
            let slot = map
                .entry(segment.to_owned())
                .or_insert_with(|| ContextValue::Nested(HashMap::new()));
            if matches!(slot, ContextValue::Leaf(_)) {
                *slot = ContextValue::Nested(HashMap::new());
            }
            let ContextValue::Nested(next) = slot else {
                return;
            };
            map = next;
        }
        map.insert(leaf.to_owned(), ContextValue::Leaf(value));
    }

    /// Look up a value by dot-separated path.
    /// Returns `None` if the path does not exist or points to a nested map.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let (parents, leaf) = split_path(path);
        let mut map = &self.data;
        for segment in parents {
            match map.get(segment)? {
                ContextValue::Nested(next) => map = next,
                ContextValue::Leaf(_) => return None,
            }
        }
        match map.get(leaf)? {
            ContextValue::Leaf(v) => Some(v),
            ContextValue::Nested(_) => None,
        }
    }

    /// Remove the leaf value at a dot-separated path, returning it. Nested
    /// maps are left in place.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let (parents, leaf) = split_path(path);
        let mut map = &mut self.data;
        for segment in parents {
            match map.get_mut(segment)? {
                ContextValue::Nested(next) => map = next,
                ContextValue::Leaf(_) => return None,
            }
        }
        if !matches!(map.get(leaf)?, ContextValue::Leaf(_)) {
            return None;
        }
        match map.remove(leaf)? {
            ContextValue::Leaf(v) => Some(v),
            ContextValue::Nested(_) => None,
        }
    }

    /// Number of leaf values in the context.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![&self.data];
        while let Some(map) = pending.pop() {
            for value in map.values() {
                match value {
                    ContextValue::Leaf(_) => count += 1,
                    ContextValue::Nested(next) => pending.push(next),
                }
            }
        }
        count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `"a.b.c"` -> (`["a", "b"]`, `"c"`).
fn split_path(path: &str) -> (impl Iterator<Item = &str>, &str) {
    match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents.split('.')).into_iter().flatten(), leaf),
        None => (None.into_iter().flatten(), path),
    }
}

impl Bindings for Context {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (path, value) in iter {
            ctx.insert(path.as_ref(), value.into());
        }
        ctx
    }
}
