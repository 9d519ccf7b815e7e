use std::ops::Index;

use indexmap::IndexMap;

/// Name-keyed, insertion-ordered collection of one member kind.
///
/// Read-only outside the crate; [`super::Camp`] owns all mutation.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, name: String, member: T) -> Option<T> {
        self.entries.insert(name, member)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<T> {
        self.entries.shift_remove(name)
    }
}

impl<T> Index<&str> for Registry<T> {
    type Output = T;

    fn index(&self, name: &str) -> &T {
        &self.entries[name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_order_and_remove() {
        let mut registry = Registry::default();
        registry.insert("b".to_string(), 2);
        registry.insert("a".to_string(), 1);
        registry.insert("c".to_string(), 3);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["b", "a", "c"]);

        assert_eq!(registry.remove("a"), Some(1));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["b", "c"]);
        assert_eq!(registry["c"], 3);
        assert!(registry.get("a").is_none());
    }
}
