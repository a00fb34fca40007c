//! Query-string builder for list endpoints.
//!
//! The backend treats an empty string as a filter value, so blank values
//! are never stored: setting a key to a blank value removes it.

/// Ordered query fields. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Query::insert`].
    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` when `value` is present and non-blank.
    pub fn opt<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.insert(key, v),
            None => self.remove(key),
        }
        self
    }

    /// `key=true` when `on`, absent otherwise.
    pub fn flag(self, key: &str, on: bool) -> Self {
        if on {
            self.set(key, "true")
        } else {
            self.opt::<&str>(key, None)
        }
    }

    pub fn page(self, page: u32, limit: u32) -> Self {
        self.set("page", page).set("limit", limit)
    }

    /// Insert or replace `key`. A blank value removes the key.
    pub fn insert(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string().trim().to_string();
        if value.is_empty() {
            self.remove(key);
            return;
        }
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Fields of `other` override those of `self`.
    pub fn merge(mut self, other: &Query) -> Self {
        for (k, v) in &other.pairs {
            self.insert(k, v);
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_omitted() {
        let q = Query::new()
            .set("status", "")
            .set("search", "   ")
            .opt::<String>("doctor", None)
            .set("patient", "p1");
        assert_eq!(q.pairs(), &[("patient".to_string(), "p1".to_string())]);
    }

    #[test]
    fn blank_value_removes_existing_key() {
        let mut q = Query::new().set("status", "completed");
        q.insert("status", "");
        assert!(q.get("status").is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn insert_replaces_in_place() {
        let q = Query::new().page(3, 10).set("page", 1);
        assert_eq!(q.get("page"), Some("1"));
        assert_eq!(q.pairs().len(), 2);
    }

    #[test]
    fn flag_only_when_on() {
        assert_eq!(Query::new().flag("lowStock", true).get("lowStock"), Some("true"));
        assert!(Query::new().flag("expired", false).is_empty());
    }

    #[test]
    fn merge_overrides() {
        let base = Query::new().set("a", 1).set("b", 2);
        let merged = base.merge(&Query::new().set("b", 3));
        assert_eq!(merged.get("b"), Some("3"));
        assert_eq!(merged.get("a"), Some("1"));
    }
}
