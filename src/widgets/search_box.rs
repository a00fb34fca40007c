/// Free-text filter input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    value: String,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the raw text. Returns `true` when the committed query changed.
    pub fn input(&mut self, text: &str) -> bool {
        let before = self.query();
        self.value = text.to_string();
        before != self.query()
    }

    /// Raw text as typed.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Trimmed query, `None` when blank.
    pub fn query(&self) -> Option<String> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Clear the box. Returns `true` when there was a query to clear.
    pub fn clear(&mut self) -> bool {
        let had_query = self.query().is_some();
        self.value.clear();
        had_query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_not_a_query() {
        let mut search = SearchBox::new();
        assert!(!search.input("   "));
        assert_eq!(search.query(), None);
        assert!(search.input(" mri "));
        assert_eq!(search.query().as_deref(), Some("mri"));
        assert!(!search.input("mri  "));
        assert!(search.clear());
        assert_eq!(search.value(), "");
    }
}
