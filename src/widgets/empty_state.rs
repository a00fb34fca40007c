use crate::i18n::LocaleContext;

/// Placeholder shown instead of an empty list or a missing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    /// Label of the call-to-action, if the screen offers one.
    pub action: Option<String>,
}

impl EmptyState {
    /// An index screen with no rows for the current filters.
    pub fn no_results(locale: &LocaleContext, entity: &str) -> Self {
        Self {
            icon: "inbox",
            title: locale.t("empty.title"),
            message: locale.t_with("common.noResults", &[("entity", entity)]),
            action: None,
        }
    }

    /// A detail screen whose record does not exist.
    pub fn not_found(locale: &LocaleContext) -> Self {
        Self {
            icon: "search_off",
            title: locale.t("empty.notFound"),
            message: String::new(),
            action: None,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>) -> Self {
        self.action = Some(label.into());
        self
    }
}
