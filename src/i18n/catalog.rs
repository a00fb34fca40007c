//! Built-in message catalogs for the strings the console itself emits.
//!
//! Lookups fall back to English, then to the key itself, so a missing
//! translation never renders as an empty label.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::Language;

static EN: LazyLock<HashMap<String, String>> =
    LazyLock::new(|| parse_catalog("en", include_str!("../../resources/locales/en.json")));
static AR: LazyLock<HashMap<String, String>> =
    LazyLock::new(|| parse_catalog("ar", include_str!("../../resources/locales/ar.json")));

fn parse_catalog(code: &str, raw: &str) -> HashMap<String, String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::error!(code, error = %e, "Invalid message catalog");
        HashMap::new()
    })
}

fn catalog(lang: Language) -> &'static HashMap<String, String> {
    match lang {
        Language::En => &*EN,
        Language::Ar => &*AR,
    }
}

/// Translate `key` for `lang`, substituting `{{name}}` placeholders.
pub fn translate(lang: Language, key: &str, args: &[(&str, &str)]) -> String {
    let template = catalog(lang)
        .get(key)
        .or_else(|| catalog(Language::En).get(key))
        .map(String::as_str)
        .unwrap_or(key);

    args.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{{{name}}}}}"), value)
    })
}
