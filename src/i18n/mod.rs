//! Localization and document direction.
//!
//! The selected language lives in local storage under `i18nextLng`. Arabic
//! flips the document to right-to-left and injects a global style that
//! mirrors explicit `text-align: left/right` on every element that is not
//! explicitly centered.

pub mod catalog;
pub mod format;
pub mod layout;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::storage::{self, SharedStorage, LANGUAGE_KEY};

pub use format::{format_date, format_money, format_timestamp};
pub use layout::{drawer_chevron, FlexDirection, LayoutTokens, Side, TextAlign};

/// Id of the style element holding the RTL alignment mirror.
pub const MIRROR_STYLE_ID: &str = "rtl-text-align-mirror";

/// Mirror rule injected while the document is right-to-left.
pub const MIRROR_STYLE_CSS: &str = "[dir=\"rtl\"] *:not([style*=\"text-align: center\"])[style*=\"text-align: left\"] { text-align: right !important; }\n\
[dir=\"rtl\"] *:not([style*=\"text-align: center\"])[style*=\"text-align: right\"] { text-align: left !important; }";

// ═══════════════════════════════════════════════════════════
// Language
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Language::Ar
    }

    pub fn direction(self) -> Direction {
        if self.is_rtl() {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts region-qualified codes (`ar-EG`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            _ => Err(format!("unsupported language: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_attr(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Document: the global surface written by the locale
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct DocumentState {
    dir: Direction,
    lang: String,
    styles: BTreeMap<String, String>,
}

/// Root document attributes and injected global styles.
#[derive(Clone, Default)]
pub struct Document {
    inner: Arc<RwLock<DocumentState>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Direction {
        self.inner.read().map(|d| d.dir).unwrap_or_default()
    }

    pub fn lang(&self) -> String {
        self.inner.read().map(|d| d.lang.clone()).unwrap_or_default()
    }

    /// Insert or replace a global style element.
    pub fn inject_style(&self, id: &str, css: &str) {
        if let Ok(mut doc) = self.inner.write() {
            doc.styles.insert(id.to_string(), css.to_string());
        }
    }

    pub fn remove_style(&self, id: &str) {
        if let Ok(mut doc) = self.inner.write() {
            doc.styles.remove(id);
        }
    }

    pub fn style(&self, id: &str) -> Option<String> {
        self.inner.read().ok()?.styles.get(id).cloned()
    }

    /// Apply a language: direction attribute, lang attribute and the
    /// alignment mirror style.
    pub fn apply_language(&self, lang: Language) {
        {
            let Ok(mut doc) = self.inner.write() else {
                tracing::error!("Document lock poisoned");
                return;
            };
            doc.dir = lang.direction();
            doc.lang = lang.code().to_string();
        }
        if lang.is_rtl() {
            self.inject_style(MIRROR_STYLE_ID, MIRROR_STYLE_CSS);
        } else {
            self.remove_style(MIRROR_STYLE_ID);
        }
    }

    /// Computed `text-align` for an element given its inline alignment.
    ///
    /// Elements without an inline alignment follow the document start edge.
    /// Explicit left/right is mirrored while the mirror style is present;
    /// `center` is never touched.
    pub fn effective_alignment(&self, inline: Option<TextAlign>) -> TextAlign {
        let dir = self.direction();
        match inline {
            None => LayoutTokens::for_direction(dir).text_align,
            Some(TextAlign::Center) => TextAlign::Center,
            Some(align) => {
                let mirrored = dir == Direction::Rtl && self.style(MIRROR_STYLE_ID).is_some();
                if mirrored {
                    align.mirrored()
                } else {
                    align
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// LocaleContext
// ═══════════════════════════════════════════════════════════

/// Process-wide language holder. Cloning yields another handle to the same
/// state.
#[derive(Clone)]
pub struct LocaleContext {
    language: Arc<RwLock<Language>>,
    storage: SharedStorage,
    document: Document,
}

impl LocaleContext {
    /// Restore the stored language (English when absent or unrecognised)
    /// and apply it to the document.
    pub fn load(storage: SharedStorage, document: Document) -> Self {
        let language = storage::read_or_none(storage.as_ref(), LANGUAGE_KEY)
            .and_then(|code| code.parse().ok())
            .unwrap_or_default();
        document.apply_language(language);
        Self {
            language: Arc::new(RwLock::new(language)),
            storage,
            document,
        }
    }

    pub fn language(&self) -> Language {
        self.language.read().map(|l| *l).unwrap_or_default()
    }

    /// Code sent as `Accept-Language`.
    pub fn code(&self) -> &'static str {
        self.language().code()
    }

    pub fn is_rtl(&self) -> bool {
        self.language().is_rtl()
    }

    pub fn direction(&self) -> Direction {
        self.language().direction()
    }

    pub fn layout(&self) -> LayoutTokens {
        LayoutTokens::for_direction(self.direction())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Switch language: persist, flip direction, update the mirror style.
    pub fn set_language(&self, lang: Language) {
        if let Ok(mut current) = self.language.write() {
            *current = lang;
        }
        storage::write_logged(self.storage.as_ref(), LANGUAGE_KEY, lang.code());
        self.document.apply_language(lang);
        tracing::info!(language = %lang, "Language changed");
    }

    /// Flip between English and Arabic.
    pub fn toggle(&self) -> Language {
        let next = match self.language() {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        };
        self.set_language(next);
        next
    }

    pub fn t(&self, key: &str) -> String {
        catalog::translate(self.language(), key, &[])
    }

    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        catalog::translate(self.language(), key, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn locale_with(pairs: &[(&str, &str)]) -> (LocaleContext, SharedStorage) {
        let storage: SharedStorage = Arc::new(MemoryStorage::with(pairs));
        let locale = LocaleContext::load(storage.clone(), Document::new());
        (locale, storage)
    }

    #[test]
    fn defaults_to_english_ltr() {
        let (locale, _) = locale_with(&[]);
        assert_eq!(locale.language(), Language::En);
        assert!(!locale.is_rtl());
        assert_eq!(locale.document().direction(), Direction::Ltr);
        assert!(locale.document().style(MIRROR_STYLE_ID).is_none());
    }

    #[test]
    fn restores_stored_arabic() {
        let (locale, _) = locale_with(&[(LANGUAGE_KEY, "ar")]);
        assert!(locale.is_rtl());
        assert_eq!(locale.document().direction(), Direction::Rtl);
        assert_eq!(locale.document().lang(), "ar");
    }

    #[test]
    fn unknown_stored_code_falls_back_to_english() {
        let (locale, _) = locale_with(&[(LANGUAGE_KEY, "xx")]);
        assert_eq!(locale.language(), Language::En);
    }

    #[test]
    fn region_codes_parse() {
        assert_eq!("ar-EG".parse::<Language>().unwrap(), Language::Ar);
        assert_eq!("en_US".parse::<Language>().unwrap(), Language::En);
    }

    #[test]
    fn switching_to_arabic_sets_rtl_and_mirrors_alignment() {
        let (locale, storage) = locale_with(&[]);
        locale.set_language(Language::Ar);

        let doc = locale.document();
        assert_eq!(doc.direction(), Direction::Rtl);
        assert_eq!(doc.direction().as_attr(), "rtl");
        assert_eq!(doc.effective_alignment(Some(TextAlign::Left)), TextAlign::Right);
        assert_eq!(doc.effective_alignment(Some(TextAlign::Right)), TextAlign::Left);
        assert_eq!(doc.effective_alignment(Some(TextAlign::Center)), TextAlign::Center);
        assert_eq!(doc.effective_alignment(None), TextAlign::Right);
        assert_eq!(
            storage.get(LANGUAGE_KEY).unwrap().as_deref(),
            Some("ar")
        );
    }

    #[test]
    fn switching_back_reverses_mirroring() {
        let (locale, _) = locale_with(&[]);
        locale.set_language(Language::Ar);
        locale.set_language(Language::En);

        let doc = locale.document();
        assert_eq!(doc.direction(), Direction::Ltr);
        assert!(doc.style(MIRROR_STYLE_ID).is_none());
        assert_eq!(doc.effective_alignment(Some(TextAlign::Left)), TextAlign::Left);
        assert_eq!(doc.effective_alignment(None), TextAlign::Left);
    }

    #[test]
    fn toggle_flips_language() {
        let (locale, _) = locale_with(&[]);
        assert_eq!(locale.toggle(), Language::Ar);
        assert_eq!(locale.toggle(), Language::En);
    }

    #[test]
    fn translation_follows_language() {
        let (locale, _) = locale_with(&[]);
        assert_eq!(locale.t("nav.stock"), "Stock");
        locale.set_language(Language::Ar);
        assert_eq!(locale.t("nav.stock"), "المخزون");
    }
}
