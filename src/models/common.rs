use serde::{Deserialize, Serialize};
use validator::Validate;

/// Entities addressed by an opaque server id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A reference the backend either leaves as a bare id or populates with
/// the referenced document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Populated(T),
    Id(String),
}

impl<T: Identified> Ref<T> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Populated(item) => item.id(),
            Ref::Id(id) => id,
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Populated(item) => Some(item),
            Ref::Id(_) => None,
        }
    }
}

impl<T> From<String> for Ref<T> {
    fn from(id: String) -> Self {
        Ref::Id(id)
    }
}

/// Structured postal address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    #[validate(length(max = 200))]
    pub street: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

impl Address {
    /// Address with only the country pre-filled (form defaults).
    pub fn with_country(country: &str) -> Self {
        Self {
            country: Some(country.to_string()),
            ..Self::default()
        }
    }

    /// Single display line: non-empty parts joined with `", "`.
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.one_line().is_empty()
    }
}

/// Treat blank strings as absent (optional form inputs).
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Thing {
        #[serde(alias = "_id")]
        id: String,
        name: String,
    }

    impl Identified for Thing {
        fn id(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn ref_accepts_bare_id() {
        let r: Ref<Thing> = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(r.id(), "abc");
        assert!(r.populated().is_none());
    }

    #[test]
    fn ref_accepts_populated_document() {
        let r: Ref<Thing> = serde_json::from_str(r#"{"_id":"t1","name":"MRI"}"#).unwrap();
        assert_eq!(r.id(), "t1");
        assert_eq!(r.populated().unwrap().name, "MRI");
    }

    #[test]
    fn address_one_line_skips_blanks() {
        let addr = Address {
            street: Some("12 Nile St".into()),
            city: Some("  ".into()),
            state: None,
            postal_code: Some("11511".into()),
            country: Some("Egypt".into()),
        };
        assert_eq!(addr.one_line(), "12 Nile St, 11511, Egypt");
        assert!(Address::default().is_empty());
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some("  x ")), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
