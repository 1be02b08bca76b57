//! Response localisation
//!
//! Records store a default text plus optional Russian and Kyrgyz variants.
//! Reads pick the variant for the requested language and fall back to the
//! default text when that variant is missing or blank.

use serde::Deserialize;

/// Supported response languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Lang {
    #[default]
    En,
    Ru,
    Kg,
}

impl From<String> for Lang {
    fn from(value: String) -> Self {
        Lang::parse(&value)
    }
}

impl Lang {
    /// Parse a `lang` query value; anything unknown means the default language
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ru" => Lang::Ru,
            "kg" | "ky" => Lang::Kg,
            _ => Lang::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
            Lang::Kg => "kg",
        }
    }

    /// Select the text for this language
    pub fn pick(&self, default: &str, ru: Option<&str>, kg: Option<&str>) -> String {
        let localized = match self {
            Lang::En => None,
            Lang::Ru => ru,
            Lang::Kg => kg,
        };

        match localized {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => default.to_string(),
        }
    }
}

/// Records whose display text depends on the request language
pub trait Localize {
    /// Rewrite the default text fields with the variant for `lang`
    fn localize(self, lang: Lang) -> Self;
}
