//! Query string parameters for read routes

use serde::Deserialize;
use uuid::Uuid;

use crate::core::error::ShopError;
use crate::core::extractors::parse_uuid;
use crate::core::locale::Lang;

/// `?lang=` accepted by every public read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LangQuery {
    pub lang: Lang,
}

/// Storefront filters for the product list
///
/// Id filters may repeat the key, carry a comma-separated list, or both.
///
/// # Example
/// ```text
/// GET /api/{storeId}/products?categoryId=a,b&categoryId=c&isFeatured=true&lang=ru
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct ProductQuery {
    pub lang: Lang,

    pub category_id: Vec<String>,

    pub color_id: Vec<String>,

    pub size_id: Vec<String>,

    /// Any non-empty value restricts the list to featured products
    pub is_featured: Option<String>,
}

impl From<Vec<(String, String)>> for ProductQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut query = ProductQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "lang" => query.lang = Lang::from(value),
                "categoryId" => query.category_id.push(value),
                "colorId" => query.color_id.push(value),
                "sizeId" => query.size_id.push(value),
                "isFeatured" => query.is_featured = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// Query types that carry a response language
pub trait HasLang {
    fn lang(&self) -> Lang;
}

impl HasLang for LangQuery {
    fn lang(&self) -> Lang {
        self.lang
    }
}

impl HasLang for ProductQuery {
    fn lang(&self) -> Lang {
        self.lang
    }
}

impl ProductQuery {
    pub fn category_ids(&self) -> Result<Option<Vec<Uuid>>, ShopError> {
        parse_id_list("categoryId", &self.category_id)
    }

    pub fn color_ids(&self) -> Result<Option<Vec<Uuid>>, ShopError> {
        parse_id_list("colorId", &self.color_id)
    }

    pub fn size_ids(&self) -> Result<Option<Vec<Uuid>>, ShopError> {
        parse_id_list("sizeId", &self.size_id)
    }

    pub fn featured_only(&self) -> bool {
        self.is_featured
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }
}

/// Parse repeated, comma-separated id values; blank input means "no filter"
pub fn parse_id_list<S: AsRef<str>>(
    label: &str,
    values: &[S],
) -> Result<Option<Vec<Uuid>>, ShopError> {
    let ids = values
        .iter()
        .flat_map(|raw| raw.as_ref().split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_uuid(label, part))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((!ids.is_empty()).then_some(ids))
}
