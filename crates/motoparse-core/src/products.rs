use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A product as returned by the remote parsing service.
///
/// Price fields are display strings exactly as scraped (e.g. `"1 250 000 ₽"`);
/// nothing here interprets them as currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub year: String,
    pub name: String,
    /// Product page URL. Identifies the product within one result set.
    pub link: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economy: Option<String>,
    /// Tag of the source site, e.g. `"rollingmoto"`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub site: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<BTreeMap<String, String>>,
}

/// Outcome of parsing one page: either a listing or a single product.
///
/// Serialized with the same `type` tag the remote service uses, so a cached
/// entry and a fresh response have identical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParseResult {
    Catalog {
        products: Vec<Product>,
        #[serde(rename = "totalItems")]
        total_items: u64,
    },
    Product {
        details: Product,
    },
}

impl ParseResult {
    /// Products carried by this result, in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            ParseResult::Catalog { products, .. } => products,
            ParseResult::Product { details } => std::slice::from_ref(details),
        }
    }

    #[must_use]
    pub fn is_catalog(&self) -> bool {
        matches!(self, ParseResult::Catalog { .. })
    }
}

/// The scraper emits `null` for fields it could not find.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
