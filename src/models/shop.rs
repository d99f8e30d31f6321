use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of shop categories offered by the create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopCategory {
    Grocery,
    Medical,
    Electronics,
    Clothing,
    Restaurant,
    Other,
}

impl ShopCategory {
    pub const ALL: [ShopCategory; 6] = [
        ShopCategory::Grocery,
        ShopCategory::Medical,
        ShopCategory::Electronics,
        ShopCategory::Clothing,
        ShopCategory::Restaurant,
        ShopCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShopCategory::Grocery => "grocery",
            ShopCategory::Medical => "medical",
            ShopCategory::Electronics => "electronics",
            ShopCategory::Clothing => "clothing",
            ShopCategory::Restaurant => "restaurant",
            ShopCategory::Other => "other",
        }
    }

    pub fn label(&self, lang: Option<&str>) -> String {
        crate::i18n::tr(lang, &format!("category.{}", self.as_str()), None)
    }
}

impl fmt::Display for ShopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShopCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ShopCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown shop category: {}", s.trim()))
    }
}

/// Unvalidated input of the create-shop form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopDraft {
    pub name: String,
    pub category: Option<ShopCategory>,
    pub location: String,
}

/// Body of `POST /shops`, built only from a draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub category: ShopCategory,
    pub location: String,
}

/// Shop record as persisted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    #[serde(deserialize_with = "super::notification::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub shop_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
