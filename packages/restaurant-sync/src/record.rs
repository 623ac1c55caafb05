//! Restaurant records and the partial candidates producers deliver.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::images;

pub const UNKNOWN_NAME: &str = "Unknown Restaurant";
pub const UNKNOWN_ADDRESS: &str = "Address not available";
pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_RATING: f64 = 4.0;

/// Price tier, serialized as `$` through `$$$$`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "$")]
    Budget,
    #[default]
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Upscale,
    #[serde(rename = "$$$$")]
    Luxury,
}

impl PriceRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceRange::Budget => "$",
            PriceRange::Moderate => "$$",
            PriceRange::Upscale => "$$$",
            PriceRange::Luxury => "$$$$",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "$" => Some(PriceRange::Budget),
            "$$" => Some(PriceRange::Moderate),
            "$$$" => Some(PriceRange::Upscale),
            "$$$$" => Some(PriceRange::Luxury),
            _ => None,
        }
    }

    fn from_tier(tier: u64) -> Option<Self> {
        match tier {
            1 => Some(PriceRange::Budget),
            2 => Some(PriceRange::Moderate),
            3 => Some(PriceRange::Upscale),
            4 => Some(PriceRange::Luxury),
            _ => None,
        }
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A restaurant as shown in the feed and stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub menu_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

fn default_rating() -> f64 {
    DEFAULT_RATING
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Lowercase, collapse every run of non-alphanumerics into one `-`, trim dashes.
pub fn normalize_key(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Dedup key: `normalize(name)-normalize(address)`.
pub fn record_id(name: &str, address: &str) -> String {
    format!("{}-{}", normalize_key(name), normalize_key(address))
}

/// Cache and feed key for a search query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Partial restaurant data from one producer.
///
/// Absent fields are `None` so a merge can tell "not reported" apart from a
/// reported value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub price_range: Option<PriceRange>,
    pub rating: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub menu_images: Vec<String>,
    pub overview: Option<String>,
}

impl CandidateRecord {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: non_blank(name.into()),
            address: non_blank(address.into()),
            ..Default::default()
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = valid_rating(rating);
        self
    }

    pub fn with_price(mut self, price: PriceRange) -> Self {
        self.price_range = Some(price);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = non_blank(image.into());
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = non_blank(overview.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    pub fn display_address(&self) -> &str {
        self.address.as_deref().unwrap_or(UNKNOWN_ADDRESS)
    }

    pub fn id(&self) -> String {
        record_id(self.display_name(), self.display_address())
    }

    /// Read one extracted JSON object.
    ///
    /// Field names vary between extraction runs, so a few aliases are
    /// accepted. Returns `None` for anything that is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let obj = match ["record", "data"].iter().find_map(|k| obj.get(*k)?.as_object()) {
            Some(inner) if !obj.contains_key("name") => inner,
            _ => obj,
        };

        let photos = match obj.get("photos").or_else(|| obj.get("menuImages")) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(single)) => vec![single.clone()],
            _ => Vec::new(),
        };

        let price_range = match first_field(obj, &["price", "price_range", "priceRange"]) {
            Some(Value::String(s)) => PriceRange::parse(s),
            Some(Value::Number(n)) => n.as_u64().and_then(PriceRange::from_tier),
            _ => None,
        };

        let rating = match obj.get("rating") {
            Some(Value::Number(n)) => n.as_f64().and_then(valid_rating),
            _ => None,
        };

        Some(Self {
            name: string_field(obj, &["name", "restaurant_name", "restaurantName"]),
            address: string_field(obj, &["address"]),
            price_range,
            rating,
            category: string_field(obj, &["cuisine", "category"]),
            image: string_field(obj, &["image", "imageUrl", "image_url"]),
            menu_images: photos,
            overview: string_field(obj, &["overview", "description"]),
        })
    }

    /// Build a full record, applying sentinels and image fallbacks.
    pub fn into_record(self) -> RestaurantRecord {
        let id = self.id();
        let category = self.category.unwrap_or_else(default_category);
        let image = images::restaurant_image(self.image.as_deref(), Some(&category), &id);
        let menu_images = images::restaurant_menu_images(&self.menu_images, Some(&category), &id);

        RestaurantRecord {
            id,
            name: self.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            address: self.address.unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
            price_range: self.price_range.unwrap_or_default(),
            rating: self.rating.unwrap_or(DEFAULT_RATING),
            category,
            image,
            menu_images,
            reviews: Vec::new(),
            overview: self.overview,
        }
    }
}

fn valid_rating(rating: f64) -> Option<f64> {
    (rating.is_finite() && (0.0..=5.0).contains(&rating)).then_some(rating)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn first_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k)?.as_str().map(str::to_string).and_then(non_blank))
}
