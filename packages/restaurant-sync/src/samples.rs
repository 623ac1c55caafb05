//! Built-in sample restaurants, shown when no live data arrives.

use crate::record::{normalize_query, record_id, PriceRange, RestaurantRecord};

/// Category chips offered next to the feed.
pub const CATEGORIES: [&str; 6] = ["All", "Burgers", "Sushi", "Italian", "Pizza", "Thai"];

struct Sample {
    name: &'static str,
    address: &'static str,
    price: PriceRange,
    rating: f64,
    category: &'static str,
    image: &'static str,
    menu: [&'static str; 3],
    reviews: [&'static str; 3],
}

const SUSHI_MENU: [&str; 3] = [
    "/assets/sushi/sushi0.jpg",
    "/assets/sushi/sushi1.jpg",
    "/assets/sushi/sushi2.jpg",
];
const BURGER_MENU: [&str; 3] = [
    "/assets/burgor/burgor0.jpg",
    "/assets/burgor/burgor1.jpg",
    "/assets/burgor/burgor2.jpg",
];
const ITALIAN_MENU: [&str; 3] = [
    "/assets/italian-restaurant.jpg",
    "/assets/pizza-restaurant.jpg",
    "/assets/burgor/burgor0.jpg",
];
const GENERIC_REVIEWS: [&str; 3] = [
    "Burgers are juicy and cooked perfectly every time.",
    "Fries are crispy, but the wait can be long on weekends.",
    "Good value for the portion sizes and quality.",
];

const SAMPLES: [Sample; 5] = [
    Sample {
        name: "Nagi Sushi",
        address: "2208 St Joseph Blvd",
        price: PriceRange::Moderate,
        rating: 4.5,
        category: "Sushi",
        image: "/assets/sushi/sushi0.jpg",
        menu: SUSHI_MENU,
        reviews: [
            "Fish tastes very fresh and the rolls are nicely balanced.",
            "Service is quick, but it gets crowded during dinner hours.",
            "Great variety of rolls and the presentation is beautiful.",
        ],
    },
    Sample {
        name: "Burger Republic",
        address: "145 Bank Street",
        price: PriceRange::Moderate,
        rating: 4.3,
        category: "Burgers",
        image: "/assets/burgor/burgor0.jpg",
        menu: BURGER_MENU,
        reviews: GENERIC_REVIEWS,
    },
    Sample {
        name: "Trattoria Italiana",
        address: "88 Preston Street",
        price: PriceRange::Upscale,
        rating: 4.7,
        category: "Italian",
        image: "/assets/italian-restaurant.jpg",
        menu: ITALIAN_MENU,
        reviews: GENERIC_REVIEWS,
    },
    Sample {
        name: "Napoli Pizza",
        address: "320 Rideau Street",
        price: PriceRange::Moderate,
        rating: 4.4,
        category: "Pizza",
        image: "/assets/pizza-restaurant.jpg",
        menu: ITALIAN_MENU,
        reviews: GENERIC_REVIEWS,
    },
    Sample {
        name: "Sushi Garden",
        address: "456 Elgin Street",
        price: PriceRange::Upscale,
        rating: 4.6,
        category: "Sushi",
        image: "/assets/sushi/sushi0.jpg",
        menu: SUSHI_MENU,
        reviews: GENERIC_REVIEWS,
    },
];

impl Sample {
    fn to_record(&self) -> RestaurantRecord {
        RestaurantRecord {
            id: record_id(self.name, self.address),
            name: self.name.to_string(),
            address: self.address.to_string(),
            price_range: self.price,
            rating: self.rating,
            category: self.category.to_string(),
            image: self.image.to_string(),
            menu_images: self.menu.iter().map(|s| s.to_string()).collect(),
            reviews: self.reviews.iter().map(|s| s.to_string()).collect(),
            overview: None,
        }
    }
}

/// The full sample set.
pub fn sample_restaurants() -> Vec<RestaurantRecord> {
    SAMPLES.iter().map(Sample::to_record).collect()
}

/// Samples whose category matches the query, or all of them when none do.
///
/// A query matches a category when it equals it or mentions it, ignoring
/// case ("sushi", "best sushi downtown").
pub fn fallback_for_query(query: &str) -> Vec<RestaurantRecord> {
    let query = normalize_query(query);
    let all = sample_restaurants();
    if query.is_empty() {
        return all;
    }

    let matched: Vec<RestaurantRecord> = all
        .iter()
        .filter(|r| {
            let category = r.category.to_lowercase();
            query == category || query.contains(&category)
        })
        .cloned()
        .collect();

    if matched.is_empty() {
        all
    } else {
        matched
    }
}

/// Samples in the given category, case-insensitively.
pub fn samples_in_category(category: &str) -> Vec<RestaurantRecord> {
    sample_restaurants()
        .into_iter()
        .filter(|r| r.category.eq_ignore_ascii_case(category.trim()))
        .collect()
}

/// Up to three samples sharing `category`, excluding `id`.
pub fn similar_restaurants(id: &str, category: &str) -> Vec<RestaurantRecord> {
    samples_in_category(category)
        .into_iter()
        .filter(|r| r.id != id)
        .take(3)
        .collect()
}
