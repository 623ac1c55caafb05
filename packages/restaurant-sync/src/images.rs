//! Image URL validation and category-keyed fallback assets.
//!
//! Every pick is a pure function of a seed string (normally the record id),
//! so the same restaurant always renders with the same fallback image.

use sha2::{Digest, Sha256};

const SUSHI_IMAGES: [&str; 3] = [
    "/assets/sushi/sushi0.jpg",
    "/assets/sushi/sushi1.jpg",
    "/assets/sushi/sushi2.jpg",
];

const BURGER_IMAGES: [&str; 3] = [
    "/assets/burgor/burgor0.jpg",
    "/assets/burgor/burgor1.jpg",
    "/assets/burgor/burgor2.jpg",
];

const ITALIAN_IMAGE: &str = "/assets/italian-restaurant.jpg";
const PIZZA_IMAGE: &str = "/assets/pizza-restaurant.jpg";

/// Stable index into a table of `len` entries.
pub fn seeded_index(seed: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let digest = Sha256::digest(seed.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % len as u64) as usize
}

fn pick<'a>(table: &[&'a str], seed: &str) -> &'a str {
    table[seeded_index(seed, table.len())]
}

/// Accepts `http(s)://`, `data:image/` and relative asset paths.
pub fn is_valid_image_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    if url.starts_with("data:image/") {
        return true;
    }
    if url.starts_with('/') || url.starts_with("./") || url.starts_with("../") {
        return true;
    }
    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
        Err(_) => false,
    }
}

/// Fallback cover image for a category.
pub fn fallback_image(category: Option<&str>, seed: &str) -> String {
    let Some(category) = category.map(|c| c.trim().to_lowercase()) else {
        let all: Vec<&str> = BURGER_IMAGES.iter().chain(SUSHI_IMAGES.iter()).copied().collect();
        return pick(&all, seed).to_string();
    };

    let image = match category.as_str() {
        "sushi" | "japanese" | "chinese" | "seafood" => pick(&SUSHI_IMAGES, seed),
        "italian" | "thai" | "indian" | "mediterranean" => ITALIAN_IMAGE,
        "pizza" => PIZZA_IMAGE,
        _ => pick(&BURGER_IMAGES, seed),
    };
    image.to_string()
}

/// Fallback menu gallery for a category.
pub fn fallback_menu_images(category: Option<&str>, seed: &str) -> Vec<String> {
    let burger = pick(&BURGER_IMAGES, seed);
    let images: Vec<&str> = match category.map(|c| c.trim().to_lowercase()).as_deref() {
        Some("sushi") | Some("japanese") => SUSHI_IMAGES.to_vec(),
        Some("burgers") | Some("american") => BURGER_IMAGES.to_vec(),
        Some("italian") => vec![ITALIAN_IMAGE, PIZZA_IMAGE, burger],
        Some("pizza") => vec![PIZZA_IMAGE, ITALIAN_IMAGE, burger],
        Some("chinese") | Some("seafood") => vec![pick(&SUSHI_IMAGES, seed), ITALIAN_IMAGE, burger],
        _ => vec![burger, ITALIAN_IMAGE, PIZZA_IMAGE],
    };
    images.into_iter().map(String::from).collect()
}

/// The given image when usable, otherwise the category fallback.
pub fn restaurant_image(image: Option<&str>, category: Option<&str>, seed: &str) -> String {
    match image.map(str::trim) {
        Some(url) if is_valid_image_url(url) => url.to_string(),
        _ => fallback_image(category, seed),
    }
}

/// Valid photos in their original order, or the category gallery when none survive.
pub fn restaurant_menu_images(photos: &[String], category: Option<&str>, seed: &str) -> Vec<String> {
    let valid = valid_images(photos);
    if valid.is_empty() {
        fallback_menu_images(category, seed)
    } else {
        valid
    }
}

pub(crate) fn valid_images(photos: &[String]) -> Vec<String> {
    photos
        .iter()
        .map(|p| p.trim())
        .filter(|p| is_valid_image_url(p))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(is_valid_image_url("https://cdn.example.com/a.jpg"));
        assert!(is_valid_image_url("http://example.com/a.png"));
        assert!(is_valid_image_url("data:image/png;base64,AAAA"));
        assert!(is_valid_image_url("/assets/sushi/sushi0.jpg"));
        assert!(is_valid_image_url("./photo.jpg"));
        assert!(is_valid_image_url("../photo.jpg"));

        assert!(!is_valid_image_url(""));
        assert!(!is_valid_image_url("   "));
        assert!(!is_valid_image_url("ftp://example.com/a.jpg"));
        assert!(!is_valid_image_url("not a url"));
        assert!(!is_valid_image_url("javascript:alert(1)"));
    }

    #[test]
    fn test_fallback_is_deterministic_per_seed() {
        let first = fallback_image(Some("Sushi"), "nagi-sushi-2208-st-joseph-blvd");
        let again = fallback_image(Some("Sushi"), "nagi-sushi-2208-st-joseph-blvd");

        assert_eq!(first, again);
        assert!(SUSHI_IMAGES.contains(&first.as_str()));
    }

    #[test]
    fn test_category_tables() {
        assert_eq!(fallback_image(Some("Italian"), "x"), ITALIAN_IMAGE);
        assert_eq!(fallback_image(Some("pizza"), "x"), PIZZA_IMAGE);
        assert_eq!(fallback_image(Some("Thai"), "x"), ITALIAN_IMAGE);
        assert!(BURGER_IMAGES.contains(&fallback_image(Some("Mexican"), "x").as_str()));
        assert!(BURGER_IMAGES.contains(&fallback_image(Some("Other"), "x").as_str()));
        assert!(SUSHI_IMAGES.contains(&fallback_image(Some("Seafood"), "x").as_str()));

        assert_eq!(fallback_menu_images(Some("Sushi"), "x").len(), 3);
        assert_eq!(fallback_menu_images(Some("Pizza"), "x")[0], PIZZA_IMAGE);
    }

    #[test]
    fn test_restaurant_image_prefers_valid_input() {
        assert_eq!(
            restaurant_image(Some(" https://img.example.com/a.jpg "), Some("Pizza"), "x"),
            "https://img.example.com/a.jpg"
        );
        assert_eq!(restaurant_image(Some("nope"), Some("Pizza"), "x"), PIZZA_IMAGE);
        assert_eq!(restaurant_image(None, Some("Pizza"), "x"), PIZZA_IMAGE);
    }

    #[test]
    fn test_menu_images_drop_invalid_entries() {
        let photos = vec![
            "garbage".to_string(),
            "https://img.example.com/1.jpg".to_string(),
        ];
        assert_eq!(
            restaurant_menu_images(&photos, Some("Sushi"), "x"),
            vec!["https://img.example.com/1.jpg".to_string()]
        );
        assert_eq!(
            restaurant_menu_images(&["bad".to_string()], Some("Sushi"), "x").len(),
            3
        );
    }

    #[test]
    fn test_seeded_index_bounds() {
        for seed in ["a", "b", "c", "restaurant-1", ""] {
            assert!(seeded_index(seed, 3) < 3);
        }
        assert_eq!(seeded_index("anything", 0), 0);
    }
}
