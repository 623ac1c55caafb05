//! Merging candidates into a de-duplicated restaurant list.

use crate::images;
use crate::record::{CandidateRecord, RestaurantRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Appended,
    Replaced,
}

/// Merge one candidate into `list`, keyed by record id.
///
/// A matching record is replaced by the candidate's data. Fields the
/// candidate did not report keep their existing values, and images or an
/// overview already on the record survive a candidate that lacks usable ones.
pub fn merge_candidate(list: &mut Vec<RestaurantRecord>, candidate: CandidateRecord) -> MergeOutcome {
    let id = candidate.id();
    match list.iter_mut().find(|r| r.id == id) {
        Some(existing) => {
            *existing = merged(existing, candidate);
            MergeOutcome::Replaced
        }
        None => {
            list.push(candidate.into_record());
            MergeOutcome::Appended
        }
    }
}

fn merged(existing: &RestaurantRecord, candidate: CandidateRecord) -> RestaurantRecord {
    let image = candidate
        .image
        .filter(|url| images::is_valid_image_url(url))
        .unwrap_or_else(|| existing.image.clone());

    let menu_images = match images::valid_images(&candidate.menu_images) {
        photos if photos.is_empty() => existing.menu_images.clone(),
        photos => photos,
    };

    RestaurantRecord {
        id: existing.id.clone(),
        name: candidate.name.unwrap_or_else(|| existing.name.clone()),
        address: candidate.address.unwrap_or_else(|| existing.address.clone()),
        price_range: candidate.price_range.unwrap_or(existing.price_range),
        rating: candidate.rating.unwrap_or(existing.rating),
        category: candidate.category.unwrap_or_else(|| existing.category.clone()),
        image,
        menu_images,
        reviews: existing.reviews.clone(),
        overview: candidate.overview.or_else(|| existing.overview.clone()),
    }
}
