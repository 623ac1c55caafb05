//! Per-slot overlap between the organizer and invited friends.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::models::{AvailabilityLevel, OverlapRequest, OverlapResponse, SlotOverlap};
use crate::common::{ApiError, ApiResult};

pub const FULL_RATIO: f64 = 0.8;
pub const PARTIAL_RATIO: f64 = 0.4;
pub const BEST_SLOT_COUNT: usize = 3;

/// Parse a `YYYY-MM-DD-HH` slot key.
pub fn parse_slot(slot: &str) -> Option<NaiveDateTime> {
    let (date, hour) = slot.rsplit_once('-')?;
    if hour.len() != 2 {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(hour, 0, 0)
}

pub fn level_for(available: usize, total: usize) -> AvailabilityLevel {
    let ratio = if total == 0 {
        0.0
    } else {
        available as f64 / total as f64
    };
    if ratio >= FULL_RATIO {
        AvailabilityLevel::Full
    } else if ratio >= PARTIAL_RATIO {
        AvailabilityLevel::Partial
    } else {
        AvailabilityLevel::Empty
    }
}

/// Score one slot. With nobody invited only the organizer counts, so the
/// level is either full or empty.
pub fn score_slot(request: &OverlapRequest, slot: &str) -> SlotOverlap {
    let organizer = request.availability.get(slot).copied().unwrap_or(false);
    let friends = request
        .invited_friends
        .iter()
        .filter(|id| {
            request
                .friend_availabilities
                .get(id.as_str())
                .and_then(|slots| slots.get(slot))
                .copied()
                .unwrap_or(false)
        })
        .count();

    let available = usize::from(organizer) + friends;
    let total = request.invited_friends.len() + 1;
    let level = if request.invited_friends.is_empty() {
        if organizer {
            AvailabilityLevel::Full
        } else {
            AvailabilityLevel::Empty
        }
    } else {
        level_for(available, total)
    };

    SlotOverlap {
        slot: slot.to_string(),
        level,
        available,
        total,
    }
}

fn candidate_slots(request: &OverlapRequest) -> ApiResult<Vec<(NaiveDateTime, String)>> {
    if let Some(slots) = &request.slots {
        return slots
            .iter()
            .map(|s| {
                parse_slot(s)
                    .map(|at| (at, s.clone()))
                    .ok_or_else(|| ApiError::Validation(format!("Invalid slot: {}", s)))
            })
            .collect();
    }

    let mut keys: BTreeSet<&String> = request.availability.keys().collect();
    for id in &request.invited_friends {
        if let Some(slots) = request.friend_availabilities.get(id) {
            keys.extend(slots.keys());
        }
    }
    Ok(keys
        .into_iter()
        .filter_map(|s| match parse_slot(s) {
            Some(at) => Some((at, s.clone())),
            None => {
                debug!(slot = %s, "Skipping malformed slot key");
                None
            }
        })
        .collect())
}

pub fn compute_overlap(request: &OverlapRequest) -> ApiResult<OverlapResponse> {
    let mut slots = candidate_slots(request)?;
    slots.sort();
    slots.dedup();

    let scored: Vec<(NaiveDateTime, SlotOverlap)> = slots
        .into_iter()
        .map(|(at, slot)| (at, score_slot(request, &slot)))
        .collect();

    let mut ranked: Vec<&(NaiveDateTime, SlotOverlap)> =
        scored.iter().filter(|(_, s)| s.available > 0).collect();
    ranked.sort_by(|(a_at, a), (b_at, b)| {
        b.ratio()
            .total_cmp(&a.ratio())
            .then_with(|| a_at.cmp(b_at))
    });
    let best = ranked
        .into_iter()
        .take(BEST_SLOT_COUNT)
        .map(|(_, s)| s.clone())
        .collect();

    Ok(OverlapResponse {
        slots: scored.into_iter().map(|(_, s)| s).collect(),
        best,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> OverlapRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_slot() {
        assert!(parse_slot("2026-10-23-19").is_some());
        assert!(parse_slot("2026-10-23-24").is_none());
        assert!(parse_slot("2026-13-01-10").is_none());
        assert!(parse_slot("2026-10-23").is_none());
        assert!(parse_slot("tomorrow").is_none());
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(level_for(4, 5), AvailabilityLevel::Full);
        assert_eq!(level_for(2, 5), AvailabilityLevel::Partial);
        assert_eq!(level_for(1, 3), AvailabilityLevel::Empty);
        assert_eq!(level_for(0, 0), AvailabilityLevel::Empty);
    }

    #[test]
    fn test_no_invitees_uses_organizer_only() {
        let req = request(json!({
            "availability": {"2026-10-23-18": true, "2026-10-23-19": false},
            "friendAvailabilities": {"f1": {"2026-10-23-19": true}},
            "invitedFriends": []
        }));

        let response = compute_overlap(&req).unwrap();

        assert_eq!(response.slots.len(), 2);
        assert_eq!(response.slots[0].level, AvailabilityLevel::Full);
        assert_eq!(response.slots[1].level, AvailabilityLevel::Empty);
        assert_eq!(response.best.len(), 1);
        assert_eq!(response.best[0].slot, "2026-10-23-18");
    }

    #[test]
    fn test_ratio_with_invitees() {
        let req = request(json!({
            "availability": {"2026-10-23-18": true, "2026-10-23-19": true, "2026-10-23-20": false},
            "friendAvailabilities": {
                "f1": {"2026-10-23-18": true, "2026-10-23-19": false},
                "f2": {"2026-10-23-18": true},
                "f3": {"2026-10-23-20": true}
            },
            "invitedFriends": ["f1", "f2"]
        }));

        let response = compute_overlap(&req).unwrap();
        let levels: Vec<_> = response.slots.iter().map(|s| (s.slot.as_str(), s.level)).collect();

        assert_eq!(
            levels,
            vec![
                ("2026-10-23-18", AvailabilityLevel::Full),
                ("2026-10-23-19", AvailabilityLevel::Empty),
                ("2026-10-23-20", AvailabilityLevel::Empty),
            ]
        );
        assert_eq!(response.slots[0].available, 3);
        assert_eq!(response.slots[0].total, 3);
    }

    #[test]
    fn test_best_slots_break_ties_by_time() {
        let req = request(json!({
            "availability": {"2026-10-24-12": true, "2026-10-23-20": true, "2026-10-23-19": true, "2026-10-23-18": true},
            "invitedFriends": []
        }));

        let best: Vec<String> = compute_overlap(&req).unwrap().best.into_iter().map(|s| s.slot).collect();

        assert_eq!(best, vec!["2026-10-23-18", "2026-10-23-19", "2026-10-23-20"]);
    }

    #[test]
    fn test_explicit_slots_are_validated() {
        let req = request(json!({"slots": ["2026-10-23-19", "later"]}));
        assert!(matches!(compute_overlap(&req), Err(ApiError::Validation(_))));

        let req = request(json!({"slots": ["2026-10-23-19"]}));
        let response = compute_overlap(&req).unwrap();
        assert_eq!(response.slots[0].level, AvailabilityLevel::Empty);
        assert!(response.best.is_empty());
    }
}
