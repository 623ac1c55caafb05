use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Slot key (`YYYY-MM-DD-HH`) to availability.
pub type SlotMap = BTreeMap<String, bool>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapRequest {
    #[serde(default)]
    pub availability: SlotMap,
    #[serde(default)]
    pub friend_availabilities: BTreeMap<String, SlotMap>,
    #[serde(default)]
    pub invited_friends: Vec<String>,
    /// Slots to score; defaults to every slot mentioned by anyone involved
    pub slots: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityLevel {
    Full,
    Partial,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotOverlap {
    pub slot: String,
    pub level: AvailabilityLevel,
    pub available: usize,
    pub total: usize,
}

impl SlotOverlap {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.available as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapResponse {
    pub slots: Vec<SlotOverlap>,
    pub best: Vec<SlotOverlap>,
}
