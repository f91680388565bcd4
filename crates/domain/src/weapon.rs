//! Weapon record and its merge-patch companion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single guided-weapon record.
///
/// `name` is the identity key: at most one record per name exists in the
/// store, compared case-sensitively. `category` is a taxonomy code (see
/// [`crate::resolve`]); the store does not validate it against the registry,
/// unknown codes are simply never reachable through category browsing.
///
/// Everything beyond `name` and `category` is an opaque stat payload
/// (range, speed, guidance seeker details, ...) that differs per weapon
/// type. It is carried as a flattened JSON map and never inspected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(flatten)]
    pub stats: Map<String, Value>,
}

impl Weapon {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            stats: Map::new(),
        }
    }

    pub fn with_stat(mut self, key: impl Into<String>, value: Value) -> Self {
        self.stats.insert(key.into(), value);
        self
    }
}

/// Partial update for a [`Weapon`] with merge-patch semantics.
///
/// Only fields present in the patch are applied; everything else on the
/// existing record is left untouched. Stat keys are merged individually,
/// an incoming key overwrites the stored value for that key only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub stats: Map<String, Value>,
}

impl WeaponPatch {
    /// True when the patch carries no fields at all. Applying an empty
    /// patch to a matched record is still a successful update.
    pub fn is_noop(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.stats.is_empty()
    }

    /// Merge this patch onto an existing record.
    pub fn apply(&self, weapon: &mut Weapon) {
        if let Some(name) = &self.name {
            weapon.name = name.clone();
        }
        if let Some(category) = &self.category {
            weapon.category = category.clone();
        }
        for (key, value) in &self.stats {
            weapon.stats.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_json_fields_land_in_stats() {
        let weapon: Weapon = serde_json::from_value(json!({
            "name": "AIM-9L",
            "category": "ir-all-aspect",
            "mass_kg": 85.3,
            "seeker": "all-aspect IR"
        }))
        .unwrap();

        assert_eq!(weapon.name, "AIM-9L");
        assert_eq!(weapon.category, "ir-all-aspect");
        assert_eq!(weapon.stats.get("mass_kg"), Some(&json!(85.3)));
        assert_eq!(weapon.stats.get("seeker"), Some(&json!("all-aspect IR")));
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut weapon = Weapon::new("AIM-9L", "ir-all-aspect")
            .with_stat("mass_kg", json!(85.3))
            .with_stat("range_km", json!(18));

        let patch: WeaponPatch = serde_json::from_value(json!({
            "category": "ir-rear-aspect",
            "range_km": 22
        }))
        .unwrap();
        patch.apply(&mut weapon);

        assert_eq!(weapon.name, "AIM-9L");
        assert_eq!(weapon.category, "ir-rear-aspect");
        assert_eq!(weapon.stats.get("range_km"), Some(&json!(22)));
        // Untouched stat keeps its prior value
        assert_eq!(weapon.stats.get("mass_kg"), Some(&json!(85.3)));
    }

    #[test]
    fn empty_patch_is_noop() {
        let patch: WeaponPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_noop());

        let mut weapon = Weapon::new("AGM-65B", "tv-guided");
        let before = weapon.clone();
        patch.apply(&mut weapon);
        assert_eq!(weapon, before);
    }
}
