use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BillError, Result};
use crate::invoice::{normalize_gstin, ShopDetails};

/// A saved shop identity that can be loaded into new bills.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SavedShopProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gstin: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_default: bool,
}

impl SavedShopProfile {
    pub fn shop_details(&self) -> ShopDetails {
        ShopDetails::new(&self.name, &self.address, &self.gstin)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub name: String,
    pub address: String,
    pub gstin: String,
    pub is_default: bool,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub is_default: Option<bool>,
}

/// Contents of `profiles.toml`.
///
/// `default` is the source of truth for the default profile; the per-profile
/// `is_default` flags are kept in step with it so that at most one is set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProfileStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<String>,
    #[serde(default, rename = "profile")]
    profiles: Vec<SavedShopProfile>,
}

impl ProfileStore {
    pub fn list(&self) -> &[SavedShopProfile] {
        &self.profiles
    }

    pub fn get(&self, id: &str) -> Option<&SavedShopProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Rebuild the per-profile flags from the default pointer after loading a
    /// possibly hand-edited file. Without a valid pointer the first flagged
    /// profile wins.
    pub fn normalize(&mut self) {
        let default = self
            .default_profile()
            .or_else(|| self.profiles.iter().find(|p| p.is_default))
            .map(|p| p.id.clone());

        match default {
            Some(id) => self.mark_default(&id),
            None => self.clear_default(),
        }
    }

    /// The first profile saved into an empty store becomes the default.
    pub fn add(&mut self, profile: NewProfile, now: DateTime<Utc>) -> &SavedShopProfile {
        let mut millis = now.timestamp_millis();
        while self.get(&millis.to_string()).is_some() {
            millis += 1;
        }
        let id = millis.to_string();
        let make_default = profile.is_default || self.profiles.is_empty();

        self.profiles.push(SavedShopProfile {
            id: id.clone(),
            name: profile.name,
            address: profile.address,
            gstin: normalize_gstin(&profile.gstin),
            created_at: now,
            is_default: false,
        });
        if make_default {
            self.mark_default(&id);
        }

        tracing::debug!(id = %id, "added shop profile");
        let index = self.profiles.len() - 1;
        &self.profiles[index]
    }

    pub fn update(&mut self, id: &str, update: ProfileUpdate) -> Result<&SavedShopProfile> {
        let index = self.index_of(id)?;
        {
            let profile = &mut self.profiles[index];
            if let Some(name) = update.name {
                profile.name = name;
            }
            if let Some(address) = update.address {
                profile.address = address;
            }
            if let Some(gstin) = update.gstin {
                profile.gstin = normalize_gstin(&gstin);
            }
        }

        match update.is_default {
            Some(true) => self.mark_default(id),
            Some(false) if self.default.as_deref() == Some(id) => self.clear_default(),
            _ => {}
        }
        Ok(&self.profiles[index])
    }

    pub fn remove(&mut self, id: &str) -> Result<SavedShopProfile> {
        let index = self.index_of(id)?;
        let removed = self.profiles.remove(index);
        if self.default.as_deref() == Some(id) {
            self.clear_default();
        }
        tracing::debug!(id = %id, "removed shop profile");
        Ok(removed)
    }

    pub fn set_default(&mut self, id: &str) -> Result<()> {
        self.index_of(id)?;
        self.mark_default(id);
        Ok(())
    }

    /// The profile the default pointer refers to, if it still exists.
    pub fn default_profile(&self) -> Option<&SavedShopProfile> {
        self.default.as_deref().and_then(|id| self.get(id))
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| BillError::ProfileNotFound(id.to_string()))
    }

    fn mark_default(&mut self, id: &str) {
        for profile in &mut self.profiles {
            profile.is_default = profile.id == id;
        }
        self.default = Some(id.to_string());
    }

    fn clear_default(&mut self) {
        for profile in &mut self.profiles {
            profile.is_default = false;
        }
        self.default = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 10, 0, 0).unwrap()
    }

    fn shop(name: &str, is_default: bool) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            address: "MG Road, Pune".to_string(),
            gstin: "27aapfu0939f1zv".to_string(),
            is_default,
        }
    }

    fn defaults(store: &ProfileStore) -> usize {
        store.list().iter().filter(|p| p.is_default).count()
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut store = ProfileStore::default();
        let a = store.add(shop("A", false), now()).id.clone();
        let b = store.add(shop("B", false), now()).id.clone();
        assert_ne!(a, b);
        assert_eq!(a, now().timestamp_millis().to_string());
        assert_eq!(store.get(&b).unwrap().gstin, "27AAPFU0939F1ZV");
    }

    #[test]
    fn test_at_most_one_default() {
        let mut store = ProfileStore::default();
        let a = store.add(shop("A", true), now()).id.clone();
        let b = store.add(shop("B", true), now()).id.clone();
        assert_eq!(defaults(&store), 1);
        assert_eq!(store.default_profile().unwrap().id, b);

        store.set_default(&a).unwrap();
        assert_eq!(defaults(&store), 1);
        assert_eq!(store.default_profile().unwrap().id, a);

        store
            .update(
                &b,
                ProfileUpdate {
                    is_default: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(defaults(&store), 1);
        assert!(store.get(&b).unwrap().is_default);
    }

    #[test]
    fn test_first_profile_becomes_default() {
        let mut store = ProfileStore::default();
        let a = store.add(shop("A", false), now()).id.clone();
        assert_eq!(store.default_profile().unwrap().id, a);

        store.add(shop("B", false), now());
        assert_eq!(store.default_profile().unwrap().id, a);
        assert_eq!(defaults(&store), 1);
    }

    #[test]
    fn test_normalize_repairs_duplicate_flags() {
        let mut store: ProfileStore = toml::from_str(
            r#"
default = "2"

[[profile]]
id = "1"
name = "A"
created_at = "2026-10-15T10:00:00Z"
is_default = true

[[profile]]
id = "2"
name = "B"
created_at = "2026-10-15T10:00:00Z"
is_default = true
"#,
        )
        .unwrap();
        assert_eq!(defaults(&store), 2);

        store.normalize();
        assert_eq!(defaults(&store), 1);
        assert!(store.get("2").unwrap().is_default);
        assert_eq!(store.default_profile().unwrap().id, "2");
    }

    #[test]
    fn test_normalize_without_pointer() {
        let mut store: ProfileStore = toml::from_str(
            r#"
default = "gone"

[[profile]]
id = "1"
name = "A"
created_at = "2026-10-15T10:00:00Z"

[[profile]]
id = "2"
name = "B"
created_at = "2026-10-15T10:00:00Z"
is_default = true
"#,
        )
        .unwrap();
        store.normalize();
        assert_eq!(store.default_profile().unwrap().id, "2");
        assert_eq!(defaults(&store), 1);

        let mut none: ProfileStore = toml::from_str(
            "[[profile]]\nid = \"1\"\nname = \"A\"\ncreated_at = \"2026-10-15T10:00:00Z\"\n",
        )
        .unwrap();
        none.normalize();
        assert!(none.default_profile().is_none());
    }

    #[test]
    fn test_removing_default_clears_pointer() {
        let mut store = ProfileStore::default();
        let a = store.add(shop("A", true), now()).id.clone();
        store.add(shop("B", false), now());
        store.remove(&a).unwrap();
        assert!(store.default_profile().is_none());
        assert_eq!(defaults(&store), 0);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_unset_default_via_update() {
        let mut store = ProfileStore::default();
        let a = store.add(shop("A", true), now()).id.clone();
        store
            .update(
                &a,
                ProfileUpdate {
                    is_default: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(store.default_profile().is_none());
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = ProfileStore::default();
        let a = store.add(shop("A", false), now()).id.clone();
        let updated = store
            .update(
                &a,
                ProfileUpdate {
                    name: Some("Anand Kirana".to_string()),
                    gstin: Some("29abcde1234f1z5".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Anand Kirana");
        assert_eq!(updated.address, "MG Road, Pune");
        assert_eq!(updated.gstin, "29ABCDE1234F1Z5");
    }

    #[test]
    fn test_unknown_id() {
        let mut store = ProfileStore::default();
        assert!(matches!(
            store.set_default("nope"),
            Err(BillError::ProfileNotFound(_))
        ));
        assert!(store.remove("nope").is_err());
        assert!(store.update("nope", ProfileUpdate::default()).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut store = ProfileStore::default();
        store.add(shop("A", false), now());
        store.add(shop("B", true), now());
        let text = toml::to_string_pretty(&store).unwrap();
        let loaded: ProfileStore = toml::from_str(&text).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.default_profile().unwrap().name, "B");
    }

    #[test]
    fn test_profile_to_shop_details() {
        let mut store = ProfileStore::default();
        let details = store.add(shop("A", false), now()).shop_details();
        assert_eq!(details.name, "A");
        assert_eq!(details.gstin, "27AAPFU0939F1ZV");
    }
}
