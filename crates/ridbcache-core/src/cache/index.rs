//! Dual-key in-memory index.
//!
//! `DualIndexStore<T>` stores each item once, under its identifier, and keeps
//! a secondary `name -> id` map derived from the same item on every
//! mutation. Callers never touch either map directly, so lookups by id and
//! by name always resolve to the same stored value.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::models::{Campsite, Facility};

/// Which key a lookup or delete uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupType {
    Id,
    Name,
}

/// Extracts a key from an item.
pub type KeyFn<T> = fn(&T) -> &str;

#[derive(Clone)]
pub struct DualIndexStore<T> {
    by_id: HashMap<String, T>,
    by_name: HashMap<String, String>,
    id_of: KeyFn<T>,
    name_of: KeyFn<T>,
}

pub type FacilityIndex = DualIndexStore<Facility>;
pub type CampsiteIndex = DualIndexStore<Campsite>;

impl<T> DualIndexStore<T> {
    pub fn with_keys(id_of: KeyFn<T>, name_of: KeyFn<T>) -> Self {
        Self {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            id_of,
            name_of,
        }
    }

    /// Insert or overwrite `item` under both of its keys.
    ///
    /// If an item with the same id was stored under a different name, that
    /// stale name entry is dropped. A name already used by a different id is
    /// taken over by the new item.
    pub fn add(&mut self, item: T) -> &T {
        let id = (self.id_of)(&item).to_owned();
        let name = (self.name_of)(&item).to_owned();

        if let Some(previous) = self.by_id.get(&id) {
            let previous_name = (self.name_of)(previous);
            if previous_name != name && self.by_name.get(previous_name) == Some(&id) {
                self.by_name.remove(previous_name);
            }
        }

        self.by_name.insert(name, id.clone());
        match self.by_id.entry(id) {
            Entry::Occupied(mut slot) => {
                slot.insert(item);
                &*slot.into_mut()
            }
            Entry::Vacant(slot) => &*slot.insert(item),
        }
    }

    pub fn add_many<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add(item);
        }
    }

    pub fn get(&self, key: &str, by: LookupType) -> Option<&T> {
        match by {
            LookupType::Id => self.by_id.get(key),
            LookupType::Name => self.by_name.get(key).and_then(|id| self.by_id.get(id)),
        }
    }

    pub fn contains(&self, key: &str, by: LookupType) -> bool {
        match by {
            LookupType::Id => self.by_id.contains_key(key),
            LookupType::Name => self.by_name.contains_key(key),
        }
    }

    /// Remove the item found under `key` from both indexes.
    ///
    /// Returns the removed item; an absent key leaves the store unchanged.
    pub fn delete(&mut self, key: &str, by: LookupType) -> Option<T> {
        let id = match by {
            LookupType::Id => key.to_owned(),
            LookupType::Name => self.by_name.get(key)?.clone(),
        };

        let item = self.by_id.remove(&id)?;
        let name = (self.name_of)(&item);
        if self.by_name.get(name) == Some(&id) {
            self.by_name.remove(name);
        }
        Some(item)
    }

    /// Number of stored items, counted by identifier.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.by_id.values()
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.by_id.into_values()
    }

    /// Items ordered by identifier, for stable output.
    pub fn sorted_by_id(&self) -> Vec<&T> {
        let mut items: Vec<&T> = self.by_id.values().collect();
        items.sort_by(|a, b| (self.id_of)(a).cmp((self.id_of)(b)));
        items
    }
}

impl<T: fmt::Debug> fmt::Debug for DualIndexStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualIndexStore")
            .field("by_id", &self.by_id)
            .field("by_name", &self.by_name)
            .finish()
    }
}

impl<T: Serialize> Serialize for DualIndexStore<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted_by_id())
    }
}

impl DualIndexStore<Facility> {
    pub fn new() -> Self {
        Self::with_keys(Facility::id, Facility::name)
    }
}

impl Default for DualIndexStore<Facility> {
    fn default() -> Self {
        Self::new()
    }
}

impl DualIndexStore<Campsite> {
    pub fn new() -> Self {
        Self::with_keys(Campsite::id, Campsite::name)
    }

    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Campsite>,
    {
        let mut index = Self::new();
        index.add_many(items);
        index
    }
}

impl Default for DualIndexStore<Campsite> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        name: String,
        value: u32,
    }

    fn item(id: &str, name: &str, value: u32) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            value,
        }
    }

    fn item_id(item: &Item) -> &str {
        &item.id
    }

    fn item_name(item: &Item) -> &str {
        &item.name
    }

    fn store() -> DualIndexStore<Item> {
        DualIndexStore::with_keys(item_id, item_name)
    }

    /// Every stored item is reachable under its current name, and every name
    /// entry points at an item carrying that name.
    fn assert_consistent(store: &DualIndexStore<Item>) {
        for (name, id) in &store.by_name {
            let stored = store.by_id.get(id).expect("name entry points at a stored id");
            assert_eq!(&stored.name, name);
        }
        for stored in store.by_id.values() {
            let by_name = store.get(&stored.name, LookupType::Name);
            if let Some(by_name) = by_name {
                if by_name.id == stored.id {
                    assert!(std::ptr::eq(by_name, stored));
                }
            }
        }
    }

    #[test]
    fn test_get_by_id_and_name_returns_same_instance() {
        let mut s = store();
        s.add(item("1", "alpha", 1));
        s.add(item("2", "beta", 2));

        let by_id = s.get("1", LookupType::Id).expect("by id");
        let by_name = s.get("alpha", LookupType::Name).expect("by name");
        assert!(std::ptr::eq(by_id, by_name));
        assert_eq!(s.len(), 2);
        assert_consistent(&s);
    }

    #[test]
    fn test_add_returns_stored_item() {
        let mut s = store();
        let stored: *const Item = s.add(item("1", "alpha", 1));
        assert!(std::ptr::eq(stored, s.get("1", LookupType::Id).expect("stored")));
    }

    #[test]
    fn test_add_overwrites_same_id() {
        let mut s = store();
        s.add(item("1", "alpha", 1));
        s.add(item("1", "alpha", 7));

        assert_eq!(s.len(), 1);
        assert_eq!(s.get("alpha", LookupType::Name).map(|i| i.value), Some(7));
        assert_consistent(&s);
    }

    #[test]
    fn test_renamed_item_drops_stale_name() {
        let mut s = store();
        s.add(item("1", "alpha", 1));
        s.add(item("1", "omega", 2));

        assert_eq!(s.len(), 1);
        assert!(s.get("alpha", LookupType::Name).is_none());
        assert_eq!(s.get("omega", LookupType::Name).map(|i| i.value), Some(2));
        assert_consistent(&s);
    }

    #[test]
    fn test_name_collision_moves_name_to_newest_item() {
        let mut s = store();
        s.add(item("1", "shared", 1));
        s.add(item("2", "shared", 2));

        assert_eq!(s.len(), 2);
        assert_eq!(s.get("shared", LookupType::Name).map(|i| i.id.as_str()), Some("2"));

        // Deleting the older item must not take the newer one's name entry
        s.delete("1", LookupType::Id);
        assert_eq!(s.get("shared", LookupType::Name).map(|i| i.id.as_str()), Some("2"));
        assert_consistent(&s);
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let mut s = store();
        s.add(item("1", "alpha", 1));

        assert!(s.delete("missing", LookupType::Id).is_none());
        assert!(s.delete("missing", LookupType::Name).is_none());
        assert_eq!(s.len(), 1);
        assert!(s.get("1", LookupType::Id).is_some());
        assert!(s.get("alpha", LookupType::Name).is_some());
    }

    #[test]
    fn test_delete_by_id_removes_both_keys() {
        let mut s = store();
        s.add(item("1", "alpha", 1));
        s.add(item("2", "beta", 2));

        let removed = s.delete("1", LookupType::Id).expect("removed");
        assert_eq!(removed.name, "alpha");
        assert_eq!(s.len(), 1);
        assert!(s.get("1", LookupType::Id).is_none());
        assert!(s.get("alpha", LookupType::Name).is_none());
        assert!(s.get("beta", LookupType::Name).is_some());
        assert_consistent(&s);
    }

    #[test]
    fn test_delete_by_name_removes_both_keys() {
        let mut s = store();
        s.add(item("1", "alpha", 1));

        s.delete("alpha", LookupType::Name);
        assert!(s.is_empty());
        assert!(!s.contains("1", LookupType::Id));
        assert!(!s.contains("alpha", LookupType::Name));
    }

    #[test]
    fn test_add_many_and_ordering() {
        let mut s = store();
        s.add_many(vec![item("3", "c", 3), item("1", "a", 1), item("2", "b", 2)]);

        let ids: Vec<&str> = s.sorted_by_id().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(s.iter().count(), 3);
        assert_consistent(&s);
    }

    #[test]
    fn test_mixed_operation_sequence_stays_consistent() {
        let mut s = store();
        for round in 0..5u32 {
            for n in 0..10u32 {
                let id = n.to_string();
                let name = format!("site-{}", (n + round) % 7);
                s.add(item(&id, &name, round));
            }
            s.delete(&round.to_string(), LookupType::Id);
            s.delete(&format!("site-{}", round), LookupType::Name);
            assert_consistent(&s);
        }
    }

    #[test]
    fn test_serializes_as_sorted_array() {
        let campsites = CampsiteIndex::with_items(vec![
            Campsite::from_record(
                crate::models::CampsiteRecord {
                    id: "2".to_string(),
                    name: "B".to_string(),
                    ..Default::default()
                },
                "https://www.recreation.gov",
            ),
            Campsite::from_record(
                crate::models::CampsiteRecord {
                    id: "1".to_string(),
                    name: "A".to_string(),
                    ..Default::default()
                },
                "https://www.recreation.gov",
            ),
        ]);

        let json = serde_json::to_value(&campsites).expect("serializes");
        let ids: Vec<&str> = json
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|c| c["CampsiteID"].as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
