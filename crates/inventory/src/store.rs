use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stockbook_core::{Aggregate, DomainError, DomainResult};

/// Threshold used by the low-stock query when the caller has no preference.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// In-memory inventory: item name -> quantity, in insertion order.
///
/// Every stored quantity is strictly positive. Entries that would drop to
/// zero or below are removed instead.
///
/// Single owner, no interior locking. Callers thread `&mut InventoryStore`
/// through mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStore {
    items: IndexMap<String, i64>,
    version: u64,
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub name: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub name: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub name: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRemoved {
    pub name: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved (entry deleted because its quantity reached zero or below).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemAdded(ItemAdded),
    StockRemoved(StockRemoved),
    ItemRemoved(ItemRemoved),
}

impl InventoryEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded(_) => "inventory.item.added",
            InventoryEvent::StockRemoved(_) => "inventory.item.stock_removed",
            InventoryEvent::ItemRemoved(_) => "inventory.item.removed",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemAdded(e) => e.occurred_at,
            InventoryEvent::StockRemoved(e) => e.occurred_at,
            InventoryEvent::ItemRemoved(e) => e.occurred_at,
        }
    }

    pub fn item_name(&self) -> &str {
        match self {
            InventoryEvent::ItemAdded(e) => &e.name,
            InventoryEvent::StockRemoved(e) => &e.name,
            InventoryEvent::ItemRemoved(e) => &e.name,
        }
    }
}

/// Log-entry rendering, e.g. `2026-10-16 09:12:01 UTC: Added 10 of apple`.
impl core::fmt::Display for InventoryEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InventoryEvent::ItemAdded(e) => {
                write!(f, "{}: Added {} of {}", e.occurred_at, e.quantity, e.name)
            }
            InventoryEvent::StockRemoved(e) => {
                write!(f, "{}: Removed {} of {}", e.occurred_at, e.quantity, e.name)
            }
            InventoryEvent::ItemRemoved(e) => {
                write!(f, "{}: Removed {} from inventory", e.occurred_at, e.name)
            }
        }
    }
}

/// Result of a successful `remove_item`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The item is still held with `remaining` units.
    Decremented { remaining: i64 },
    /// The quantity reached zero or below and the entry was deleted.
    Removed,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `name` (any sign), creating the entry if absent.
    ///
    /// Returns the applied events. A negative add that leaves the entry at
    /// zero or below deletes it.
    pub fn add_item(&mut self, name: &str, quantity: i64) -> DomainResult<Vec<InventoryEvent>> {
        self.execute(&InventoryCommand::AddItem(AddItem {
            name: name.to_string(),
            quantity,
            occurred_at: Utc::now(),
        }))
    }

    /// Like [`add_item`](Self::add_item), appending a timestamped description
    /// of the add to `log`. Nothing is logged when validation fails.
    pub fn add_item_logged<L>(
        &mut self,
        name: &str,
        quantity: i64,
        log: &mut L,
    ) -> DomainResult<Vec<InventoryEvent>>
    where
        L: Extend<String>,
    {
        let events = self.add_item(name, quantity)?;
        log.extend(
            events
                .iter()
                .filter(|e| matches!(e, InventoryEvent::ItemAdded(_)))
                .map(ToString::to_string),
        );
        Ok(events)
    }

    /// Remove `quantity` units of `name`.
    ///
    /// Fails with `Validation` for a negative quantity and `NotFound` when the
    /// item is not held; the store is untouched in both cases.
    pub fn remove_item(&mut self, name: &str, quantity: i64) -> DomainResult<RemoveOutcome> {
        let events = self.execute(&InventoryCommand::RemoveItem(RemoveItem {
            name: name.to_string(),
            quantity,
            occurred_at: Utc::now(),
        }))?;

        let removed = events
            .iter()
            .any(|e| matches!(e, InventoryEvent::ItemRemoved(_)));
        if removed {
            Ok(RemoveOutcome::Removed)
        } else {
            Ok(RemoveOutcome::Decremented {
                remaining: self.get_quantity(name),
            })
        }
    }

    /// Stored quantity, or 0 when the item is not held.
    pub fn get_quantity(&self, name: &str) -> i64 {
        self.items.get(name).copied().unwrap_or(0)
    }

    /// Names whose quantity is strictly below `threshold`, in insertion order.
    pub fn check_low_items(&self, threshold: i64) -> Vec<&str> {
        self.items
            .iter()
            .filter(|(_, qty)| **qty < threshold)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.items.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    /// Read-only view of the underlying ordered map.
    pub fn items(&self) -> &IndexMap<String, i64> {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.version = 0;
    }

    /// Replace the whole map (clear-then-fill). Resets the version.
    ///
    /// Callers are expected to pass only positive quantities.
    pub(crate) fn replace_contents(&mut self, items: IndexMap<String, i64>) {
        debug_assert!(items.values().all(|qty| *qty > 0));
        self.items = items;
        self.version = 0;
    }

    fn handle_add(&self, cmd: &AddItem) -> DomainResult<Vec<InventoryEvent>> {
        if cmd.name.is_empty() {
            return Err(DomainError::validation("Item must be a non-empty string"));
        }

        let current = self.get_quantity(&cmd.name);
        let new_qty = current
            .checked_add(cmd.quantity)
            .ok_or_else(|| DomainError::validation("Quantity overflows the stored total"))?;

        let mut events = vec![InventoryEvent::ItemAdded(ItemAdded {
            name: cmd.name.clone(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })];
        if new_qty <= 0 {
            events.push(InventoryEvent::ItemRemoved(ItemRemoved {
                name: cmd.name.clone(),
                occurred_at: cmd.occurred_at,
            }));
        }
        Ok(events)
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> DomainResult<Vec<InventoryEvent>> {
        if cmd.quantity < 0 {
            return Err(DomainError::validation(
                "Quantity must be a non-negative integer",
            ));
        }

        let Some(current) = self.items.get(&cmd.name).copied() else {
            return Err(DomainError::not_found(cmd.name.clone()));
        };

        // current > 0 and quantity >= 0, so this cannot underflow.
        let new_qty = current - cmd.quantity;

        let mut events = vec![InventoryEvent::StockRemoved(StockRemoved {
            name: cmd.name.clone(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })];
        if new_qty <= 0 {
            events.push(InventoryEvent::ItemRemoved(ItemRemoved {
                name: cmd.name.clone(),
                occurred_at: cmd.occurred_at,
            }));
        }
        Ok(events)
    }
}

impl Aggregate for InventoryStore {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemAdded(e) => {
                let qty = self.items.entry(e.name.clone()).or_insert(0);
                *qty = qty.saturating_add(e.quantity);
            }
            InventoryEvent::StockRemoved(e) => {
                if let Some(qty) = self.items.get_mut(&e.name) {
                    *qty = qty.saturating_sub(e.quantity);
                }
            }
            InventoryEvent::ItemRemoved(e) => {
                self.items.shift_remove(&e.name);
            }
        }

        // Events not produced by `handle` may still drive an entry to <= 0.
        let name = event.item_name();
        if self.items.get(name).is_some_and(|qty| *qty <= 0) {
            self.items.shift_remove(name);
        }

        debug!(
            event_type = event.event_type(),
            item = event.item_name(),
            quantity = self.get_quantity(event.item_name()),
            "inventory event applied"
        );

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddItem(cmd) => self.handle_add(cmd),
            InventoryCommand::RemoveItem(cmd) => self.handle_remove(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stocked() -> InventoryStore {
        let mut store = InventoryStore::new();
        store.add_item("apple", 10).unwrap();
        store.add_item("banana", 5).unwrap();
        store
    }

    #[test]
    fn add_creates_then_accumulates() {
        let mut store = InventoryStore::new();
        store.add_item("apple", 10).unwrap();
        store.add_item("apple", 4).unwrap();
        assert_eq!(store.get_quantity("apple"), 14);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_rejects_empty_name() {
        let mut store = InventoryStore::new();
        let err = store.add_item("", 3).unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn whitespace_name_is_a_valid_key() {
        let mut store = InventoryStore::new();
        store.add_item(" ", 3).unwrap();
        assert_eq!(store.get_quantity(" "), 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn negative_add_decrements_existing_stock() {
        let mut store = stocked();
        store.add_item("apple", -4).unwrap();
        assert_eq!(store.get_quantity("apple"), 6);
    }

    #[test]
    fn negative_add_to_zero_deletes_entry() {
        let mut store = stocked();
        let events = store.add_item("banana", -5).unwrap();
        assert!(matches!(events.last(), Some(InventoryEvent::ItemRemoved(_))));
        assert!(!store.contains("banana"));
        assert_eq!(store.get_quantity("banana"), 0);
    }

    #[test]
    fn zero_or_negative_add_of_absent_item_stores_nothing() {
        let mut store = InventoryStore::new();
        store.add_item("ghost", 0).unwrap();
        store.add_item("ghost", -2).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn add_overflow_is_rejected() {
        let mut store = InventoryStore::new();
        store.add_item("bolts", i64::MAX).unwrap();
        let err = store.add_item("bolts", 1).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.get_quantity("bolts"), i64::MAX);
    }

    #[test]
    fn add_logged_appends_one_entry_per_add() {
        let mut store = InventoryStore::new();
        let mut log = Vec::new();
        store.add_item_logged("apple", 10, &mut log).unwrap();
        store.add_item_logged("banana", 5, &mut log).unwrap();
        let _ = store.add_item_logged("", 5, &mut log);

        assert_eq!(log.len(), 2);
        assert!(log[0].ends_with(": Added 10 of apple"));
        assert!(log[1].ends_with(": Added 5 of banana"));
    }

    #[test]
    fn remove_decrements() {
        let mut store = stocked();
        let outcome = store.remove_item("apple", 3).unwrap();
        assert_eq!(outcome, RemoveOutcome::Decremented { remaining: 7 });
        assert_eq!(store.get_quantity("apple"), 7);
    }

    #[test]
    fn remove_below_zero_deletes_entry() {
        let mut store = stocked();
        store.remove_item("apple", 3).unwrap();
        let outcome = store.remove_item("apple", 10).unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(store.get_quantity("apple"), 0);
        assert!(!store.contains("apple"));
    }

    #[test]
    fn remove_exact_quantity_deletes_entry() {
        let mut store = stocked();
        assert_eq!(store.remove_item("banana", 5).unwrap(), RemoveOutcome::Removed);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_zero_keeps_entry() {
        let mut store = stocked();
        let outcome = store.remove_item("banana", 0).unwrap();
        assert_eq!(outcome, RemoveOutcome::Decremented { remaining: 5 });
    }

    #[test]
    fn remove_missing_item_is_not_found_and_store_unchanged() {
        let mut store = stocked();
        let before = store.clone();
        let err = store.remove_item("orange", 1).unwrap_err();
        assert_eq!(err, DomainError::not_found("orange"));
        assert_eq!(store, before);
    }

    #[test]
    fn remove_negative_quantity_is_rejected() {
        let mut store = stocked();
        let before = store.clone();
        let err = store.remove_item("apple", -1).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store, before);
    }

    #[test]
    fn low_items_are_strictly_below_threshold_in_insertion_order() {
        let mut store = stocked();
        store.remove_item("apple", 3).unwrap();

        assert!(store.check_low_items(DEFAULT_LOW_STOCK_THRESHOLD).is_empty());
        assert_eq!(store.check_low_items(6), vec!["banana"]);
        assert_eq!(store.check_low_items(8), vec!["apple", "banana"]);
    }

    #[test]
    fn removal_keeps_order_of_remaining_items() {
        let mut store = InventoryStore::new();
        for name in ["a", "b", "c"] {
            store.add_item(name, 1).unwrap();
        }
        store.remove_item("b", 1).unwrap();
        store.add_item("b", 1).unwrap();
        let names: Vec<_> = store.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn handle_does_not_mutate() {
        let store = stocked();
        let before = store.clone();
        let cmd = InventoryCommand::RemoveItem(RemoveItem {
            name: "apple".to_string(),
            quantity: 100,
            occurred_at: Utc::now(),
        });
        let events = store.handle(&cmd).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(store, before);
    }

    #[test]
    fn apply_prunes_entries_that_reach_zero_or_below() {
        let mut store = stocked();
        store.apply(&InventoryEvent::ItemAdded(ItemAdded {
            name: "cherry".to_string(),
            quantity: -3,
            occurred_at: Utc::now(),
        }));
        store.apply(&InventoryEvent::StockRemoved(StockRemoved {
            name: "banana".to_string(),
            quantity: 9,
            occurred_at: Utc::now(),
        }));

        assert!(!store.contains("cherry"));
        assert!(!store.contains("banana"));
        assert!(store.iter().all(|(_, qty)| qty > 0));
        assert_eq!(store.version(), 4);
    }

    #[test]
    fn version_counts_applied_events() {
        let mut store = stocked();
        assert_eq!(store.version(), 2);
        store.remove_item("banana", 5).unwrap();
        assert_eq!(store.version(), 4);
        store.clear();
        assert_eq!(store.version(), 0);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(String, i64),
            Remove(String, i64),
        }

        fn op() -> impl Strategy<Value = Op> {
            let name = prop_oneof![
                Just("apple".to_string()),
                Just("banana".to_string()),
                Just("cherry".to_string()),
                Just(String::new()),
            ];
            (name, -50i64..50, any::<bool>()).prop_map(|(name, qty, add)| {
                if add {
                    Op::Add(name, qty)
                } else {
                    Op::Remove(name, qty)
                }
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: no entry is ever stored at zero or below.
            #[test]
            fn stored_quantities_stay_positive(ops in prop::collection::vec(op(), 0..60)) {
                let mut store = InventoryStore::new();
                for op in ops {
                    let _ = match op {
                        Op::Add(name, qty) => store.add_item(&name, qty).map(|_| ()),
                        Op::Remove(name, qty) => store.remove_item(&name, qty).map(|_| ()),
                    };
                    prop_assert!(store.iter().all(|(_, qty)| qty > 0));
                }
            }

            /// Property: positive adds sum up per item.
            #[test]
            fn positive_adds_accumulate(qtys in prop::collection::vec(1i64..1000, 1..20)) {
                let mut store = InventoryStore::new();
                for qty in &qtys {
                    store.add_item("widget", *qty).unwrap();
                }
                prop_assert_eq!(store.get_quantity("widget"), qtys.iter().sum::<i64>());
            }

            /// Property: the low-stock query never mutates the store.
            #[test]
            fn low_stock_query_is_read_only(threshold in -10i64..20) {
                let mut store = InventoryStore::new();
                store.add_item("apple", 7).unwrap();
                store.add_item("banana", 5).unwrap();
                let before = store.clone();
                let low = store.check_low_items(threshold);
                prop_assert!(low.len() <= 2);
                prop_assert_eq!(&store, &before);
            }
        }
    }
}
