//! Inventory domain: an insertion-ordered item -> quantity store, its JSON
//! file persistence, and console reporting.
//!
//! Mutations are decided as events and then applied, so a rejected command
//! never touches the store.

pub mod persistence;
pub mod report;
pub mod store;

pub use persistence::{
    DEFAULT_INVENTORY_PATH, JsonFile, LoadOutcome, PersistenceError, load_data, save_data,
};
pub use report::{REPORT_HEADER, format_low_items, print_data, render_report};
pub use store::{
    AddItem, DEFAULT_LOW_STOCK_THRESHOLD, InventoryCommand, InventoryEvent, InventoryStore,
    ItemAdded, ItemRemoved, RemoveItem, RemoveOutcome, StockRemoved,
};
