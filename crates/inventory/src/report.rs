//! Console views over the store.

use std::io::{self, Write};

use crate::store::InventoryStore;

pub const REPORT_HEADER: &str = "Items Report";

/// Write the header and one `name -> qty` line per item, in store order.
pub fn print_data<W: Write>(store: &InventoryStore, out: &mut W) -> io::Result<()> {
    writeln!(out, "{REPORT_HEADER}")?;
    for (name, qty) in store.iter() {
        writeln!(out, "{name} -> {qty}")?;
    }
    Ok(())
}

/// Same text as [`print_data`], as a string.
pub fn render_report(store: &InventoryStore) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = print_data(store, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Render low-stock names as `["apple", "banana"]`.
pub fn format_low_items(names: &[&str]) -> String {
    format!("{names:?}")
}
