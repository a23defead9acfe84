//! Invoice list filtering.
//!
//! # Invariants
//! - Matching is a case-insensitive substring test on `invoice_number` only.
//! - Output keeps store order (most recent first).

use crate::model::invoice::Invoice;

/// Returns the invoices whose number contains `search`, ignoring case.
///
/// An empty `search` returns every invoice.
pub fn filter_invoices<'a>(invoices: &'a [Invoice], search: &str) -> Vec<&'a Invoice> {
    let needle = search.to_lowercase();
    invoices
        .iter()
        .filter(|invoice| invoice.invoice_number.to_lowercase().contains(needle.as_str()))
        .collect()
}
