//! Invoice domain model.
//!
//! # Responsibility
//! - Define the persisted shape of invoices and line items.
//! - Derive invoice totals from line items.
//!
//! # Invariants
//! - A saved `Invoice` is never mutated in place; totals are frozen at save time.
//! - `LineItem::prize` is authoritative for totals, even when it diverges from
//!   `qty * price`.

pub mod invoice;
pub mod totals;
