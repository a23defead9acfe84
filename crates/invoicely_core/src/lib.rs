//! Core domain logic for Invoicely.
//! This crate is the single source of truth for invoice rules and storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigOverrides};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::invoice::{Invoice, InvoiceId, ItemId, LineItem, NewInvoice};
pub use model::totals::{compute_totals, round2, Totals, TAX_RATE};
pub use render::list::InvoiceListing;
pub use render::pdf::{export_pdf, pdf_file_name, render_pdf, ExportError, ExportOptions, ExportReport};
pub use render::preview::InvoiceDocument;
pub use repo::kv_repo::{KeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use service::form_controller::{
    coerce_number, init_draft, DraftInvoice, DraftPatch, FormController, ItemPatch,
};
pub use service::invoice_list::filter_invoices;
pub use service::invoice_store::{InvoiceStore, StoreError, StoreResult, INVOICES_KEY};
pub use service::session::InvoiceSession;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
