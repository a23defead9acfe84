//! Invoice presentation: list rows, preview document and PDF export.
//!
//! # Responsibility
//! - Format stored invoice fields for display without recomputing anything.
//! - Serialize the preview document into a PDF file.
//!
//! # Invariants
//! - Rendering reads invoices only; stored `prize` and totals show verbatim.

pub mod format;
pub mod list;
pub mod pdf;
pub mod preview;
