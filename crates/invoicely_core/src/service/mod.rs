//! Core use-case services.
//!
//! # Responsibility
//! - Own invoice state for one session: store, draft form, search, selection.
//! - Keep the CLI decoupled from storage details.

pub mod form_controller;
pub mod invoice_list;
pub mod invoice_store;
pub mod session;
