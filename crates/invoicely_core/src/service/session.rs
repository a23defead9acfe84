//! Invoice session: app-level state wiring.
//!
//! # Responsibility
//! - Own the store, the draft form, the search string and the selection.
//! - Route submit/select/delete intents between components.
//!
//! # Invariants
//! - Selection always refers to an invoice resolved from the full store list.
//! - Deleting the selected invoice clears the selection.
//! - A successful submit selects the saved invoice.

use crate::model::invoice::{Invoice, InvoiceId};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::form_controller::FormController;
use crate::service::invoice_list::filter_invoices;
use crate::service::invoice_store::{InvoiceStore, StoreResult};

pub struct InvoiceSession<S: KeyValueStore> {
    store: InvoiceStore<S>,
    form: FormController,
    search: String,
    selected: Option<InvoiceId>,
}

impl<S: KeyValueStore> InvoiceSession<S> {
    /// Starts a session over an already loaded store.
    pub fn new(store: InvoiceStore<S>) -> Self {
        Self {
            store,
            form: FormController::new(),
            search: String::new(),
            selected: None,
        }
    }

    /// Loads the store from `kv` (falling back to empty) and starts a session.
    pub fn open(kv: S) -> Self {
        Self::new(InvoiceStore::load(kv))
    }

    pub fn store(&self) -> &InvoiceStore<S> {
        &self.store
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn search(&self) -> &str {
        self.search.as_str()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Invoices matching the current search, in store order.
    pub fn visible_invoices(&self) -> Vec<&Invoice> {
        filter_invoices(self.store.list(), self.search.as_str())
    }

    /// Submits the draft form and selects the saved invoice.
    pub fn submit(&mut self) -> StoreResult<&Invoice> {
        let saved = self.form.submit(&mut self.store)?;
        self.selected = Some(saved.id.clone());
        Ok(saved)
    }

    /// Selects the invoice with `id`, resolved against the full list.
    ///
    /// An unknown id clears the selection.
    pub fn select(&mut self, id: &InvoiceId) -> Option<&Invoice> {
        self.selected = self.store.get(id).map(|invoice| invoice.id.clone());
        self.selected_invoice()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_invoice(&self) -> Option<&Invoice> {
        self.selected.as_ref().and_then(|id| self.store.get(id))
    }

    /// Deletes the invoice with `id`, clearing the selection when it matches.
    pub fn delete(&mut self, id: &InvoiceId) -> StoreResult<Option<Invoice>> {
        let removed = self.store.remove(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Ok(removed)
    }
}
