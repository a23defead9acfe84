//! Invoice store: the session-owned canonical invoice list.
//!
//! # Responsibility
//! - Own the ordered list of saved invoices (most-recent-first).
//! - Mirror the full list to the `invoices` key-value slot on every mutation.
//! - Assign store-level identity (`id`, `createdAt`) to finalized drafts.
//!
//! # Invariants
//! - A mutation is committed in memory only after its write succeeds.
//! - Issued ids are unique and strictly increasing within one store.
//! - Load never fails: unreadable or malformed slots fall back to an empty list.

use crate::model::invoice::{Invoice, InvoiceId, NewInvoice};
use crate::repo::kv_repo::{KeyValueStore, RepoError};
use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage slot holding the serialized invoice list.
pub const INVOICES_KEY: &str = "invoices";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for slot reads/writes and payload (de)serialization.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Serialize(serde_json::Error),
    Deserialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize invoices: {err}"),
            Self::Deserialize(err) => write!(f, "malformed persisted invoices: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialize(err) | Self::Deserialize(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Canonical invoice list backed by a key-value slot.
pub struct InvoiceStore<S: KeyValueStore> {
    kv: S,
    invoices: Vec<Invoice>,
    last_issued_id: u64,
}

impl<S: KeyValueStore> InvoiceStore<S> {
    /// Loads the persisted list, substituting an empty list on any failure.
    ///
    /// The failure is logged at `warn` and never surfaced to the caller.
    pub fn load(kv: S) -> Self {
        match read_invoices(&kv) {
            Ok(invoices) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    invoices.len()
                );
                Self::with_invoices(kv, invoices)
            }
            Err(err) => {
                warn!("event=store_load module=store status=fallback count=0 error={err}");
                Self::with_invoices(kv, Vec::new())
            }
        }
    }

    /// Loads the persisted list, returning read and parse failures.
    ///
    /// A missing slot is not an error and yields an empty store.
    pub fn try_load(kv: S) -> StoreResult<Self> {
        let invoices = read_invoices(&kv)?;
        Ok(Self::with_invoices(kv, invoices))
    }

    fn with_invoices(kv: S, invoices: Vec<Invoice>) -> Self {
        let last_issued_id = invoices
            .iter()
            .filter_map(|invoice| invoice.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            kv,
            invoices,
            last_issued_id,
        }
    }

    /// Returns all invoices, most recent first.
    pub fn list(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Gets one invoice by id.
    pub fn get(&self, id: &InvoiceId) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| &invoice.id == id)
    }

    /// Saves a finalized draft at the head of the list and persists the list.
    ///
    /// # Errors
    /// - Returns `StoreError` when the list cannot be written; the in-memory
    ///   list is left unchanged.
    pub fn add(&mut self, draft: NewInvoice) -> StoreResult<&Invoice> {
        let issued = self.next_id();
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let invoice = draft.into_invoice(InvoiceId::new(issued.to_string()), created_at);

        self.invoices.insert(0, invoice);
        if let Err(err) = self.persist() {
            self.invoices.remove(0);
            warn!("event=store_add module=store status=error error={err}");
            return Err(err);
        }

        self.last_issued_id = issued;
        info!(
            "event=store_add module=store status=ok invoice_id={issued} count={}",
            self.invoices.len()
        );
        Ok(&self.invoices[0])
    }

    /// Removes the invoice with `id` and persists the remaining list.
    ///
    /// Returns the removed invoice, or `None` when no entry matched (nothing
    /// is written in that case).
    pub fn remove(&mut self, id: &InvoiceId) -> StoreResult<Option<Invoice>> {
        let Some(position) = self.invoices.iter().position(|invoice| &invoice.id == id) else {
            info!("event=store_remove module=store status=noop invoice_id={id}");
            return Ok(None);
        };

        let removed = self.invoices.remove(position);
        if let Err(err) = self.persist() {
            self.invoices.insert(position, removed);
            warn!("event=store_remove module=store status=error invoice_id={id} error={err}");
            return Err(err);
        }

        info!(
            "event=store_remove module=store status=ok invoice_id={id} count={}",
            self.invoices.len()
        );
        Ok(Some(removed))
    }

    fn persist(&self) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.invoices).map_err(StoreError::Serialize)?;
        self.kv.set_value(INVOICES_KEY, payload.as_str())?;
        Ok(())
    }

    // Wall-clock millis, bumped past every id already issued or loaded.
    // A loaded `u64::MAX` exhausts the counter; issuing then restarts from
    // the clock and only skips ids that are taken.
    fn next_id(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut candidate = self
            .last_issued_id
            .checked_add(1)
            .map_or(now, |next| now.max(next));
        while self
            .invoices
            .iter()
            .any(|invoice| invoice.id.as_str() == candidate.to_string())
        {
            candidate = candidate.wrapping_add(1);
        }
        candidate
    }
}

/// Parses a serialized invoice list.
pub fn parse_invoices(payload: &str) -> StoreResult<Vec<Invoice>> {
    serde_json::from_str(payload).map_err(StoreError::Deserialize)
}

/// Parses a serialized invoice list, substituting an empty list when malformed.
pub fn parse_invoices_or_empty(payload: &str) -> Vec<Invoice> {
    parse_invoices(payload).unwrap_or_default()
}

fn read_invoices<S: KeyValueStore>(kv: &S) -> StoreResult<Vec<Invoice>> {
    match kv.get_value(INVOICES_KEY)? {
        Some(payload) => parse_invoices(payload.as_str()),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_invoices, parse_invoices_or_empty, StoreError};

    #[test]
    fn malformed_payload_is_a_deserialize_error() {
        let err = parse_invoices("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Deserialize(_)));
    }

    #[test]
    fn wrong_shape_falls_back_to_empty() {
        assert!(parse_invoices_or_empty(r#"{"invoices": []}"#).is_empty());
        assert!(parse_invoices_or_empty("").is_empty());
        assert!(parse_invoices_or_empty("[]").is_empty());
    }
}
