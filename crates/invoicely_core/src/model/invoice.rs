//! Invoice and line item records.
//!
//! # Responsibility
//! - Define the JSON shape stored in the `invoices` slot.
//! - Accept legacy payload variations on read (numeric ids, `null` numbers,
//!   missing `createdAt`).
//!
//! # Invariants
//! - Field names serialize in camelCase (`invoiceNumber`, `dueDate`, `createdAt`).
//! - Non-finite numbers serialize as `null` and read back as NaN.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque line item identifier, unique within one invoice.
pub type ItemId = String;

/// Persisted invoice identifier.
///
/// Older payloads may carry the id as a JSON number; it is kept as its
/// decimal text so lookups compare one representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for InvoiceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InvoiceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for InvoiceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// One billable entry on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ItemId,
    pub description: String,
    #[serde(deserialize_with = "number_or_nan")]
    pub qty: f64,
    /// Unit price.
    #[serde(deserialize_with = "number_or_nan")]
    pub price: f64,
    /// Line total. Normally `qty * price`, but directly editable.
    #[serde(deserialize_with = "number_or_nan")]
    pub prize: f64,
}

impl LineItem {
    /// Creates an empty line item with a fresh id, `qty = 1` and zero amounts.
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: String::new(),
            qty: 1.0,
            price: 0.0,
            prize: 0.0,
        }
    }
}

/// A saved invoice as held by the store and persisted to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub from: String,
    pub to: String,
    pub invoice_number: String,
    /// ISO date (`YYYY-MM-DD`) or empty.
    pub due_date: String,
    pub items: Vec<LineItem>,
    pub notes: String,
    #[serde(deserialize_with = "number_or_nan")]
    pub subtotal: f64,
    #[serde(deserialize_with = "number_or_nan")]
    pub tax: f64,
    #[serde(deserialize_with = "number_or_nan")]
    pub total: f64,
    /// RFC 3339 timestamp assigned by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A finalized draft: totals computed, waiting for store-assigned identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub from: String,
    pub to: String,
    pub invoice_number: String,
    pub due_date: String,
    pub items: Vec<LineItem>,
    pub notes: String,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl NewInvoice {
    /// Attaches store-assigned identity and creation time.
    pub fn into_invoice(self, id: InvoiceId, created_at: String) -> Invoice {
        Invoice {
            id,
            from: self.from,
            to: self.to,
            invoice_number: self.invoice_number,
            due_date: self.due_date,
            items: self.items,
            notes: self.notes,
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            created_at: Some(created_at),
        }
    }
}

fn number_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
