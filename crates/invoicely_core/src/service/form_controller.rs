//! Draft invoice form controller.
//!
//! # Responsibility
//! - Own the draft invoice while it is being edited.
//! - Apply field and line-item edits, keeping `prize` in step with qty/price.
//! - Finalize the draft into the store on submit.
//!
//! # Invariants
//! - Edits are never validated; any text or number is accepted.
//! - A direct `prize` edit is never overwritten by the qty/price rule in the
//!   same patch.
//! - Submit resets only the invoice number and items.

use crate::model::invoice::{Invoice, ItemId, LineItem, NewInvoice};
use crate::model::totals::{compute_totals, Totals};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::invoice_store::{InvoiceStore, StoreResult};
use log::{info, warn};
use rand::Rng;
use uuid::Uuid;

pub const DEFAULT_FROM: &str = "ACME Corp\n123 Business Rd\nCity, Country";
pub const DEFAULT_TO: &str = "Client Name\nClient Address";

/// Invoice being edited, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftInvoice {
    /// Key-tracking id for the form session. Not the persisted invoice id.
    pub key: String,
    pub from: String,
    pub to: String,
    pub invoice_number: String,
    pub due_date: String,
    pub items: Vec<LineItem>,
    pub notes: String,
}

/// Partial update of top-level draft fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPatch {
    pub from: Option<String>,
    pub to: Option<String>,
    pub invoice_number: Option<String>,
    pub due_date: Option<String>,
    pub items: Option<Vec<LineItem>>,
    pub notes: Option<String>,
}

/// Partial update of one line item.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemPatch<'a> {
    pub description: Option<&'a str>,
    pub qty: Option<f64>,
    pub price: Option<f64>,
    pub prize: Option<f64>,
}

/// Produces a fresh draft: defaults, a suggested number and one empty item.
pub fn init_draft() -> DraftInvoice {
    DraftInvoice {
        key: Uuid::new_v4().to_string(),
        from: DEFAULT_FROM.to_string(),
        to: DEFAULT_TO.to_string(),
        invoice_number: suggest_invoice_number(),
        due_date: String::new(),
        items: vec![LineItem::empty()],
        notes: String::new(),
    }
}

/// Suggests an invoice number `INV-NNNN` with `NNNN` in `1000..=9999`.
pub fn suggest_invoice_number() -> String {
    let n: u16 = rand::thread_rng().gen_range(1000..=9999);
    format!("INV-{n}")
}

/// Converts numeric form text into a number, the way a browser number
/// input does.
///
/// Blank text is `0`. Decimal and exponent forms parse as usual,
/// `Infinity` may carry a sign, and unsigned `0x`/`0o`/`0b` literals are
/// read in their radix. Anything else, including `inf` and `nan` spellings,
/// is NaN.
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }

    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let value = text[2..].chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    });
    Some(value.unwrap_or(f64::NAN))
}

/// Form controller owning one draft invoice.
#[derive(Debug, Clone)]
pub struct FormController {
    draft: DraftInvoice,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            draft: init_draft(),
        }
    }

    pub fn draft(&self) -> &DraftInvoice {
        &self.draft
    }

    /// Shallow-merges the set fields of `patch` into the draft.
    pub fn update_field(&mut self, patch: DraftPatch) {
        let draft = &mut self.draft;
        if let Some(from) = patch.from {
            draft.from = from;
        }
        if let Some(to) = patch.to {
            draft.to = to;
        }
        if let Some(invoice_number) = patch.invoice_number {
            draft.invoice_number = invoice_number;
        }
        if let Some(due_date) = patch.due_date {
            draft.due_date = due_date;
        }
        if let Some(items) = patch.items {
            draft.items = items;
        }
        if let Some(notes) = patch.notes {
            draft.notes = notes;
        }
    }

    /// Appends an empty line item and returns its id.
    pub fn add_item(&mut self) -> ItemId {
        let item = LineItem::empty();
        let id = item.id.clone();
        self.draft.items.push(item);
        id
    }

    /// Removes the item with `id`. The list may become empty.
    ///
    /// Returns whether an item was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.draft.items.len();
        self.draft.items.retain(|item| item.id != id);
        self.draft.items.len() != before
    }

    /// Merges `patch` into the item with `id`.
    ///
    /// - `qty` recomputes `prize = qty * price`.
    /// - `price` recomputes `prize = price * qty`.
    /// - `prize` is stored as given and wins over both rules.
    ///
    /// Returns whether an item matched.
    pub fn update_item(&mut self, id: &str, patch: ItemPatch<'_>) -> bool {
        let Some(item) = self.draft.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };

        if let Some(description) = patch.description {
            item.description = description.to_string();
        }
        if let Some(qty) = patch.qty {
            item.qty = qty;
            item.prize = qty * item.price;
        }
        if let Some(price) = patch.price {
            item.price = price;
            item.prize = price * item.qty;
        }
        if let Some(prize) = patch.prize {
            item.prize = prize;
        }
        true
    }

    /// Totals of the current draft items, for live display.
    pub fn live_totals(&self) -> Totals {
        compute_totals(&self.draft.items)
    }

    /// Builds the finalized invoice from the current draft.
    pub fn finalize(&self) -> NewInvoice {
        let totals = self.live_totals();
        let draft = &self.draft;
        NewInvoice {
            from: draft.from.clone(),
            to: draft.to.clone(),
            invoice_number: draft.invoice_number.clone(),
            due_date: draft.due_date.clone(),
            items: draft.items.clone(),
            notes: draft.notes.clone(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
        }
    }

    /// Saves the finalized draft to `store`, then resets the number and items.
    ///
    /// # Errors
    /// - Returns the store error unchanged; the draft is left as it was.
    pub fn submit<'s, S: KeyValueStore>(
        &mut self,
        store: &'s mut InvoiceStore<S>,
    ) -> StoreResult<&'s Invoice> {
        let item_count = self.draft.items.len();
        let saved = match store.add(self.finalize()) {
            Ok(saved) => saved,
            Err(err) => {
                warn!("event=draft_submit module=form status=error items={item_count} error={err}");
                return Err(err);
            }
        };

        info!(
            "event=draft_submit module=form status=ok invoice_id={} items={item_count}",
            saved.id
        );
        self.draft.invoice_number = suggest_invoice_number();
        self.draft.items = vec![LineItem::empty()];
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce_number, init_draft, suggest_invoice_number, DEFAULT_FROM, DEFAULT_TO};

    #[test]
    fn init_draft_has_defaults_and_one_empty_item() {
        let draft = init_draft();
        assert_eq!(draft.from, DEFAULT_FROM);
        assert_eq!(draft.to, DEFAULT_TO);
        assert!(draft.due_date.is_empty());
        assert!(draft.notes.is_empty());
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].qty, 1.0);
        assert!(!draft.key.is_empty());
    }

    #[test]
    fn suggested_number_is_four_digits() {
        for _ in 0..200 {
            let number = suggest_invoice_number();
            let digits = number.strip_prefix("INV-").expect("INV- prefix");
            assert_eq!(digits.len(), 4);
            let value: u16 = digits.parse().expect("numeric suffix");
            assert!((1000..=9999).contains(&value));
        }
    }

    #[test]
    fn coerce_number_matches_form_input_semantics() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number(" 2.5 "), 2.5);
        assert_eq!(coerce_number("-3"), -3.0);
        assert!(coerce_number("abc").is_nan());
    }

    #[test]
    fn coerce_number_rejects_rust_only_float_spellings() {
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("-infinity").is_nan());
        assert!(coerce_number("NaN").is_nan());
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number("1e3"), 1000.0);
    }

    #[test]
    fn coerce_number_reads_radix_literals() {
        assert_eq!(coerce_number("0x10"), 16.0);
        assert_eq!(coerce_number("0XfF"), 255.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0x1g").is_nan());
        assert!(coerce_number("-0x10").is_nan());
    }
}
