//! Text rendering for the invoice list pane.

use crate::model::invoice::Invoice;
use crate::render::format::{format_amount, CURRENCY_SYMBOL};
use std::fmt::{Display, Formatter};

pub const EMPTY_LIST_MESSAGE: &str = "No invoices yet. Create one!";

/// A rendered list of (already filtered) invoices.
pub struct InvoiceListing<'a> {
    invoices: Vec<&'a Invoice>,
}

impl<'a> InvoiceListing<'a> {
    pub fn new(invoices: Vec<&'a Invoice>) -> Self {
        Self { invoices }
    }

    pub fn count(&self) -> usize {
        self.invoices.len()
    }
}

/// Total shown on a list row. A NaN total shows as zero.
pub fn list_total_label(invoice: &Invoice) -> String {
    let total = if invoice.total.is_nan() {
        0.0
    } else {
        invoice.total
    };
    format_amount(CURRENCY_SYMBOL, total)
}

impl Display for InvoiceListing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Invoices ({})", self.count())?;
        if self.invoices.is_empty() {
            return writeln!(f, "{EMPTY_LIST_MESSAGE}");
        }

        let id_width = self
            .invoices
            .iter()
            .map(|invoice| invoice.id.as_str().chars().count())
            .max()
            .unwrap_or(0);
        let number_width = self
            .invoices
            .iter()
            .map(|invoice| invoice.invoice_number.chars().count())
            .max()
            .unwrap_or(0);

        for invoice in &self.invoices {
            writeln!(
                f,
                "{:<id_width$}  {:<number_width$}  {}",
                invoice.id.as_str(),
                invoice.invoice_number,
                list_total_label(invoice)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{list_total_label, InvoiceListing, EMPTY_LIST_MESSAGE};
    use crate::model::invoice::{Invoice, InvoiceId};

    fn invoice(id: &str, number: &str, total: f64) -> Invoice {
        Invoice {
            id: InvoiceId::new(id),
            from: String::new(),
            to: String::new(),
            invoice_number: number.to_string(),
            due_date: String::new(),
            items: Vec::new(),
            notes: String::new(),
            subtotal: 0.0,
            tax: 0.0,
            total,
            created_at: None,
        }
    }

    #[test]
    fn empty_listing_shows_message_and_zero_count() {
        let text = InvoiceListing::new(Vec::new()).to_string();
        assert!(text.starts_with("Invoices (0)"));
        assert!(text.contains(EMPTY_LIST_MESSAGE));
    }

    #[test]
    fn rows_show_number_and_total() {
        let first = invoice("2", "INV-2000", 236.0);
        let second = invoice("1", "INV-1000", 59.0);
        let text = InvoiceListing::new(vec![&first, &second]).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Invoices (2)");
        assert!(lines[1].contains("INV-2000") && lines[1].ends_with("₹236.00"));
        assert!(lines[2].contains("INV-1000") && lines[2].ends_with("₹59.00"));
    }

    #[test]
    fn nan_total_shows_as_zero_on_list_row() {
        assert_eq!(list_total_label(&invoice("1", "INV-1", f64::NAN)), "₹0.00");
    }
}
