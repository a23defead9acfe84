//! Preview document for one saved invoice.
//!
//! # Responsibility
//! - Lay out letterhead, line-item table, totals and notes.
//! - Serve as the single source for both text preview and PDF export.
//!
//! # Invariants
//! - No amount is recomputed; every value comes from the stored invoice.

use crate::model::invoice::Invoice;
use crate::render::format::{format_amount, format_quantity, CURRENCY_SYMBOL};
use std::fmt::{Display, Formatter};

/// Placeholder shown when an invoice has no notes.
pub const EMPTY_NOTES: &str = "—";

pub const TABLE_HEADERS: [&str; 4] = ["Description", "Qty", "Unit Price", "Prize"];

const TEXT_WIDTH: usize = 72;

/// One rendered line-item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub description: String,
    pub qty: String,
    pub unit_price: String,
    pub prize: String,
}

/// Formatted invoice ready for display or export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub title: String,
    pub invoice_number: String,
    pub due_date: String,
    pub from_lines: Vec<String>,
    pub to_lines: Vec<String>,
    pub rows: Vec<PreviewRow>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub notes_lines: Vec<String>,
}

impl InvoiceDocument {
    /// Renders with the on-screen currency symbol.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self::with_currency(invoice, CURRENCY_SYMBOL)
    }

    /// Renders amounts prefixed with `symbol`.
    pub fn with_currency(invoice: &Invoice, symbol: &str) -> Self {
        let rows = invoice
            .items
            .iter()
            .map(|item| PreviewRow {
                description: item.description.clone(),
                qty: format_quantity(item.qty),
                unit_price: format_amount(symbol, item.price),
                prize: format_amount(symbol, item.prize),
            })
            .collect();

        let notes_lines = if invoice.notes.is_empty() {
            vec![EMPTY_NOTES.to_string()]
        } else {
            split_lines(&invoice.notes)
        };

        Self {
            title: format!("Invoice — {}", invoice.invoice_number),
            invoice_number: invoice.invoice_number.clone(),
            due_date: invoice.due_date.clone(),
            from_lines: split_lines(&invoice.from),
            to_lines: split_lines(&invoice.to),
            rows,
            subtotal: format_amount(symbol, invoice.subtotal),
            tax: format_amount(symbol, invoice.tax),
            total: format_amount(symbol, invoice.total),
            notes_lines,
        }
    }

    /// Labelled totals lines in display order.
    pub fn totals_lines(&self) -> [(&'static str, &str); 3] {
        [
            ("Subtotal", self.subtotal.as_str()),
            ("Tax", self.tax.as_str()),
            ("Total", self.total.as_str()),
        ]
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

fn pad_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{text}", " ".repeat(width - len))
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

impl Display for InvoiceDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        if !self.due_date.is_empty() {
            writeln!(f, "Due: {}", self.due_date)?;
        }
        writeln!(f)?;

        let letterhead_rows = self.from_lines.len().max(self.to_lines.len());
        for index in 0..letterhead_rows {
            let left = self.from_lines.get(index).map_or("", String::as_str);
            let right = self.to_lines.get(index).map_or("", String::as_str);
            let right_width = TEXT_WIDTH.saturating_sub(left.chars().count());
            writeln!(f, "{left}{}", pad_left(right, right_width))?;
        }
        writeln!(f)?;

        let mut widths = TABLE_HEADERS.map(|header| header.chars().count());
        for row in &self.rows {
            let cells = [&row.description, &row.qty, &row.unit_price, &row.prize];
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule = "-".repeat(widths.iter().sum::<usize>() + 3 * 3);
        writeln!(
            f,
            "{} | {} | {} | {}",
            pad_right(TABLE_HEADERS[0], widths[0]),
            pad_right(TABLE_HEADERS[1], widths[1]),
            pad_right(TABLE_HEADERS[2], widths[2]),
            pad_left(TABLE_HEADERS[3], widths[3]),
        )?;
        writeln!(f, "{rule}")?;
        for row in &self.rows {
            writeln!(
                f,
                "{} | {} | {} | {}",
                pad_right(&row.description, widths[0]),
                pad_right(&row.qty, widths[1]),
                pad_right(&row.unit_price, widths[2]),
                pad_left(&row.prize, widths[3]),
            )?;
        }
        writeln!(f, "{rule}")?;

        for (label, value) in self.totals_lines() {
            writeln!(f, "{}", pad_left(&format!("{label}: {value}"), TEXT_WIDTH))?;
        }
        writeln!(f)?;

        writeln!(f, "Notes:")?;
        for line in &self.notes_lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{InvoiceDocument, EMPTY_NOTES};
    use crate::model::invoice::{Invoice, InvoiceId, LineItem};

    fn sample() -> Invoice {
        Invoice {
            id: InvoiceId::new("1700000000000"),
            from: "ACME Corp\n123 Business Rd".to_string(),
            to: "Client Name\nClient Address".to_string(),
            invoice_number: "INV-4242".to_string(),
            due_date: "2026-11-01".to_string(),
            items: vec![LineItem {
                id: "a".to_string(),
                description: "Consulting".to_string(),
                qty: 2.0,
                price: 100.0,
                prize: 500.0,
            }],
            notes: String::new(),
            subtotal: 500.0,
            tax: 90.0,
            total: 590.0,
            created_at: None,
        }
    }

    #[test]
    fn document_shows_stored_values_verbatim() {
        let doc = InvoiceDocument::from_invoice(&sample());
        assert_eq!(doc.title, "Invoice — INV-4242");
        assert_eq!(doc.from_lines, vec!["ACME Corp", "123 Business Rd"]);
        assert_eq!(doc.rows[0].qty, "2");
        assert_eq!(doc.rows[0].unit_price, "₹100.00");
        assert_eq!(doc.rows[0].prize, "₹500.00");
        assert_eq!(doc.subtotal, "₹500.00");
        assert_eq!(doc.tax, "₹90.00");
        assert_eq!(doc.total, "₹590.00");
    }

    #[test]
    fn empty_notes_render_placeholder() {
        let doc = InvoiceDocument::from_invoice(&sample());
        assert_eq!(doc.notes_lines, vec![EMPTY_NOTES]);
        assert!(doc.to_string().contains("Notes:\n—"));
    }

    #[test]
    fn nan_line_values_show_as_nan() {
        let mut invoice = sample();
        invoice.items[0].qty = f64::NAN;
        invoice.items[0].prize = f64::NAN;
        let doc = InvoiceDocument::from_invoice(&invoice);
        assert_eq!(doc.rows[0].qty, "NaN");
        assert_eq!(doc.rows[0].prize, "₹NaN");
    }

    #[test]
    fn text_layout_contains_all_sections() {
        let text = InvoiceDocument::from_invoice(&sample()).to_string();
        assert!(text.starts_with("Invoice — INV-4242\n"));
        assert!(text.contains("Due: 2026-11-01"));
        assert!(text.contains("Client Address"));
        assert!(text.contains("Description"));
        assert!(text.contains("Consulting"));
        assert!(text.contains("Total: ₹590.00"));
    }

    #[test]
    fn custom_currency_prefix_applies_to_all_amounts() {
        let doc = InvoiceDocument::with_currency(&sample(), "Rs. ");
        assert_eq!(doc.rows[0].prize, "Rs. 500.00");
        assert_eq!(doc.total, "Rs. 590.00");
    }
}
