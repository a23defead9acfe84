//! Invoice totals derivation.
//!
//! # Invariants
//! - Pure: output depends only on the `prize` values passed in.
//! - `tax` and `total` are rounded half away from zero to 2 decimals.

use crate::model::invoice::LineItem;

/// Fixed tax rate applied to the subtotal.
pub const TAX_RATE: f64 = 0.18;

/// Derived invoice amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Computes subtotal, tax and total from line items.
///
/// `subtotal` sums the stored `prize` of every item, so a manual override wins
/// over `qty * price`. A NaN `prize` contributes zero.
pub fn compute_totals(items: &[LineItem]) -> Totals {
    let subtotal = items
        .iter()
        .map(|item| if item.prize.is_nan() { 0.0 } else { item.prize })
        .sum::<f64>();
    let tax = round2(subtotal * TAX_RATE);
    let total = round2(subtotal + tax);

    Totals {
        subtotal,
        tax,
        total,
    }
}

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{compute_totals, round2, Totals};
    use crate::model::invoice::LineItem;

    fn item(qty: f64, price: f64, prize: f64) -> LineItem {
        LineItem {
            qty,
            price,
            prize,
            ..LineItem::empty()
        }
    }

    #[test]
    fn empty_items_yield_zero_totals() {
        assert_eq!(
            compute_totals(&[]),
            Totals {
                subtotal: 0.0,
                tax: 0.0,
                total: 0.0
            }
        );
    }

    #[test]
    fn single_item_matches_reference_amounts() {
        let totals = compute_totals(&[item(2.0, 100.0, 200.0)]);
        assert_eq!(totals.subtotal, 200.0);
        assert_eq!(totals.tax, 36.0);
        assert_eq!(totals.total, 236.0);
    }

    #[test]
    fn prize_override_wins_over_quantity_times_price() {
        let totals = compute_totals(&[item(2.0, 100.0, 500.0)]);
        assert_eq!(totals.subtotal, 500.0);
        assert_eq!(totals.tax, 90.0);
        assert_eq!(totals.total, 590.0);
    }

    #[test]
    fn subtotal_sums_all_prizes_and_rounds_tax() {
        let totals = compute_totals(&[item(1.0, 10.5, 10.5), item(3.0, 0.33, 0.99)]);
        assert_eq!(totals.subtotal, 10.5 + 0.99);
        assert_eq!(totals.tax, round2((10.5 + 0.99) * 0.18));
        assert_eq!(totals.tax, 2.07);
        assert_eq!(totals.total, round2(totals.subtotal + totals.tax));
    }

    #[test]
    fn nan_prize_counts_as_zero() {
        let totals = compute_totals(&[item(f64::NAN, 100.0, f64::NAN), item(1.0, 50.0, 50.0)]);
        assert_eq!(totals.subtotal, 50.0);
        assert_eq!(totals.tax, 9.0);
        assert_eq!(totals.total, 59.0);
    }

    #[test]
    fn negative_prizes_are_summed_as_is() {
        let totals = compute_totals(&[item(1.0, 100.0, 100.0), item(1.0, -40.0, -40.0)]);
        assert_eq!(totals.subtotal, 60.0);
        assert_eq!(totals.tax, 10.8);
        assert_eq!(totals.total, 70.8);
    }
}
