//! Number formatting shared by list, preview and PDF output.

/// Currency symbol used in on-screen output.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Formats an amount as `<symbol><value with 2 decimals>`.
///
/// Non-finite values keep their textual form (`₹NaN`, `₹Infinity`).
pub fn format_amount(symbol: &str, value: f64) -> String {
    if value.is_finite() {
        format!("{symbol}{value:.2}")
    } else {
        format!("{symbol}{}", non_finite_label(value))
    }
}

/// Formats a quantity in its shortest decimal form (`2`, `2.5`).
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return non_finite_label(value).to_string();
    }
    if value == 0.0 {
        // Drops the sign of negative zero.
        return "0".to_string();
    }
    value.to_string()
}

fn non_finite_label(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}
