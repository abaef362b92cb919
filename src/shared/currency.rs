//! IDR currency formatting
//!
//! Prices are stored as whole rupiah (no subunits). Formatting follows the
//! id-ID convention with a dot as the thousands separator: `Rp 150.000`.

/// Format an amount of whole rupiah for display.
pub fn format_idr(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}
