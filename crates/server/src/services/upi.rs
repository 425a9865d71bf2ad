//! UPI deep-link construction.
//!
//! The link opens the customer's UPI app pre-filled with the shop's VPA,
//! the order total, and a transaction note carrying the token number. The
//! server never learns whether the payment went through; confirmation is a
//! separate manual step on the dashboard.

use rust_decimal::Decimal;

/// Build a `upi://pay` deep link for an order.
///
/// Shop name and transaction note are percent-encoded; the VPA and amount
/// are passed through as-is.
#[must_use]
pub fn payment_link(
    upi_id: &str,
    shop_name: &str,
    amount: Decimal,
    token_number: u32,
    note: &str,
) -> String {
    let tn = if note.is_empty() {
        format!("Token #{token_number}")
    } else {
        format!("Token #{token_number} - {note}")
    };

    format!(
        "upi://pay?pa={upi_id}&pn={}&am={amount}&cu=INR&tn={}",
        urlencoding::encode(shop_name),
        urlencoding::encode(&tn),
    )
}
