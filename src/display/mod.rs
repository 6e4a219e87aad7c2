//! Terminal rendering for customers and invoices.

use owo_colors::OwoColorize;

use crate::types::{CustomerStatus, InvoiceStatus};

pub mod tables;

pub use tables::*;

/// Placeholder for fields the API left empty
pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_customer_status(status: CustomerStatus) -> String {
    let badge = status.to_string();
    match status {
        CustomerStatus::Active => badge.green().to_string(),
        CustomerStatus::Dormant => badge.dimmed().to_string(),
    }
}

pub fn format_invoice_status(status: InvoiceStatus) -> String {
    let badge = status.to_string();
    match status {
        InvoiceStatus::Unpaid => badge.yellow().to_string(),
        InvoiceStatus::Paid => badge.green().to_string(),
        InvoiceStatus::Cancelled => badge.dimmed().to_string(),
    }
}

/// Money with two decimals and thousands separators, e.g. `12,500.00`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Amounts that round to zero print unsigned
    let rounds_to_zero = fixed.bytes().all(|b| matches!(b, b'0' | b'.'));
    let sign = if amount < 0.0 && !rounds_to_zero { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// The value, or `N/A` when missing or blank
pub fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
