use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{NOT_AVAILABLE, format_amount, format_customer_status, format_invoice_status, or_na};
use crate::types::{Customer, Invoice};

/// A row in the customer list table
#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "First Name")]
    first_name: String,
    #[tabled(rename = "Last Name")]
    last_name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// A row in the invoice list table
#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "Invoice Number")]
    invoice_number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Invoice Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Town and county joined for the list's location column
fn place(customer: &Customer) -> String {
    let parts: Vec<&str> = [customer.town.as_deref(), customer.county.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}

pub fn customer_table(customers: &[Customer]) -> String {
    let rows = customers.iter().map(|c| CustomerRow {
        id: c.id.to_string(),
        first_name: c.first_name.clone(),
        last_name: c.last_name.clone(),
        location: place(c),
        contact: or_na(Some(&c.phone)),
        category: or_na(c.category.as_deref()),
        status: format_customer_status(c.status),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn invoice_table(invoices: &[Invoice]) -> String {
    let rows = invoices.iter().map(|i| InvoiceRow {
        invoice_number: i.invoice_number.clone(),
        name: i.customer_name(),
        amount: format_amount(i.invoice_amount),
        status: format_invoice_status(i.status),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Read-only customer details, one labelled field per line
pub fn customer_detail(customer: &Customer) -> String {
    let location = customer
        .location
        .map(|l| l.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let fields = [
        ("Email", or_na(customer.email.as_deref())),
        ("Phone", or_na(Some(&customer.phone))),
        ("Gender", or_na(customer.gender.as_deref())),
        ("County", or_na(customer.county.as_deref())),
        ("Town", or_na(customer.town.as_deref())),
        ("Location", location),
        ("Category", or_na(customer.category.as_deref())),
        ("Monthly Charge", format_amount(customer.monthly_charge)),
        ("Status", format_customer_status(customer.status)),
    ];

    let mut out = format!(
        "{} {}\n",
        customer.full_name().bold(),
        format!("#{}", customer.id).dimmed()
    );
    for (label, value) in fields {
        out.push_str(&format!("  {}: {value}\n", label.cyan()));
    }
    out
}
