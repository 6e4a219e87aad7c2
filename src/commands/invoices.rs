use owo_colors::OwoColorize;

use super::{Context, print_json, require_user, settle};
use crate::cli::OutputOptions;
use crate::display::invoice_table;
use crate::error::Result;
use crate::screen::InvoicesScreen;
use crate::types::InvoiceStatus;

/// List invoices with `status`, fetching up to `pages` pages
pub async fn cmd_invoices_ls(
    status: InvoiceStatus,
    pages: usize,
    output: OutputOptions,
) -> Result<()> {
    let ctx = Context::load()?;
    let mut screen = InvoicesScreen::new(ctx.backend, ctx.session, ctx.config.page_size);
    require_user(screen.gate())?;

    screen.set_status_filter(status).await;
    for _ in 1..pages.max(1) {
        if !screen.list().has_more() {
            break;
        }
        screen.load_more().await;
    }
    settle(screen.take_toasts())?;

    let invoices = screen.displayed();
    if output.json {
        return print_json(&serde_json::to_value(invoices)?);
    }

    if invoices.is_empty() {
        println!("No {status} invoices found.");
        return Ok(());
    }
    println!("{}", invoice_table(invoices));
    println!("\n{} invoice(s)", invoices.len());
    if screen.list().has_more() {
        println!(
            "{}",
            format!("More available: rerun with --pages {}", pages.max(1) + 1).dimmed()
        );
    }
    Ok(())
}

/// Search invoices by customer phone number (digits only) or name
pub async fn cmd_invoices_search(query: &str, output: OutputOptions) -> Result<()> {
    let ctx = Context::load()?;
    let mut screen = InvoicesScreen::new(ctx.backend, ctx.session, ctx.config.page_size);
    require_user(screen.gate())?;

    screen.search(query).await;
    settle(screen.take_toasts())?;

    let found = screen.search_state().display(&[]);
    if output.json {
        return print_json(&serde_json::to_value(found)?);
    }

    match screen.search_state().empty_message() {
        Some(message) => println!("{message}"),
        None if found.is_empty() => println!("Enter a phone number or name to search."),
        None => println!("{}", invoice_table(found)),
    }
    Ok(())
}
