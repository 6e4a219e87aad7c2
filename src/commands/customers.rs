use serde_json::json;

use super::{CommandOutput, Context, print_json, require_user, settle};
use crate::api::Backend;
use crate::cli::OutputOptions;
use crate::display::{customer_detail, customer_table};
use crate::editor::{CustomerDraft, EditorMode};
use crate::error::{OpsError, Result};
use crate::notify::Toast;
use crate::screen::CustomersScreen;
use crate::types::{Location, RecordId};

/// Form fields accepted by `customers create` and `customers update`.
/// Fields left `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct CustomerFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub county: Option<String>,
    pub town: Option<String>,
    pub category: Option<String>,
    pub monthly_charge: Option<String>,
    pub status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CustomerFields {
    fn apply(self, draft: &mut CustomerDraft) {
        let text_fields = [
            (self.first_name, &mut draft.first_name),
            (self.last_name, &mut draft.last_name),
            (self.email, &mut draft.email),
            (self.phone, &mut draft.phone),
            (self.gender, &mut draft.gender),
            (self.county, &mut draft.county),
            (self.town, &mut draft.town),
            (self.category, &mut draft.category),
            (self.monthly_charge, &mut draft.monthly_charge),
            (self.status, &mut draft.status),
        ];
        for (value, slot) in text_fields {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if let (Some(lat), Some(lng)) = (self.latitude, self.longitude) {
            draft.location = Some(Location::new(lat, lng));
        }
    }
}

/// List every customer
pub async fn cmd_customers_ls(output: OutputOptions) -> Result<()> {
    let ctx = Context::load()?;
    let mut screen = CustomersScreen::new(ctx.backend, ctx.session);
    require_user(screen.open().await)?;
    settle(screen.take_toasts())?;

    let customers = screen.displayed();
    if output.json {
        return print_json(&serde_json::to_value(customers)?);
    }

    if customers.is_empty() {
        println!("No customers found.");
        return Ok(());
    }
    println!("{}", customer_table(customers));
    println!("\n{} customer(s)", customers.len());
    Ok(())
}

/// Search customers by phone number (digits only) or name
pub async fn cmd_customers_search(query: &str, output: OutputOptions) -> Result<()> {
    let ctx = Context::load()?;
    let mut screen = CustomersScreen::new(ctx.backend, ctx.session);
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
        None => println!("{}", customer_table(found)),
    }
    Ok(())
}

/// Show one customer's details
pub async fn cmd_customers_show(id: &str, output: OutputOptions) -> Result<()> {
    let ctx = Context::load()?;
    let mut screen = CustomersScreen::new(ctx.backend, ctx.session);
    require_user(screen.open().await)?;
    settle(screen.take_toasts())?;

    let id = RecordId::new(id);
    if !screen.view(&id) {
        return Err(OpsError::CustomerNotFound(id.to_string()));
    }
    let EditorMode::Viewing(customer) = screen.editor().mode() else {
        return Err(OpsError::CustomerNotFound(id.to_string()));
    };

    CommandOutput::new(serde_json::to_value(customer)?)
        .with_text(customer_detail(customer))
        .print(output)
}

/// Create a customer from the given fields
pub async fn cmd_customers_create(fields: CustomerFields, output: OutputOptions) -> Result<()> {
    let ctx = Context::load()?;
    let mut screen = CustomersScreen::new(ctx.backend, ctx.session);
    require_user(screen.gate())?;

    screen.edit(None);
    save(screen, fields, output).await
}

/// Update an existing customer; only the given fields change
pub async fn cmd_customers_update(
    id: &str,
    fields: CustomerFields,
    output: OutputOptions,
) -> Result<()> {
    let ctx = Context::load()?;
    let mut screen = CustomersScreen::new(ctx.backend, ctx.session);
    require_user(screen.open().await)?;
    settle(screen.take_toasts())?;

    let id = RecordId::new(id);
    if !screen.edit(Some(&id)) {
        return Err(OpsError::CustomerNotFound(id.to_string()));
    }
    save(screen, fields, output).await
}

async fn save<B: Backend>(
    mut screen: CustomersScreen<B>,
    fields: CustomerFields,
    output: OutputOptions,
) -> Result<()> {
    let updating = screen.editor().draft().is_some_and(|d| !d.is_new());
    if let Some(draft) = screen.editor_mut().draft_mut() {
        fields.apply(draft);
    }

    screen.save().await;
    let toasts = settle(screen.take_toasts())?;
    let text: Vec<String> = toasts.iter().map(Toast::render).collect();

    CommandOutput::new(json!({
        "action": if updating { "customer_updated" } else { "customer_created" },
        "success": true,
        "message": toasts.first().map(|t| t.message.as_str()),
    }))
    .with_text(text.join("\n"))
    .print(output)
}
