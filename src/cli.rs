use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::str::FromStr;

use crate::commands::CustomerFields;
use crate::config::VALID_CONFIG_KEYS;
use crate::types::{InvoiceStatus, VALID_CUSTOMER_STATUSES, VALID_INVOICE_STATUSES};

#[derive(Parser)]
#[command(name = "opsdesk")]
#[command(about = "Customer and invoice desk for the operations API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output flag
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse, search and edit customers
    #[command(visible_alias = "c")]
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },

    /// Browse and search invoices
    #[command(visible_alias = "i")]
    Invoices {
        #[command(subcommand)]
        action: InvoiceAction,
    },

    /// Sign in as an operator
    Login {
        /// Display name of the operator
        name: String,

        /// Operator email address
        #[arg(long)]
        email: Option<String>,

        /// API bearer token sent with every request
        #[arg(long)]
        token: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Forget the signed-in operator
    Logout {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show the signed-in operator
    Whoami {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CustomerAction {
    /// List all customers
    #[command(visible_alias = "list")]
    Ls {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Search by phone number (digits only) or name
    Search {
        query: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show a customer's details
    Show {
        /// Customer ID
        id: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Create a customer
    Create {
        #[command(flatten)]
        fields: CustomerArgs,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Update a customer; unspecified fields keep their value
    Update {
        /// Customer ID
        id: String,

        #[command(flatten)]
        fields: CustomerArgs,

        #[command(flatten)]
        output: OutputOptions,
    },
}

/// Customer form fields
#[derive(Debug, Clone, Default, Args)]
pub struct CustomerArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub county: Option<String>,

    #[arg(long)]
    pub town: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Monthly charge (empty means 0)
    #[arg(long)]
    pub monthly_charge: Option<String>,

    /// Status: ACTIVE or DORMANT (case-insensitive)
    #[arg(long, value_parser = parse_customer_status)]
    pub status: Option<String>,

    /// Latitude of the customer's location
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the customer's location
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

impl From<CustomerArgs> for CustomerFields {
    fn from(args: CustomerArgs) -> Self {
        CustomerFields {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            gender: args.gender,
            county: args.county,
            town: args.town,
            category: args.category,
            monthly_charge: args.monthly_charge,
            status: args.status,
            latitude: args.lat,
            longitude: args.lng,
        }
    }
}

#[derive(Subcommand)]
pub enum InvoiceAction {
    /// List invoices by status, one page at a time
    #[command(visible_alias = "list")]
    Ls {
        /// Status: UNPAID, PAID or CANCELLED (case-insensitive)
        #[arg(short, long, default_value = "UNPAID", value_parser = parse_invoice_status)]
        status: InvoiceStatus,

        /// Number of pages to fetch
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Search by customer phone number (digits only) or name
    Search {
        query: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, page_size, request_timeout)
        #[arg(value_parser = parse_config_key)]
        key: String,
        /// Value to set
        value: String,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api_url, page_size, request_timeout)
        #[arg(value_parser = parse_config_key)]
        key: String,
        #[command(flatten)]
        output: OutputOptions,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_config_get, cmd_config_set, cmd_config_show, cmd_customers_create,
            cmd_customers_ls, cmd_customers_search, cmd_customers_show, cmd_customers_update,
            cmd_invoices_ls, cmd_invoices_search, cmd_login, cmd_logout, cmd_whoami,
        };

        match self {
            Commands::Customers { action } => match action {
                CustomerAction::Ls { output } => cmd_customers_ls(output).await,
                CustomerAction::Search { query, output } => {
                    cmd_customers_search(&query, output).await
                }
                CustomerAction::Show { id, output } => cmd_customers_show(&id, output).await,
                CustomerAction::Create { fields, output } => {
                    cmd_customers_create(fields.into(), output).await
                }
                CustomerAction::Update { id, fields, output } => {
                    cmd_customers_update(&id, fields.into(), output).await
                }
            },

            Commands::Invoices { action } => match action {
                InvoiceAction::Ls {
                    status,
                    pages,
                    output,
                } => cmd_invoices_ls(status, pages as usize, output).await,
                InvoiceAction::Search { query, output } => {
                    cmd_invoices_search(&query, output).await
                }
            },

            Commands::Login {
                name,
                email,
                token,
                output,
            } => cmd_login(&name, email, token, output),
            Commands::Logout { output } => cmd_logout(output),
            Commands::Whoami { output } => cmd_whoami(output),

            Commands::Config { action } => match action {
                ConfigAction::Show { output } => cmd_config_show(output),
                ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
                ConfigAction::Get { key, output } => cmd_config_get(&key, output),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_invoice_status(s: &str) -> Result<InvoiceStatus, String> {
    parse_with_validation(
        s,
        |v| InvoiceStatus::from_str(v).map_err(|_| String::new()),
        "status",
        VALID_INVOICE_STATUSES,
    )
}

/// Validated here so a typo fails before any request; the editor parses it
/// again from the draft text.
fn parse_customer_status(s: &str) -> Result<String, String> {
    parse_with_validation(
        s,
        |v| {
            crate::types::CustomerStatus::from_str(v)
                .map(|status| status.to_string())
                .map_err(|_| String::new())
        },
        "status",
        VALID_CUSTOMER_STATUSES,
    )
}

fn parse_config_key(s: &str) -> Result<String, String> {
    parse_with_validation(
        s,
        |v| {
            if VALID_CONFIG_KEYS.contains(&v) {
                Ok(v.to_string())
            } else {
                Err(String::new())
            }
        },
        "config key",
        VALID_CONFIG_KEYS,
    )
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "opsdesk", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_invoice_status_case_insensitive() {
        assert_eq!(parse_invoice_status("paid").unwrap(), InvoiceStatus::Paid);
        assert_eq!(
            parse_invoice_status("CANCELLED").unwrap(),
            InvoiceStatus::Cancelled
        );
    }

    #[test]
    fn test_parse_invoice_status_error_lists_valid_values() {
        let err = parse_invoice_status("overdue").unwrap_err();
        assert!(
            err.contains("UNPAID") && err.contains("PAID") && err.contains("CANCELLED"),
            "Error should list valid status values, got: {err}"
        );
    }

    #[test]
    fn test_parse_customer_status_normalizes() {
        assert_eq!(parse_customer_status("dormant").unwrap(), "DORMANT");
        assert!(parse_customer_status("closed").is_err());
    }

    #[test]
    fn test_parse_config_key() {
        assert_eq!(parse_config_key("page_size").unwrap(), "page_size");
        let err = parse_config_key("github.token").unwrap_err();
        assert!(err.contains("api_url"));
    }

    #[test]
    fn test_invoices_ls_defaults() {
        let cli = Cli::try_parse_from(["opsdesk", "invoices", "ls"]).unwrap();
        match cli.command {
            Commands::Invoices {
                action:
                    InvoiceAction::Ls {
                        status,
                        pages,
                        output,
                    },
            } => {
                assert_eq!(status, InvoiceStatus::Unpaid);
                assert_eq!(pages, 1);
                assert!(!output.json);
            }
            _ => panic!("expected invoices ls"),
        }
    }

    #[test]
    fn test_location_requires_both_coordinates() {
        assert!(
            Cli::try_parse_from(["opsdesk", "customers", "create", "--lat", "1.23"]).is_err()
        );
        let cli = Cli::try_parse_from([
            "opsdesk",
            "customers",
            "create",
            "--lat",
            "-1.29",
            "--lng",
            "36.8",
        ])
        .unwrap();
        match cli.command {
            Commands::Customers {
                action: CustomerAction::Create { fields, .. },
            } => {
                assert_eq!(fields.lat, Some(-1.29));
                assert_eq!(fields.lng, Some(36.8));
            }
            _ => panic!("expected customers create"),
        }
    }

    #[test]
    fn test_zero_pages_rejected() {
        assert!(Cli::try_parse_from(["opsdesk", "invoices", "ls", "--pages", "0"]).is_err());
    }
}
