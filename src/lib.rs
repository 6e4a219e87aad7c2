pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod editor;
pub mod error;
pub mod listing;
pub mod notify;
pub mod screen;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_guards;

pub use api::{Backend, CustomerPayload, HttpBackend, InvoicePage, SearchFilter};
pub use config::Config;
pub use editor::{CustomerDraft, CustomerEditor, EditorMode, SaveAction, SaveOutcome, SaveRequest};
pub use error::{ErrorKind, OpsError, Result};
pub use listing::{ListController, PageOutcome, Paging, SearchOverlay};
pub use notify::{Toast, ToastLevel};
pub use screen::{CustomersScreen, InvoicesScreen};
pub use session::{Gate, Session, SessionState, SessionStore};
pub use types::{
    Customer, CustomerRef, CustomerStatus, Invoice, InvoiceStatus, Location, OPSDESK_DIR,
    RecordId, User,
};
