//! Data screens: each composes a list controller, a search overlay and a
//! notification queue over one [`Backend`](crate::api::Backend).
//!
//! Screens are driven by one task. Every method that talks to the backend
//! raises at most one toast, and a failure never alters what was already on
//! display.

mod customers;
mod invoices;

pub use customers::CustomersScreen;
pub use invoices::InvoicesScreen;

use crate::error::OpsError;
use crate::notify::Toast;

/// Shown for any 401 from a list or search request
pub const UNAUTHORIZED_MESSAGE: &str = "You are not authorized. Please log in.";

/// Turn a failed list/search request into its toast.
///
/// A 401 only changes the wording; the session is left as it is.
fn failure_toast(context: &str, error: &OpsError, fallback: &str) -> Toast {
    tracing::warn!("{context} failed: {error}");
    if error.is_unauthorized() {
        Toast::error(UNAUTHORIZED_MESSAGE)
    } else {
        Toast::error(fallback)
    }
}
