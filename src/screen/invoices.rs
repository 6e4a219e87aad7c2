use std::sync::Arc;

use crate::api::{Backend, InvoicePage};
use crate::listing::{ListController, PageOutcome, PageRequest, SearchOutcome, SearchOverlay};
use crate::notify::Toast;
use crate::session::{Gate, Session};
use crate::types::{Invoice, InvoiceStatus};

use super::failure_toast;

const ROUTE: &str = "invoices";

const FETCH_FAILED: &str = "Failed to fetch invoices. Please try again.";
const SEARCH_FAILED: &str = "Error searching invoices.";

/// Invoices filtered by status, loaded page by page as the user scrolls.
pub struct InvoicesScreen<B> {
    backend: B,
    session: Arc<Session>,
    status: InvoiceStatus,
    list: ListController<Invoice>,
    search: SearchOverlay<Invoice>,
    toasts: Vec<Toast>,
}

impl<B: Backend> InvoicesScreen<B> {
    pub fn new(backend: B, session: Arc<Session>, page_size: usize) -> Self {
        Self {
            backend,
            session,
            status: InvoiceStatus::default(),
            list: ListController::paged(page_size),
            search: SearchOverlay::new(),
            toasts: Vec::new(),
        }
    }

    /// May this screen show data for the current session?
    pub fn gate(&self) -> Gate {
        self.session.gate(ROUTE)
    }

    /// Screen gained focus: check the session, then reload from the first
    /// page.
    pub async fn open(&mut self) -> Gate {
        let gate = self.gate();
        if let Gate::Proceed(_) = gate {
            self.refresh().await;
        }
        gate
    }

    /// Discard loaded invoices and fetch the first page again.
    pub async fn refresh(&mut self) {
        let request = self.list.load_page(true);
        self.run(request).await;
    }

    /// The list was scrolled to its end.
    pub async fn load_more(&mut self) {
        let request = self.list.on_scroll_end();
        self.run(request).await;
    }

    /// Switch the status filter. Always restarts from the first page, even
    /// when `status` is already selected.
    pub async fn set_status_filter(&mut self, status: InvoiceStatus) {
        self.status = status;
        self.refresh().await;
    }

    async fn run(&mut self, request: Option<PageRequest>) {
        let Some(request) = request else {
            return;
        };
        let page = InvoicePage {
            status: self.status,
            offset: request.offset,
            limit: request.limit.unwrap_or_default(),
        };
        let result = self.backend.list_invoices(page).await;
        if let PageOutcome::Failed(e) = self.list.complete(request, result) {
            self.toasts
                .push(failure_toast("fetching invoices", &e, FETCH_FAILED));
        }
    }

    /// Search by phone (digits only) or customer name; blank input returns
    /// to the paginated list as it was.
    pub async fn search(&mut self, query: &str) {
        let Some(request) = self.search.search(query) else {
            return;
        };
        let result = self.backend.search_invoices(&request.filter).await;
        if let SearchOutcome::Failed(e) = self.search.complete(request, result) {
            self.toasts
                .push(failure_toast("searching invoices", &e, SEARCH_FAILED));
        }
    }

    pub fn status_filter(&self) -> InvoiceStatus {
        self.status
    }

    pub fn displayed(&self) -> &[Invoice] {
        self.search.display(self.list.items())
    }

    pub fn list(&self) -> &ListController<Invoice> {
        &self.list
    }

    pub fn search_state(&self) -> &SearchOverlay<Invoice> {
        &self.search
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn close(&mut self) {
        self.list.detach();
    }
}
