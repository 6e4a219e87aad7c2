use std::sync::Arc;

use crate::api::Backend;
use crate::editor::{CustomerEditor, SaveAction, SaveOutcome};
use crate::listing::{ListController, PageOutcome, SearchOutcome, SearchOverlay};
use crate::notify::Toast;
use crate::session::{Gate, Session};
use crate::types::{Customer, RecordId};

use super::failure_toast;

const ROUTE: &str = "customers";

const FETCH_FAILED: &str = "Error fetching customers.";
const SEARCH_FAILED: &str = "Error searching customers.";
const SAVE_FAILED: &str = "Error saving customer. Please try again.";

/// Customer accounts: full list, search, and the view/edit modal.
pub struct CustomersScreen<B> {
    backend: B,
    session: Arc<Session>,
    list: ListController<Customer>,
    search: SearchOverlay<Customer>,
    editor: CustomerEditor,
    toasts: Vec<Toast>,
}

impl<B: Backend> CustomersScreen<B> {
    pub fn new(backend: B, session: Arc<Session>) -> Self {
        Self {
            backend,
            session,
            list: ListController::unpaged(),
            search: SearchOverlay::new(),
            editor: CustomerEditor::new(),
            toasts: Vec::new(),
        }
    }

    /// May this screen show data for the current session?
    pub fn gate(&self) -> Gate {
        self.session.gate(ROUTE)
    }

    /// Screen became visible: check the session, then load.
    pub async fn open(&mut self) -> Gate {
        let gate = self.gate();
        if let Gate::Proceed(_) = gate {
            self.refresh().await;
        }
        gate
    }

    /// Reload the full customer list.
    pub async fn refresh(&mut self) {
        let Some(request) = self.list.load_page(true) else {
            return;
        };
        let result = self.backend.list_customers().await;
        if let PageOutcome::Failed(e) = self.list.complete(request, result) {
            self.toasts
                .push(failure_toast("fetching customers", &e, FETCH_FAILED));
        }
    }

    /// Search by phone (digits only) or name; blank input clears the search.
    pub async fn search(&mut self, query: &str) {
        let Some(request) = self.search.search(query) else {
            return;
        };
        let result = self.backend.search_customers(&request.filter).await;
        if let SearchOutcome::Failed(e) = self.search.complete(request, result) {
            self.toasts
                .push(failure_toast("searching customers", &e, SEARCH_FAILED));
        }
    }

    /// Open the read-only detail modal for `id`.
    /// Returns false when `id` is not in the displayed collection.
    pub fn view(&mut self, id: &RecordId) -> bool {
        let Some(customer) = self.find(id).cloned() else {
            return false;
        };
        self.editor.open_view(customer);
        true
    }

    /// Open the edit form for `id`, or a blank form for a new customer.
    /// Returns false when `id` is not in the displayed collection.
    pub fn edit(&mut self, id: Option<&RecordId>) -> bool {
        match id {
            Some(id) => {
                let Some(customer) = self.find(id).cloned() else {
                    return false;
                };
                self.editor.open_edit(Some(&customer));
            }
            None => self.editor.open_edit(None),
        }
        true
    }

    /// Submit the edit form. On success the modal closes and the list is
    /// refetched; on failure the form stays open as typed.
    pub async fn save(&mut self) {
        let request = match self.editor.begin_save() {
            Ok(Some(request)) => request,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("customer form invalid: {e}");
                self.toasts.push(Toast::error(e.to_string()));
                return;
            }
        };

        let result = match &request.action {
            SaveAction::Create(payload) => self.backend.create_customer(payload).await,
            SaveAction::Update(id, payload) => self.backend.update_customer(id, payload).await,
        };

        match self.editor.complete_save(&request, result) {
            SaveOutcome::Saved { updated } => {
                let verb = if updated { "updated" } else { "saved" };
                self.toasts
                    .push(Toast::success(format!("Customer {verb} successfully!")));
                self.refresh().await;
            }
            SaveOutcome::Failed(e) => {
                tracing::warn!("saving customer failed: {e}");
                self.toasts.push(Toast::error(SAVE_FAILED));
            }
            SaveOutcome::Superseded { saved } => {
                tracing::debug!("save answered after the modal changed (saved: {saved})");
                if saved {
                    self.refresh().await;
                }
            }
        }
    }

    fn find(&self, id: &RecordId) -> Option<&Customer> {
        self.displayed().iter().find(|c| &c.id == id)
    }

    /// Rows to render: search results while searching, else the full list.
    pub fn displayed(&self) -> &[Customer] {
        self.search.display(self.list.items())
    }

    pub fn list(&self) -> &ListController<Customer> {
        &self.list
    }

    pub fn search_state(&self) -> &SearchOverlay<Customer> {
        &self.search
    }

    pub fn editor(&self) -> &CustomerEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut CustomerEditor {
        &mut self.editor
    }

    /// Drain pending notifications for display.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// Screen is going away; late responses are ignored.
    pub fn close(&mut self) {
        self.list.detach();
        self.editor.close();
    }
}
