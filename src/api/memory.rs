//! In-memory [`Backend`] for screen tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{OpsError, Result};
use crate::types::{Customer, Invoice, RecordId};

use super::{Backend, CustomerPayload, InvoicePage, SearchFilter};

/// A request the fake received, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListCustomers,
    SearchCustomers(SearchFilter),
    CreateCustomer(CustomerPayload),
    UpdateCustomer(RecordId, CustomerPayload),
    ListInvoices(InvoicePage),
    SearchInvoices(SearchFilter),
}

#[derive(Default)]
struct Inner {
    customers: Vec<Customer>,
    invoices: Vec<Invoice>,
    search_results: Vec<Customer>,
    invoice_search_results: Vec<Invoice>,
    calls: Vec<Call>,
    /// Status codes to fail the next requests with, front first
    failures: Vec<u16>,
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(self, customers: Vec<Customer>) -> Self {
        self.inner.lock().customers = customers;
        self
    }

    pub fn with_invoices(self, invoices: Vec<Invoice>) -> Self {
        self.inner.lock().invoices = invoices;
        self
    }

    pub fn set_customer_search_results(&self, results: Vec<Customer>) {
        self.inner.lock().search_results = results;
    }

    pub fn set_invoice_search_results(&self, results: Vec<Invoice>) {
        self.inner.lock().invoice_search_results = results;
    }

    /// Make the next request fail with `status` (0 means a transport error).
    pub fn fail_next(&self, status: u16) {
        self.inner.lock().failures.push(status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(call);
        if inner.failures.is_empty() {
            return Ok(());
        }
        match inner.failures.remove(0) {
            0 => Err(OpsError::Other("connection refused".to_string())),
            401 => Err(OpsError::Unauthorized("token expired".to_string())),
            status => Err(OpsError::Rejected {
                status,
                message: "rejected".to_string(),
            }),
        }
    }
}

impl Backend for MemoryBackend {
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.record(Call::ListCustomers)?;
        Ok(self.inner.lock().customers.clone())
    }

    async fn search_customers(&self, filter: &SearchFilter) -> Result<Vec<Customer>> {
        self.record(Call::SearchCustomers(filter.clone()))?;
        Ok(self.inner.lock().search_results.clone())
    }

    async fn create_customer(&self, payload: &CustomerPayload) -> Result<()> {
        self.record(Call::CreateCustomer(payload.clone()))
    }

    async fn update_customer(&self, id: &RecordId, payload: &CustomerPayload) -> Result<()> {
        self.record(Call::UpdateCustomer(id.clone(), payload.clone()))
    }

    async fn list_invoices(&self, page: InvoicePage) -> Result<Vec<Invoice>> {
        self.record(Call::ListInvoices(page))?;
        Ok(self
            .inner
            .lock()
            .invoices
            .iter()
            .filter(|inv| inv.status == page.status)
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect())
    }

    async fn search_invoices(&self, filter: &SearchFilter) -> Result<Vec<Invoice>> {
        self.record(Call::SearchInvoices(filter.clone()))?;
        Ok(self.inner.lock().invoice_search_results.clone())
    }
}
